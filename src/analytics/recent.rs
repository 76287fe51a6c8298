//! 最近活动列表

use super::Event;

/// 最近活动：按时间倒序取前 `limit` 条，同一时间戳保持输入顺序
pub fn recent_activity(events: &[Event], limit: usize) -> Vec<&Event> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_newest_first() {
        let at = |h| Utc.with_ymd_and_hms(2024, 4, 1, h, 0, 0).unwrap();
        let events = vec![
            Event::new(at(1)).with_subject("a"),
            Event::new(at(5)).with_subject("b"),
            Event::new(at(3)).with_subject("c"),
            Event::new(at(5)).with_subject("d"),
        ];
        let recent = recent_activity(&events, 3);
        let ids: Vec<_> = recent.iter().map(|e| e.subject_id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["b", "d", "c"]);
    }

    #[test]
    fn test_empty_and_zero_limit() {
        assert!(recent_activity(&[], 10).is_empty());
        let events = vec![Event::new(Utc::now())];
        assert!(recent_activity(&events, 0).is_empty());
    }
}
