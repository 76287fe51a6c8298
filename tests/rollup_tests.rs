//! 汇总引擎集成测试
//!
//! 通过公共 API 覆盖 summarize、设备分布、排行榜、按天序列和完整 rollup。

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use seolnk_analytics::analytics::{
    DIRECT_LABEL, DeviceType, Event, EventStream, RollupEngine, RollupRequest, Subject,
    agent_breakdown, daily_series, device_breakdown, normalize_referrer, per_subject_leaderboard,
    summarize, summarize_engagement, top_groups, top_referrers,
};
use seolnk_analytics::errors::RollupError;

const MOBILE_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Mobile Safari/537.36";
const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

// =============================================================================
// 测试数据
// =============================================================================

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap() + Duration::days(n)
}

/// 三条事件：day-0 两条（移动端直达、桌面端 twitter），day-3 一条（平板）
fn scenario_events() -> Vec<Event> {
    vec![
        Event::new(day(0)).with_user_agent(MOBILE_UA).with_referrer(""),
        Event::new(day(0))
            .with_user_agent(DESKTOP_UA)
            .with_referrer("https://twitter.com/x"),
        Event::new(day(3))
            .with_user_agent("Tablet; iPad")
            .with_referrer("unknown"),
    ]
}

fn scenario_now() -> DateTime<Utc> {
    day(6) + Duration::hours(2)
}

// =============================================================================
// 具体场景
// =============================================================================

#[test]
fn test_scenario_summary() {
    let summary = summarize(&scenario_events(), None, 7, scenario_now()).unwrap();
    assert_eq!(summary.total_all_time, 3);
    assert_eq!(summary.in_window, 3);
}

#[test]
fn test_scenario_devices() {
    let devices = device_breakdown(&scenario_events());
    assert_eq!(devices.mobile, 1);
    assert_eq!(devices.desktop, 1);
    assert_eq!(devices.tablet, 1);
}

#[test]
fn test_scenario_referrers() {
    let referrers = top_referrers(&scenario_events(), Some(5));
    let pairs: Vec<(&str, u64)> = referrers.iter().map(|g| (g.label.as_str(), g.count)).collect();
    assert_eq!(pairs, vec![("Direct", 2), ("twitter.com", 1)]);
}

#[test]
fn test_scenario_daily_series() {
    let series = daily_series(&scenario_events(), 7, scenario_now()).unwrap();
    let counts: Vec<u64> = series.iter().map(|p| p.count).collect();
    assert_eq!(counts, vec![2, 0, 0, 1, 0, 0, 0]);
    assert_eq!(series[0].date, day(0).date_naive());
    assert_eq!(series[6].date, scenario_now().date_naive());
}

#[test]
fn test_scenario_full_rollup() {
    let events = scenario_events();
    let report = RollupEngine::default()
        .rollup(&RollupRequest::new(&events, 7), scenario_now())
        .unwrap();

    assert_eq!(report.summary.in_window, 3);
    assert_eq!(report.devices.total(), 3);
    assert_eq!(report.top_referrers[0].label, DIRECT_LABEL);
    assert_eq!(report.daily.len(), 7);
    assert_eq!(report.recent[0].occurred_at, day(3));
    assert!(report.subjects.is_none());
    assert!(report.engagement.is_none());
}

// =============================================================================
// 通用性质
// =============================================================================

#[test]
fn test_window_covering_all_events() {
    let now = day(30);
    let events: Vec<Event> = (0..30).map(|n| Event::new(day(n))).collect();
    let summary = summarize(&events, None, 31, now).unwrap();
    assert_eq!(summary.in_window, events.len() as u64);
}

#[test]
fn test_empty_summary_is_zero() {
    for days in [0, 1, 7, 90] {
        let summary = summarize(&[], None, days, day(0)).unwrap();
        assert_eq!(summary.total_all_time, 0);
        assert_eq!(summary.in_window, 0);
    }

    let engagement = summarize_engagement(&[], None, &[], None, 7, day(0)).unwrap();
    assert_eq!(engagement.click_rate, 0.0);
    assert!(engagement.click_rate.is_finite());
    assert!(engagement.window_click_rate.is_finite());
}

#[test]
fn test_negative_window_rejected() {
    let err = summarize(&scenario_events(), None, -1, day(0)).unwrap_err();
    assert!(matches!(err, RollupError::InvalidArgument(_)));

    let events = scenario_events();
    let err = RollupEngine::default()
        .rollup(&RollupRequest::new(&events, 7).with_series_days(-2), day(0))
        .unwrap_err();
    assert!(matches!(err, RollupError::InvalidArgument(_)));
}

#[test]
fn test_daily_series_always_full_length() {
    let now = Utc.with_ymd_and_hms(2024, 2, 20, 23, 59, 0).unwrap();
    let sparse = vec![Event::new(now - Duration::days(5))];
    let dense: Vec<Event> = (0..200).map(|i| Event::new(now - Duration::hours(i))).collect();

    for events in [Vec::new(), sparse, dense] {
        let series = daily_series(&events, 14, now).unwrap();
        assert_eq!(series.len(), 14);
        assert_eq!(series[13].date, NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
        for pair in series.windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
    }
}

#[test]
fn test_device_breakdown_is_exhaustive() {
    let agents = [
        Some(MOBILE_UA),
        Some(DESKTOP_UA),
        Some("iPad"),
        Some(""),
        None,
        Some("curl/8.0"),
    ];
    let events: Vec<Event> = agents
        .iter()
        .map(|ua| {
            let event = Event::new(day(0));
            match ua {
                Some(ua) => event.with_user_agent(*ua),
                None => event,
            }
        })
        .collect();

    let devices = device_breakdown(&events);
    assert_eq!(devices.total(), events.len() as u64);
    assert_eq!(devices.count(DeviceType::Desktop), 4);
}

#[test]
fn test_referrer_normalization() {
    assert_eq!(normalize_referrer(Some("Direct")), "Direct");
    assert_eq!(normalize_referrer(Some("https://m.example.com/x?q=1")), "m.example.com");
    assert_eq!(normalize_referrer(Some("not a url")), "not a url");
    assert_eq!(normalize_referrer(None), "Direct");
}

#[test]
fn test_top_groups_limit_and_stability() {
    let labels = ["b", "a", "c", "a", "b", "d", "e", "f"];
    let events: Vec<Event> = labels
        .iter()
        .map(|l| Event::new(day(0)).with_subject(*l))
        .collect();

    let groups = top_groups(
        &events,
        |e| e.subject_id.clone().unwrap_or_default(),
        Some(3),
    );
    let ranked: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(ranked, vec!["b", "a", "c"]);
    assert!(groups.windows(2).all(|w| w[0].count >= w[1].count));
}

#[test]
fn test_subject_counter_fallback() {
    let subjects = vec![
        Subject::new("bio-1", "My bio").with_total_count(50),
        Subject::new("bio-2", "Other").with_total_count(7),
    ];
    let events = vec![Event::new(day(0)).with_subject("bio-2")];

    let board = per_subject_leaderboard(&subjects, &events);
    assert_eq!(board.entries[0].id, "bio-1");
    assert_eq!(board.entries[0].count, 50);
    assert!(board.entries[0].from_counter);
    // 有原始事件时不使用冗余计数
    assert_eq!(board.entries[1].count, 1);
    assert!(!board.entries[1].from_counter);
}

#[test]
fn test_rollup_with_views_and_subjects() {
    let now = day(10);
    let clicks = vec![
        Event::new(day(9)).with_subject("a"),
        Event::new(day(9)).with_subject("a"),
        Event::new(day(1)).with_subject("b"),
    ];
    let views: Vec<Event> = (0..10).map(|n| Event::new(day(n))).collect();
    let subjects = vec![Subject::new("a", "Alpha"), Subject::new("b", "Beta")];

    let request = RollupRequest::new(&clicks, 7)
        .with_views(EventStream::new(&views).with_total(Some(40)))
        .with_subjects(&subjects)
        .with_series_days(3);
    let report = RollupEngine::default().rollup(&request, now).unwrap();

    let engagement = report.engagement.unwrap();
    assert_eq!(engagement.views.total_all_time, 40);
    assert_eq!(engagement.clicks.total_all_time, 3);
    assert_eq!(engagement.click_rate, 7.5);
    assert_eq!(report.daily.len(), 3);

    let board = report.subjects.unwrap();
    assert_eq!(board.entries[0].label, "Alpha");
    assert_eq!(board.entries[0].bar_width, 100.0);
    assert_eq!(board.entries[1].bar_width, 50.0);

    let json = serde_json::to_value(&RollupEngine::default().rollup(&request, now).unwrap()).unwrap();
    assert!(json.get("daily").unwrap().is_array());
}

#[test]
fn test_future_events_outside_window() {
    let now = day(6);
    let events = vec![
        Event::new(day(1)),
        Event::new(day(5)),
        Event::new(now),
        Event::new(now + Duration::days(3)),
    ];

    let summary = summarize(&events, None, 7, now).unwrap();
    assert_eq!(summary.total_all_time, 4);
    assert_eq!(summary.in_window, 3);

    let report = RollupEngine::default()
        .rollup(&RollupRequest::new(&events, 7), now)
        .unwrap();
    let series_total: u64 = report.daily.iter().map(|p| p.count).sum();
    assert_eq!(report.summary.in_window, series_total);
}

// =============================================================================
// UA 分布
// =============================================================================

#[test]
fn test_agent_shares_over_all_events() {
    let events = vec![
        Event::new(day(0)).with_user_agent(DESKTOP_UA).with_referrer("https://a.com/"),
        Event::new(day(0)).with_referrer("https://a.com/"),
        Event::new(day(0)).with_referrer("https://b.com/"),
        Event::new(day(0)).with_referrer("https://b.com/"),
    ];

    let agents = agent_breakdown(&events, Some(5));
    assert_eq!(agents.with_agent, 1);
    assert_eq!(agents.browsers[0].label, "Chrome");
    assert_eq!(agents.browsers[0].percentage, 25.0);

    let report = RollupEngine::default()
        .rollup(&RollupRequest::new(&events, 7), day(1))
        .unwrap();
    assert_eq!(report.agents, agents);
    assert_eq!(report.top_referrers[0].percentage, 50.0);
    assert_eq!(report.agents.browsers[0].percentage, 25.0);
}
