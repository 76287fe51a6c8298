//! CSV 读写共享逻辑
//!
//! 提供统一的 CSV 读取（事件、主体导出）与日序列导出

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::analytics::DailyPoint;
use crate::errors::{Result, RollupError};

/// 日序列 CSV 导出行
#[derive(Debug, Clone, Serialize)]
pub struct DailyCsvRow {
    pub date: String,
    pub label: String,
    pub count: u64,
}

impl From<&DailyPoint> for DailyCsvRow {
    fn from(point: &DailyPoint) -> Self {
        Self {
            date: point.date.to_string(),
            label: point.label.clone(),
            count: point.count,
        }
    }
}

/// 将一行 CSV 转为 JSON 对象：单元格一律按文本保留，空单元格视为缺失
fn row_to_object(headers: &StringRecord, record: &StringRecord) -> Value {
    let object: Map<String, Value> = headers
        .iter()
        .zip(record.iter())
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
        .collect();
    Value::Object(object)
}

/// 读取带表头的 CSV 文件，返回 (CSV 行号, 记录) 列表
///
/// 单元格不做类型推断（`0042` 保持为 `"0042"`），数值列由记录类型自行解析。
/// 任一行解析失败时汇总所有错误后返回
pub fn read_csv_rows<T, P>(path: P) -> Result<Vec<(usize, T)>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())
        .map_err(|e| RollupError::file_operation(format!("Failed to open file: {}", e)))?;
    let reader = BufReader::new(file);
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (row_idx, result) in csv_reader.records().enumerate() {
        let row_num = row_idx + 2; // CSV 行号（1-based，跳过 header）

        let parsed = result.map_err(|e| e.to_string()).and_then(|record| {
            serde_json::from_value::<T>(row_to_object(&headers, &record))
                .map_err(|e| e.to_string())
        });
        match parsed {
            Ok(row) => rows.push((row_num, row)),
            Err(e) => errors.push(format!("Row {}: {}", row_num, e)),
        }
    }

    if !errors.is_empty() {
        return Err(RollupError::serialization(format!(
            "CSV parse errors:\n{}",
            errors.join("\n")
        )));
    }

    Ok(rows)
}

/// 导出日序列到 CSV 文件
pub fn export_daily_series<P: AsRef<Path>>(points: &[DailyPoint], path: P) -> Result<()> {
    let file = File::create(path.as_ref())
        .map_err(|e| RollupError::file_operation(format!("Failed to create file: {}", e)))?;
    let writer = BufWriter::new(file);
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    for point in points {
        csv_writer
            .serialize(DailyCsvRow::from(point))
            .map_err(|e| RollupError::serialization(format!("Failed to write CSV row: {}", e)))?;
    }

    csv_writer
        .flush()
        .map_err(|e| RollupError::file_operation(format!("Failed to flush CSV: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        id: String,
        #[serde(default)]
        note: Option<String>,
    }

    #[test]
    fn test_cells_kept_as_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "id,note\n0042,\n7, hello \n").unwrap();

        let rows: Vec<(usize, Row)> = read_csv_rows(&path).unwrap();
        assert_eq!(rows[0].0, 2);
        assert_eq!(rows[0].1.id, "0042");
        assert_eq!(rows[0].1.note, None);
        assert_eq!(rows[1].1.note.as_deref(), Some("hello"));
    }

    #[test]
    fn test_row_errors_collected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "id,note\n1,a\n,b\n").unwrap();

        let err = read_csv_rows::<Row, _>(&path).unwrap_err();
        assert!(matches!(err, RollupError::Serialization(_)));
        assert!(err.message().contains("Row 3"));
    }
}
