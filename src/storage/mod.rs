//! 事件与主体的数据源
//!
//! 引擎不关心数据来自数据库还是文件；此模块从 JSON / CSV 导出文件加载原始行，
//! 按扩展名选择格式。

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::analytics::{Event, Subject};
use crate::errors::{Result, RollupError};
use crate::utils::csv_handler::read_csv_rows;

pub mod models;

pub use models::{EventRecord, SubjectRecord};

/// 导出文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
}

impl FileFormat {
    /// 从文件扩展名推断格式
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(RollupError::invalid_argument(format!(
                "Unsupported file type: '{}'. Expected .json or .csv",
                path.display()
            ))),
        }
    }
}

/// 读取 JSON 数组，返回 (行号, 记录) 列表；行号从 1 开始
fn read_json_rows<T, P>(path: P) -> Result<Vec<(usize, T)>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| RollupError::file_operation(format!("Failed to read file: {}", e)))?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let serde_json::Value::Array(items) = value else {
        return Err(RollupError::invalid_argument(format!(
            "Malformed collection in '{}': expected a JSON array",
            path.as_ref().display()
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value::<T>(item)
                .map(|record| (idx + 1, record))
                .map_err(|e| RollupError::serialization(format!("Row {}: {}", idx + 1, e)))
        })
        .collect()
}

fn read_rows<T, P>(path: P) -> Result<Vec<(usize, T)>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    match FileFormat::from_path(path.as_ref())? {
        FileFormat::Json => read_json_rows(path),
        FileFormat::Csv => read_csv_rows(path),
    }
}

/// 加载事件
pub fn load_events<P: AsRef<Path>>(path: P) -> Result<Vec<Event>> {
    let path = path.as_ref();
    debug!("Loading events from: {}", path.display());

    let events = read_rows::<EventRecord, _>(path)?
        .into_iter()
        .map(|(row, record)| record.into_event(row))
        .collect::<Result<Vec<_>>>()?;

    info!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// 加载主体
pub fn load_subjects<P: AsRef<Path>>(path: P) -> Result<Vec<Subject>> {
    let path = path.as_ref();
    debug!("Loading subjects from: {}", path.display());

    let subjects: Vec<Subject> = read_rows::<SubjectRecord, _>(path)?
        .into_iter()
        .map(|(_, record)| record.into())
        .collect();

    info!("Loaded {} subjects from {}", subjects.len(), path.display());
    Ok(subjects)
}
