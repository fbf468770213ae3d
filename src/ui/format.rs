use crate::config::{DEFAULT_PICKER_DATE_FORMAT, DEFAULT_TABLE_DATE_FORMAT};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, VoyageError};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt::Write;

const NAIVE_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFormats {
    pub table: String,
    pub picker: String,
}

impl Default for DisplayFormats {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE_DATE_FORMAT.to_string(),
            picker: DEFAULT_PICKER_DATE_FORMAT.to_string(),
        }
    }
}

impl DisplayFormats {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            table: config.table_date_format().to_string(),
            picker: config.picker_date_format().to_string(),
        }
    }
}

/// 解析日期時間輸入；空字串代表清除欄位。沒有時區的輸入一律視為 UTC
pub fn parse_datetime_input(input: &str) -> Result<Option<DateTime<Utc>>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    NAIVE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| VoyageError::ValidationError {
            message: format!(
                "'{}' is not a date-time, expected e.g. 2024-01-01T08:30",
                trimmed
            ),
        })
}

/// 格式字串含無效 specifier 時改用 RFC 3339 輸出
pub fn format_datetime(value: &DateTime<Utc>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", value.format(format)).is_err() {
        tracing::warn!("⚠️ Invalid date format '{}', falling back to RFC 3339", format);
        return value.to_rfc3339();
    }
    out
}

pub fn format_length(length: Option<f64>) -> String {
    length.map(|l| l.to_string()).unwrap_or_else(|| "-".to_string())
}
