//! JSON log line decoding.
//!
//! Each capture log line is a JSON object:
//!
//! ```text
//! {"time_ms": 1700000000000, "dir": "ser -> cli", "data": "68 04 0B 00 00 00", "len": 6}
//! ```

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::decoder::decode_frame;
use crate::error::{Iec104Error, Result};
use crate::frame::{serialize_optional_frame, FrameRecord};
use crate::hex::token_count;

/// Timestamp shown when a record carries no usable time.
pub const TIMESTAMP_NOT_AVAILABLE: &str = "N/A";

/// Timestamp display format (millisecond precision, local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Transmission direction of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Server to client
    Tx,
    /// Client to server
    Rx,
    /// Direction text not recognized
    Unknown,
}

impl Direction {
    /// Classify a free-text direction (case-insensitive substring match).
    pub fn classify(dir: &str) -> Self {
        let dir = dir.to_lowercase();
        if dir.contains("ser -> cli") || dir.contains("server") {
            Self::Tx
        } else if dir.contains("cli -> ser") || dir.contains("client") {
            Self::Rx
        } else {
            Self::Unknown
        }
    }

    /// Code used in output (`TX`, `RX`, `UNKNOWN`).
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Tx => "TX",
            Self::Rx => "RX",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Describe the direction, falling back to the raw text.
    pub fn describe(&self, raw: &str) -> String {
        match self {
            Self::Tx => "server→client".to_string(),
            Self::Rx => "client→server".to_string(),
            Self::Unknown if raw.is_empty() => "unknown direction".to_string(),
            Self::Unknown => raw.to_string(),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Raw JSON record as written by the capture tool.
#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    #[serde(default)]
    time_ms: i64,
    #[serde(default)]
    dir: Option<String>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    len: Option<u64>,
}

/// One decoded log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Formatted local timestamp, or `N/A`
    pub timestamp: String,
    /// Raw epoch milliseconds
    pub timestamp_ms: i64,
    /// Classified direction
    pub direction: Direction,
    /// Direction description
    pub direction_desc: String,
    /// Declared byte length, or the hex token count
    pub length: u64,
    /// Hex payload (trimmed)
    pub data: String,
    /// Decoded frame, absent when the line has no payload
    #[serde(serialize_with = "serialize_optional_frame")]
    pub frame_info: Option<FrameRecord>,
    /// The trimmed source line
    pub raw: String,
    /// 1-based position within the returned window
    pub line_num: usize,
    /// 1-based line number within the file
    pub file_line_num: usize,
}

impl LogEntry {
    /// Frame type code, empty when the line carried no payload.
    pub fn frame_type(&self) -> &'static str {
        self.frame_info.as_ref().map_or("", |f| f.type_code())
    }
}

/// Format epoch milliseconds as local time.
pub fn format_timestamp(time_ms: i64) -> String {
    if time_ms <= 0 {
        return TIMESTAMP_NOT_AVAILABLE.to_string();
    }
    match Local.timestamp_millis_opt(time_ms).single() {
        Some(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
        None => TIMESTAMP_NOT_AVAILABLE.to_string(),
    }
}

/// Decode one log line.
///
/// Returns `Ok(None)` for blank lines and an error for lines that are not a
/// JSON object with the expected field types. `file_line_num` is recorded
/// in the entry as both line numbers; the file reader renumbers `line_num`.
pub fn parse_log_line(line: &str, file_line_num: usize) -> Result<Option<LogEntry>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_str(line)?;
    if !value.is_object() {
        return Err(Iec104Error::InvalidLogLine(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    }
    let record: RawRecord = serde_json::from_value(value)?;

    let dir = record.dir.unwrap_or_default();
    let direction = Direction::classify(&dir);
    let data = record.data.as_deref().unwrap_or_default().trim().to_string();

    let frame_info = if data.is_empty() {
        None
    } else {
        Some(decode_frame(&data))
    };

    Ok(Some(LogEntry {
        timestamp: format_timestamp(record.time_ms),
        timestamp_ms: record.time_ms,
        direction,
        direction_desc: direction.describe(&dir),
        length: record.len.unwrap_or_else(|| token_count(&data) as u64),
        data,
        frame_info,
        raw: line.to_string(),
        line_num: file_line_num,
        file_line_num,
    }))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_classify() {
        assert_eq!(Direction::classify("ser -> cli"), Direction::Tx);
        assert_eq!(Direction::classify("SER -> CLI"), Direction::Tx);
        assert_eq!(Direction::classify("from Server"), Direction::Tx);
        assert_eq!(Direction::classify("cli -> ser"), Direction::Rx);
        assert_eq!(Direction::classify("Client side"), Direction::Rx);
        assert_eq!(Direction::classify("upstream"), Direction::Unknown);
        assert_eq!(Direction::classify(""), Direction::Unknown);
    }

    #[test]
    fn test_direction_describe() {
        assert_eq!(Direction::Tx.describe("ser -> cli"), "server→client");
        assert_eq!(Direction::Rx.describe("cli -> ser"), "client→server");
        assert_eq!(Direction::Unknown.describe("upstream"), "upstream");
        assert_eq!(Direction::Unknown.describe(""), "unknown direction");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "N/A");
        assert_eq!(format_timestamp(-5), "N/A");

        let ts = format_timestamp(1_700_000_000_123);
        assert_eq!(ts.len(), "2023-11-14 22:13:20.123".len());
        assert!(ts.ends_with(".123"));
    }

    #[test]
    fn test_parse_log_line() {
        let line = r#"{"time_ms": 1700000000000, "dir": "ser -> cli", "data": "68 04 0B 00 00 00", "len": 6}"#;
        let entry = parse_log_line(line, 3).unwrap().unwrap();

        assert_eq!(entry.direction, Direction::Tx);
        assert_eq!(entry.direction_desc, "server→client");
        assert_eq!(entry.length, 6);
        assert_eq!(entry.timestamp_ms, 1_700_000_000_000);
        assert_eq!(entry.frame_type(), "U");
        assert_eq!(entry.line_num, 3);
        assert_eq!(entry.file_line_num, 3);
        assert_eq!(entry.raw, line);
    }

    #[test]
    fn test_parse_log_line_blank() {
        assert!(parse_log_line("", 1).unwrap().is_none());
        assert!(parse_log_line("  \t ", 1).unwrap().is_none());
    }

    #[test]
    fn test_parse_log_line_invalid_json() {
        assert!(matches!(
            parse_log_line("{not json", 1),
            Err(Iec104Error::Json(_))
        ));
        assert!(matches!(
            parse_log_line("[1, 2]", 1),
            Err(Iec104Error::InvalidLogLine(_))
        ));
        assert!(matches!(
            parse_log_line(r#"{"time_ms": "yesterday"}"#, 1),
            Err(Iec104Error::Json(_))
        ));
    }

    #[test]
    fn test_parse_log_line_defaults() {
        let entry = parse_log_line(r#"{"dir": "upstream"}"#, 1).unwrap().unwrap();
        assert_eq!(entry.timestamp, "N/A");
        assert_eq!(entry.direction, Direction::Unknown);
        assert_eq!(entry.direction_desc, "upstream");
        assert_eq!(entry.length, 0);
        assert!(entry.frame_info.is_none());
        assert_eq!(entry.frame_type(), "");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["frame_info"], serde_json::json!({}));
        assert_eq!(json["direction"], "UNKNOWN");
    }

    #[test]
    fn test_parse_log_line_length_fallback() {
        let line = r#"{"time_ms": 1, "dir": "cli -> ser", "data": "  68 04 01 00 0A 00 "}"#;
        let entry = parse_log_line(line, 1).unwrap().unwrap();
        assert_eq!(entry.length, 6);
        assert_eq!(entry.data, "68 04 01 00 0A 00");
        assert_eq!(entry.direction, Direction::Rx);
        assert_eq!(entry.frame_type(), "S");
    }
}
