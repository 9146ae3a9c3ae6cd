//! Aggregate statistics over decoded log entries.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::log_line::{Direction, LogEntry};

/// Counts of frame types, ASDU types, causes and directions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogStats {
    /// Number of entries
    pub total: usize,
    /// Entries per frame type code
    pub frame_types: BTreeMap<String, usize>,
    /// I-frames per type identification description
    pub type_ids: BTreeMap<String, usize>,
    /// I-frames per cause of transmission description
    pub causes: BTreeMap<String, usize>,
    /// Entries per direction; `TX`, `RX` and `UNKNOWN` are always present
    pub directions: BTreeMap<String, usize>,
}

impl LogStats {
    /// Aggregate a slice of entries.
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut stats = Self {
            total: entries.len(),
            directions: [Direction::Tx, Direction::Rx, Direction::Unknown]
                .iter()
                .map(|d| (d.code().to_string(), 0))
                .collect(),
            ..Default::default()
        };

        for entry in entries {
            *stats
                .directions
                .entry(entry.direction.code().to_string())
                .or_default() += 1;

            let frame_type = match entry.frame_info.as_ref() {
                Some(frame) => frame.type_code(),
                None => "UNKNOWN",
            };
            *stats.frame_types.entry(frame_type.to_string()).or_default() += 1;

            if let Some(asdu) = entry.frame_info.as_ref().and_then(|f| f.asdu()) {
                *stats
                    .type_ids
                    .entry(asdu.type_id_desc().to_string())
                    .or_default() += 1;
                *stats
                    .causes
                    .entry(asdu.cause_desc().into_owned())
                    .or_default() += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_line::parse_log_line;

    fn entry(line: &str) -> LogEntry {
        parse_log_line(line, 1).unwrap().unwrap()
    }

    #[test]
    fn test_empty_stats() {
        let stats = LogStats::from_entries(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.directions.len(), 3);
        assert!(stats.directions.values().all(|&n| n == 0));
        assert!(stats.frame_types.is_empty());
    }

    #[test]
    fn test_stats_counts() {
        let entries = [
            entry(r#"{"dir": "cli -> ser", "data": "68 0E 00 00 00 00 64 01 06 00 01 00 00 00 00 14"}"#),
            entry(r#"{"dir": "ser -> cli", "data": "68 0E 00 00 02 00 64 01 07 00 01 00 00 00 00 14"}"#),
            entry(r#"{"dir": "ser -> cli", "data": "68 04 01 00 04 00"}"#),
            entry(r#"{"dir": "elsewhere"}"#),
            entry(r#"{"dir": "ser -> cli", "data": "zz"}"#),
        ];
        let stats = LogStats::from_entries(&entries);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.directions["TX"], 3);
        assert_eq!(stats.directions["RX"], 1);
        assert_eq!(stats.directions["UNKNOWN"], 1);
        assert_eq!(stats.frame_types["I"], 2);
        assert_eq!(stats.frame_types["S"], 1);
        assert_eq!(stats.frame_types["UNKNOWN"], 1);
        assert_eq!(stats.frame_types["INVALID"], 1);
        assert_eq!(stats.type_ids["C_IC_NA_1 interrogation command"], 2);
        assert_eq!(stats.causes["activation"], 1);
        assert_eq!(stats.causes["activation confirmation"], 1);
    }
}
