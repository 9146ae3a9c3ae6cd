//! Capture log files: lookup, listing and line-by-line decoding.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{LogSource, ViewerConfig};
use crate::error::{Iec104Error, Result};
use crate::log_line::{parse_log_line, LogEntry};

/// Extension of capture log files.
pub const LOG_EXTENSION: &str = "log";

/// Characters of a rejected line echoed into the log.
const LINE_PREVIEW_CHARS: usize = 100;

/// Selection applied while reading a log file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Decode only the last `tail` lines (0 or `None` means the configured maximum)
    pub tail: Option<usize>,
    /// Keep only entries whose frame type code matches (`I`, `S`, `U`, ...);
    /// an empty filter keeps everything
    pub filter: Option<String>,
    /// Keep only entries newer than this epoch millisecond
    pub since_ms: Option<i64>,
}

impl LogQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tail window.
    pub fn tail(mut self, lines: usize) -> Self {
        self.tail = Some(lines);
        self
    }

    /// Set the frame type filter.
    pub fn filter(mut self, frame_type: impl Into<String>) -> Self {
        self.filter = Some(frame_type.into());
        self
    }

    /// Set the lower time bound (exclusive).
    pub fn since_ms(mut self, since_ms: i64) -> Self {
        self.since_ms = Some(since_ms);
        self
    }

    fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(filter) = self.filter.as_deref().filter(|f| !f.is_empty()) {
            if entry.frame_type() != filter {
                return false;
            }
        }
        if let Some(since_ms) = self.since_ms {
            if entry.timestamp_ms <= since_ms {
                return false;
            }
        }
        true
    }
}

/// Resolve a user-supplied file name inside `base_dir`.
///
/// Only the last path component is used, and the result must be a regular
/// file directly inside `base_dir` once symlinks are resolved.
pub fn resolve_log_file(name: &str, base_dir: &Path) -> Result<PathBuf> {
    let not_found = || Iec104Error::FileNotFound(name.to_string());

    let file_name = Path::new(name).file_name().ok_or_else(not_found)?;
    let base = base_dir.canonicalize().map_err(|_| not_found())?;
    let path = base.join(file_name).canonicalize().map_err(|_| not_found())?;

    if path.parent() == Some(base.as_path()) && path.is_file() {
        Ok(path)
    } else {
        Err(not_found())
    }
}

/// Read and decode a log file.
///
/// Lines that fail to decode are logged and skipped; only I/O failures on
/// the file itself are returned as errors.
pub fn read_log_file(path: &Path, query: &LogQuery, config: &ViewerConfig) -> Result<Vec<LogEntry>> {
    let size = std::fs::metadata(path)?.len();
    if size > config.max_file_size {
        warn!(
            "Log file {} is large ({}), decoding may be slow",
            path.display(),
            format_file_size(size)
        );
    }

    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = text.lines().collect();

    let window = match query.tail {
        Some(tail) if tail > 0 => tail,
        _ => config.max_log_lines,
    };
    let start = lines.len() - window.min(lines.len());

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for (idx, line) in lines[start..].iter().enumerate() {
        let file_line_num = start + idx + 1;
        match parse_log_line(line, file_line_num) {
            Ok(Some(mut entry)) => {
                if query.matches(&entry) {
                    entry.line_num = idx + 1;
                    entries.push(entry);
                }
            }
            Ok(None) => {}
            Err(e) => {
                skipped += 1;
                warn!(
                    "Skipping line {} of {}: {} ({})",
                    file_line_num,
                    path.display(),
                    e,
                    preview(line)
                );
            }
        }
    }

    debug!(
        "Decoded {} entries from {} ({} lines skipped)",
        entries.len(),
        path.display(),
        skipped
    );
    Ok(entries)
}

fn preview(line: &str) -> String {
    let line = line.trim();
    match line.char_indices().nth(LINE_PREVIEW_CHARS) {
        Some((end, _)) => format!("{}...", &line[..end]),
        None => line.to_string(),
    }
}

/// Metadata of one log file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogFileInfo {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub size_formatted: String,
    /// Local modification time, `YYYY-MM-DD HH:MM:SS`
    pub modified: String,
    /// Modification time in epoch seconds
    pub modified_ts: f64,
    #[serde(rename = "type")]
    pub source: LogSource,
}

impl LogFileInfo {
    /// Collect metadata for `path`.
    pub fn from_path(path: &Path, source: LogSource) -> Result<Self> {
        let meta = std::fs::metadata(path)?;
        let modified = meta.modified()?;
        Ok(Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.display().to_string(),
            size: meta.len(),
            size_formatted: format_file_size(meta.len()),
            modified: format_system_time(modified),
            modified_ts: modified
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or_default(),
            source,
        })
    }
}

/// Log files of both capture sides, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogFileListing {
    pub client: Vec<LogFileInfo>,
    pub server: Vec<LogFileInfo>,
}

/// List the `.log` files in the configured directories.
pub fn list_log_files(config: &ViewerConfig) -> LogFileListing {
    LogFileListing {
        client: scan_directory(&config.client_logs_dir, LogSource::Client),
        server: scan_directory(&config.server_logs_dir, LogSource::Server),
    }
}

fn scan_directory(dir: &Path, source: LogSource) -> Vec<LogFileInfo> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            warn!("Cannot scan log directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<LogFileInfo> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == LOG_EXTENSION)
        })
        .filter_map(|path| match LogFileInfo::from_path(&path, source) {
            Ok(info) => Some(info),
            Err(e) => {
                warn!("Cannot stat {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    files.sort_by(|a, b| b.modified_ts.total_cmp(&a.modified_ts));
    files
}

/// Header of a decoded log file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogFileSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub source: LogSource,
    /// Number of entries returned
    pub total_lines: usize,
    pub file_size: u64,
    pub file_size_formatted: String,
    pub modified: String,
}

/// Decoded log file: header plus entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogReport {
    pub file_info: LogFileSummary,
    pub logs: Vec<LogEntry>,
}

/// Resolve `name` for `source`, then read and decode it.
pub fn open_log(
    config: &ViewerConfig,
    name: &str,
    source: LogSource,
    query: &LogQuery,
) -> Result<LogReport> {
    let path = resolve_log_file(name, config.logs_dir(source))?;
    let logs = read_log_file(&path, query, config)?;
    let info = LogFileInfo::from_path(&path, source)?;

    Ok(LogReport {
        file_info: LogFileSummary {
            name: info.name,
            source,
            total_lines: logs.len(),
            file_size: info.size,
            file_size_formatted: info.size_formatted,
            modified: info.modified,
        },
        logs,
    })
}

fn format_system_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Format a byte count with two decimals and a binary unit.
pub fn format_file_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} TB", size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const U_LINE: &str = r#"{"time_ms": 1000, "dir": "cli -> ser", "data": "68 04 07 00 00 00"}"#;
    const S_LINE: &str = r#"{"time_ms": 2000, "dir": "ser -> cli", "data": "68 04 01 00 0A 00"}"#;
    const I_LINE: &str = r#"{"time_ms": 3000, "dir": "cli -> ser", "data": "68 0E 00 00 00 00 64 01 06 00 01 00 00 00 00 14"}"#;

    fn write_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0.00 B");
        assert_eq!(format_file_size(1023), "1023.00 B");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024 * 1024), "3.00 TB");
    }

    #[test]
    fn test_read_log_file_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(dir.path(), "a.log", &[U_LINE, "", "{broken", S_LINE]);
        let config = ViewerConfig::new(dir.path());

        let entries = read_log_file(&path, &LogQuery::new(), &config).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].frame_type(), "U");
        assert_eq!(entries[0].file_line_num, 1);
        assert_eq!(entries[1].frame_type(), "S");
        assert_eq!(entries[1].file_line_num, 4);
        assert_eq!(entries[1].line_num, 4);
    }

    #[test]
    fn test_read_log_file_tail_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(dir.path(), "a.log", &[U_LINE, S_LINE, I_LINE]);
        let config = ViewerConfig::new(dir.path());

        let entries = read_log_file(&path, &LogQuery::new().tail(2), &config).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].frame_type(), "S");
        assert_eq!(entries[0].line_num, 1);
        assert_eq!(entries[0].file_line_num, 2);

        // tail larger than the file reads everything
        let entries = read_log_file(&path, &LogQuery::new().tail(50), &config).unwrap();
        assert_eq!(entries.len(), 3);

        // no tail falls back to the configured maximum
        let config = config.max_log_lines(1);
        let entries = read_log_file(&path, &LogQuery::new().tail(0), &config).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].frame_type(), "I");
    }

    #[test]
    fn test_read_log_file_filter_and_since() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(dir.path(), "a.log", &[U_LINE, S_LINE, I_LINE, U_LINE]);
        let config = ViewerConfig::new(dir.path());

        let entries = read_log_file(&path, &LogQuery::new().filter("U"), &config).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.frame_type() == "U"));

        let entries = read_log_file(&path, &LogQuery::new().since_ms(2000), &config).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].timestamp_ms, 3000);
    }

    #[test]
    fn test_read_log_file_empty_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(dir.path(), "a.log", &[U_LINE]);
        let config = ViewerConfig::new(dir.path());

        let entries = read_log_file(&path, &LogQuery::new().filter(""), &config).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_read_log_file_lossy_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.log");
        let mut bytes = U_LINE.as_bytes().to_vec();
        bytes.extend_from_slice(b"\n\xFF\xFE\n");
        bytes.extend_from_slice(S_LINE.as_bytes());
        fs::write(&path, bytes).unwrap();

        let config = ViewerConfig::new(dir.path());
        let entries = read_log_file(&path, &LogQuery::new(), &config).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_resolve_log_file() {
        let dir = tempfile::tempdir().unwrap();
        write_log(dir.path(), "a.log", &[U_LINE]);
        fs::create_dir(dir.path().join("sub")).unwrap();

        let resolved = resolve_log_file("a.log", dir.path()).unwrap();
        assert_eq!(resolved.file_name().unwrap(), "a.log");

        // directory components are stripped
        assert!(resolve_log_file("../../a.log", dir.path()).is_ok());

        for name in ["missing.log", "sub", "..", ""] {
            let err = resolve_log_file(name, dir.path()).unwrap_err();
            assert_eq!(err.status_code(), 404, "Expected 404 for {:?}", name);
        }
    }

    #[test]
    fn test_list_log_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig::new(dir.path());
        fs::create_dir(&config.client_logs_dir).unwrap();
        write_log(&config.client_logs_dir, "one.log", &[U_LINE]);
        write_log(&config.client_logs_dir, "notes.txt", &["x"]);

        let listing = list_log_files(&config);
        assert_eq!(listing.client.len(), 1);
        assert_eq!(listing.client[0].name, "one.log");
        assert_eq!(listing.client[0].source, LogSource::Client);
        // server directory does not exist
        assert!(listing.server.is_empty());
    }

    #[test]
    fn test_open_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig::new(dir.path());
        fs::create_dir(&config.server_logs_dir).unwrap();
        write_log(&config.server_logs_dir, "srv.log", &[U_LINE, S_LINE]);

        let report = open_log(&config, "srv.log", LogSource::Server, &LogQuery::new()).unwrap();
        assert_eq!(report.file_info.name, "srv.log");
        assert_eq!(report.file_info.total_lines, 2);

        let err = open_log(&config, "srv.log", LogSource::Client, &LogQuery::new()).unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(150);
        assert_eq!(preview(&long).len(), LINE_PREVIEW_CHARS + 3);
        assert_eq!(preview("short"), "short");
    }
}
