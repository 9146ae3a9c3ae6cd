//! Viewer configuration.
//!
//! Log files are kept in two directories, one per capture side. Settings can
//! be built in code or loaded from a JSON file:
//!
//! ```text
//! {
//!     "client_logs_dir": "client_logs",
//!     "server_logs_dir": "/var/log/iec104/server",
//!     "max_log_lines": 5000
//! }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Iec104Error, Result};
use crate::log_file::format_file_size;

/// Default number of trailing lines decoded when no tail is requested.
pub const DEFAULT_MAX_LOG_LINES: usize = 10_000;

/// Default file size above which a warning is logged (100 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Which side of the link a log file was captured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    /// Client (master) side capture
    Client,
    /// Server (controlled station) side capture
    Server,
}

impl LogSource {
    /// Name used in requests and listings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl FromStr for LogSource {
    type Err = Iec104Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "client" => Ok(Self::Client),
            "server" => Ok(Self::Server),
            other => Err(Iec104Error::InvalidLogSource(other.to_string())),
        }
    }
}

impl std::fmt::Display for LogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Directory holding client-side logs
    pub client_logs_dir: PathBuf,
    /// Directory holding server-side logs
    pub server_logs_dir: PathBuf,
    /// Lines decoded from the end of a file when no tail is given
    pub max_log_lines: usize,
    /// File size that triggers a warning
    pub max_file_size: u64,
}

impl ViewerConfig {
    /// Create a configuration rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref();
        Self {
            client_logs_dir: base_dir.join("client_logs"),
            server_logs_dir: base_dir.join("server_logs"),
            max_log_lines: DEFAULT_MAX_LOG_LINES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set the client log directory.
    pub fn client_logs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.client_logs_dir = dir.into();
        self
    }

    /// Set the server log directory.
    pub fn server_logs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.server_logs_dir = dir.into();
        self
    }

    /// Set the default line window.
    pub fn max_log_lines(mut self, lines: usize) -> Self {
        self.max_log_lines = lines;
        self
    }

    /// Set the file size warning threshold.
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Directory for the given log source.
    pub fn logs_dir(&self, source: LogSource) -> &Path {
        match source {
            LogSource::Client => &self.client_logs_dir,
            LogSource::Server => &self.server_logs_dir,
        }
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing keys keep their defaults, with the file's directory as base.
    /// Relative directories are resolved against the file's directory.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Iec104Error::config(path, e.to_string()))?;
        let file: ConfigFile =
            serde_json::from_str(&text).map_err(|e| Iec104Error::config(path, e.to_string()))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut config = Self::new(base_dir);
        if let Some(dir) = file.client_logs_dir {
            config.client_logs_dir = base_dir.join(dir);
        }
        if let Some(dir) = file.server_logs_dir {
            config.server_logs_dir = base_dir.join(dir);
        }
        if let Some(lines) = file.max_log_lines {
            config.max_log_lines = lines;
        }
        if let Some(size) = file.max_file_size {
            config.max_file_size = size;
        }
        Ok(config)
    }

    /// Serializable summary of the active settings.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            max_log_lines: self.max_log_lines,
            max_file_size: self.max_file_size,
            max_file_size_formatted: format_file_size(self.max_file_size),
            client_logs_dir: self.client_logs_dir.display().to_string(),
            server_logs_dir: self.server_logs_dir.display().to_string(),
        }
    }
}

/// On-disk configuration layout; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    client_logs_dir: Option<PathBuf>,
    server_logs_dir: Option<PathBuf>,
    max_log_lines: Option<usize>,
    max_file_size: Option<u64>,
}

/// Active settings as reported to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSummary {
    pub max_log_lines: usize,
    pub max_file_size: u64,
    pub max_file_size_formatted: String,
    pub client_logs_dir: String,
    pub server_logs_dir: String,
}
