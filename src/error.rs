//! Error types for IEC 60870-5-104 log decoding.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for decoder and log operations.
pub type Result<T> = std::result::Result<T, Iec104Error>;

/// Errors raised while decoding frames or reading log files.
///
/// Frame decoding itself never returns these to the caller: they are folded
/// into [`FrameRecord`](crate::FrameRecord) variants. They surface from the
/// log-line, log-file and configuration layers.
#[derive(Debug, Error)]
pub enum Iec104Error {
    /// A hex token could not be parsed
    #[error("Hex format error: invalid token {token:?} at position {position}")]
    HexFormat { token: String, position: usize },

    /// Invalid frame format
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Invalid ASDU or information element
    #[error("Invalid ASDU: {0}")]
    InvalidAsdu(String),

    /// Log line is not a valid JSON record
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Log line parsed as JSON but is not a log record
    #[error("Invalid log line: {0}")]
    InvalidLogLine(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required request parameter was not supplied
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// Log source other than `client` or `server`
    #[error("Invalid log source: {0}")]
    InvalidLogSource(String),

    /// File does not exist or lies outside the log directory
    #[error("File not found or path invalid: {0}")]
    FileNotFound(String),

    /// Configuration could not be loaded
    #[error("Config error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl Iec104Error {
    /// Create an invalid frame error.
    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame(msg.into())
    }

    /// Create an invalid ASDU error.
    pub fn invalid_asdu(msg: impl Into<String>) -> Self {
        Self::InvalidAsdu(msg.into())
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Check if this error was caused by the caller's input rather than the
    /// environment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_) | Self::InvalidLogSource(_) | Self::FileNotFound(_)
        )
    }

    /// HTTP-style status code used in response envelopes.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingParameter(_) | Self::InvalidLogSource(_) => 400,
            Self::FileNotFound(_) => 404,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Iec104Error::HexFormat {
            token: "zz".into(),
            position: 0,
        };
        assert_eq!(
            err.to_string(),
            "Hex format error: invalid token \"zz\" at position 0"
        );

        let err = Iec104Error::MissingParameter("file");
        assert_eq!(err.to_string(), "Missing parameter: file");

        let err = Iec104Error::invalid_asdu("float value needs 4 bytes");
        assert_eq!(err.to_string(), "Invalid ASDU: float value needs 4 bytes");
    }

    #[test]
    fn test_status_code() {
        assert_eq!(Iec104Error::MissingParameter("file").status_code(), 400);
        assert_eq!(
            Iec104Error::InvalidLogSource("other".into()).status_code(),
            400
        );
        assert_eq!(Iec104Error::FileNotFound("a.log".into()).status_code(), 404);
        assert_eq!(Iec104Error::invalid_frame("x").status_code(), 500);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(Iec104Error::from(io).status_code(), 500);
    }

    #[test]
    fn test_is_client_error() {
        assert!(Iec104Error::MissingParameter("file").is_client_error());
        assert!(Iec104Error::FileNotFound("a.log".into()).is_client_error());
        assert!(!Iec104Error::invalid_frame("x").is_client_error());
        assert!(!Iec104Error::config("cfg.json", "bad").is_client_error());
    }
}
