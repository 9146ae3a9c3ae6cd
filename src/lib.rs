//! # iec104_logview
//!
//! Offline decoder for captured IEC 60870-5-104 traffic.
//!
//! Capture tools write one JSON record per frame, with the frame itself as a
//! hex string. This crate turns those records into structured, human-readable
//! frame descriptions for operators inspecting SCADA/RTU logs.
//!
//! ## Quick Start
//!
//! ```rust
//! use iec104_logview::decode_frame;
//!
//! let record = decode_frame("68 0E 00 00 00 00 64 01 06 00 01 00 00 00 00 14");
//! assert_eq!(record.type_code(), "I");
//!
//! let asdu = record.asdu().unwrap();
//! assert_eq!(asdu.type_id, 0x64);
//! assert_eq!(asdu.cause_desc(), "activation");
//!
//! // Flat JSON layout for viewers
//! let json = serde_json::to_value(&record).unwrap();
//! assert_eq!(json["qoi_desc"], "general interrogation");
//! ```
//!
//! ## Decoding model
//!
//! Decoding is a pure function of its input. It never fails: malformed input
//! becomes [`FrameRecord::Invalid`], a structural failure becomes
//! [`FrameRecord::Error`], and frames shorter than their declared length are
//! decoded as far as the bytes allow.
//!
//! ### APDU Structure
//!
//! ```text
//! APCI (6 bytes):
//! +--------+--------+--------+--------+--------+--------+
//! | 0x68   | Length | Control Field (4 bytes)           |
//! +--------+--------+--------+--------+--------+--------+
//! ```
//!
//! - **I-frame**: Information transfer (contains ASDU)
//! - **S-frame**: Supervisory (acknowledgment)
//! - **U-frame**: Unnumbered (control: STARTDT, STOPDT, TESTFR)

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod hex;
pub mod log_file;
pub mod log_line;
pub mod parser;
pub mod stats;
pub mod types;

// Re-export main types
pub use config::{ConfigSummary, LogSource, ViewerConfig};
pub use decoder::{decode_asdu, decode_bytes, decode_frame};
pub use error::{Iec104Error, Result};
pub use frame::{DecodedFrame, FrameRecord};
pub use log_file::{
    format_file_size, list_log_files, open_log, read_log_file, resolve_log_file, LogFileInfo,
    LogFileListing, LogQuery, LogReport,
};
pub use log_line::{parse_log_line, Direction, LogEntry};
pub use parser::parse_information_element;
pub use stats::LogStats;
pub use types::*;
