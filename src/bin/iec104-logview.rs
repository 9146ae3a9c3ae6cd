//! Command-line viewer for IEC 60870-5-104 capture logs.
//!
//! Every command prints a JSON envelope on stdout:
//! `{"success": true, ...}` or `{"success": false, "error": "...", "status": 404}`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use iec104_logview::{
    decode_frame, list_log_files, open_log, Iec104Error, LogQuery, LogSource, LogStats,
    ViewerConfig,
};

/// Decode IEC 60870-5-104 capture logs
#[derive(Parser)]
#[command(name = "iec104-logview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true, env = "IEC104_LOGVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Base directory holding client_logs/ and server_logs/
    #[arg(short, long, global = true, default_value = ".")]
    base_dir: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a single frame given as hex tokens
    Decode {
        /// Hex bytes, e.g. 68 04 07 00 00 00
        #[arg(required = true, num_args = 1..)]
        hex: Vec<String>,
    },

    /// Decode a log file
    Log {
        /// Log file name inside the source directory
        #[arg(short, long)]
        file: Option<String>,

        /// Log source (client or server)
        #[arg(short, long, default_value = "client")]
        source: String,

        /// Decode only the last N lines
        #[arg(short, long)]
        tail: Option<usize>,

        /// Keep only frames of this type (I, S, U, INVALID, ...)
        #[arg(long)]
        filter: Option<String>,

        /// Keep only entries newer than this epoch millisecond
        #[arg(long)]
        since: Option<i64>,
    },

    /// Aggregate statistics for a log file
    Stats {
        /// Log file name inside the source directory
        #[arg(short, long)]
        file: Option<String>,

        /// Log source (client or server)
        #[arg(short, long, default_value = "client")]
        source: String,
    },

    /// List available log files
    Files,

    /// Show the active configuration
    Config,
}

fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> iec104_logview::Result<ViewerConfig> {
    match &cli.config {
        Some(path) => ViewerConfig::from_json_file(path),
        None => Ok(ViewerConfig::new(&cli.base_dir)),
    }
}

fn run(cli: &Cli) -> iec104_logview::Result<Value> {
    let config = &load_config(cli)?;

    match &cli.command {
        Commands::Decode { hex } => {
            let record = decode_frame(&hex.join(" "));
            Ok(json!({ "success": true, "frame": record }))
        }

        Commands::Log {
            file,
            source,
            tail,
            filter,
            since,
        } => {
            let file = file.as_deref().ok_or(Iec104Error::MissingParameter("file"))?;
            let source: LogSource = source.parse()?;
            let query = LogQuery {
                tail: *tail,
                filter: filter.clone(),
                since_ms: *since,
            };
            let report = open_log(config, file, source, &query)?;
            Ok(json!({
                "success": true,
                "file_info": report.file_info,
                "logs": report.logs,
            }))
        }

        Commands::Stats { file, source } => {
            let file = file.as_deref().ok_or(Iec104Error::MissingParameter("file"))?;
            let source: LogSource = source.parse()?;
            let report = open_log(config, file, source, &LogQuery::new())?;
            Ok(json!({
                "success": true,
                "stats": LogStats::from_entries(&report.logs),
            }))
        }

        Commands::Files => {
            let listing = list_log_files(config);
            Ok(json!({
                "success": true,
                "total": {
                    "client": listing.client.len(),
                    "server": listing.server.len(),
                },
                "data": listing,
            }))
        }

        Commands::Config => Ok(json!({ "success": true, "config": config.summary() })),
    }
}

/// Wrap the outcome of a command in the response envelope.
fn respond(cli: &Cli) -> Value {
    match run(cli) {
        Ok(value) => value,
        Err(e) => {
            if e.is_client_error() {
                tracing::debug!("Rejected request: {}", e);
            } else {
                tracing::warn!("Command failed: {}", e);
            }
            json!({
                "success": false,
                "error": e.to_string(),
                "status": e.status_code(),
            })
        }
    }
}

fn print(value: &Value, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let value = respond(&cli);
    print(&value, cli.pretty)?;

    if value["success"].as_bool().unwrap_or(false) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respond_to(args: &[&str]) -> Value {
        let argv = std::iter::once("iec104-logview").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();
        respond(&cli)
    }

    #[test]
    fn test_decode_envelope() {
        let value = respond_to(&["decode", "68", "04", "07", "00", "00", "00"]);
        assert_eq!(value["success"], true);
        assert_eq!(value["frame"]["function"], "STARTDT act");
    }

    #[test]
    fn test_missing_file_is_400() {
        let value = respond_to(&["log"]);
        assert_eq!(value["success"], false);
        assert_eq!(value["status"], 400);

        let value = respond_to(&["stats"]);
        assert_eq!(value["status"], 400);
    }

    #[test]
    fn test_invalid_source_is_400() {
        let value = respond_to(&["log", "--file", "a.log", "--source", "other"]);
        assert_eq!(value["success"], false);
        assert_eq!(value["status"], 400);
    }

    #[test]
    fn test_unknown_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("client_logs")).unwrap();
        let base = dir.path().to_str().unwrap();

        let value = respond_to(&["--base-dir", base, "log", "--file", "missing.log"]);
        assert_eq!(value["success"], false);
        assert_eq!(value["status"], 404);
    }

    #[test]
    fn test_bad_config_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("missing.json");

        let value = respond_to(&["--config", config.to_str().unwrap(), "config"]);
        assert_eq!(value["success"], false);
        assert_eq!(value["status"], 500);
    }

    #[test]
    fn test_log_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("server_logs");
        std::fs::create_dir(&logs).unwrap();
        std::fs::write(
            logs.join("srv.log"),
            r#"{"time_ms": 1, "dir": "ser -> cli", "data": "68 04 01 00 0A 00"}"#,
        )
        .unwrap();
        let base = dir.path().to_str().unwrap();

        let value = respond_to(&[
            "--base-dir", base, "log", "--file", "srv.log", "--source", "server", "--filter", "",
        ]);
        assert_eq!(value["success"], true);
        assert_eq!(value["file_info"]["total_lines"], 1);
        assert_eq!(value["logs"][0]["frame_info"]["recv_seq"], 5);
    }
}
