use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;
use crate::error::{PrepError, PrepResult};

/// Level used when `RUST_LOG` is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Install the global subscriber: bracketed lines on stdout, plus a
/// timestamped log file when `log_dir` is given.
///
/// Returns the path of the log file, if one was created.
pub fn setup_logging(log_dir: Option<&Path>) -> PrepResult<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let stdout_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(std::io::stdout);

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| PrepError::io(dir, e))?;
            let log_path = dir.join(log_file_name(chrono::Local::now()));
            let file = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&log_path)
                .map_err(|e| PrepError::io(&log_path, e))?;

            let layer = fmt::layer()
                .event_format(BracketedFormatter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false); // Disable ANSI colors in file
            (Some(layer), Some(log_path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| PrepError::Settings(format!("Failed to install logger: {}", e)))?;

    if let Some(path) = &log_path {
        info!("Log file created at: {:?}", path);
    }

    Ok(log_path)
}

fn log_file_name<Tz: chrono::TimeZone>(now: chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("pet_dataset_prep_{}.log", now.format("%Y%m%d_%H%M%S"))
}
