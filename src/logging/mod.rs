//! Logging for the dataset preparation tools
//!
//! This module provides:
//! - Custom log formatting with bracketed output
//! - Optional dual logging (stdout + timestamped file)

mod formatter;
mod setup;

pub use formatter::BracketedFormatter;
pub use setup::{setup_logging, DEFAULT_LOG_LEVEL};
