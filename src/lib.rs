//! Preparation tools for a class-per-folder image dataset: JPEG format
//! normalization, fixed-size resizing and a reproducible train/val/test split.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use error::{PrepError, PrepResult};
