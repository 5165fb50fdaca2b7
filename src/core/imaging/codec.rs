use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{PrepError, PrepResult};

/// JPEG quality used for every image written by this crate
pub const JPEG_QUALITY: u8 = 95;

/// Failure on a single image file
#[derive(Debug, Error)]
pub enum ImageFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A file skipped because it could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub filename: String,
    pub error: String,
}

/// Decode an image, detecting the format from content rather than extension.
pub fn open_image(path: &Path) -> Result<DynamicImage, ImageFileError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?.decode()?)
}

/// Drop alpha and expand grayscale/palette modes to 8-bit RGB.
pub fn to_rgb(img: DynamicImage) -> RgbImage {
    match img {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.into_rgb8(),
    }
}

/// Encode `img` as JPEG at `quality` and write it to `path`.
pub fn write_jpeg(img: &RgbImage, path: &Path, quality: u8) -> Result<(), ImageFileError> {
    let mut writer = BufWriter::new(File::create(path)?);
    JpegEncoder::new_with_quality(&mut writer, quality).encode_image(img)?;
    // Drop ignores flush errors; small images never leave the buffer before this
    writer.flush()?;
    Ok(())
}

/// Check that `input_dir` exists, before anything is created on disk.
pub fn require_input_dir(input_dir: &Path) -> PrepResult<()> {
    if !input_dir.exists() {
        return Err(PrepError::MissingInputDir(input_dir.to_path_buf()));
    }
    if !input_dir.is_dir() {
        return Err(PrepError::NotADirectory(input_dir.to_path_buf()));
    }
    Ok(())
}

/// Directory listing split into regular files (sorted by name) and the
/// total number of entries.
pub fn list_files(dir: &Path) -> PrepResult<(Vec<PathBuf>, usize)> {
    let entries = fs::read_dir(dir).map_err(|e| PrepError::io(dir, e))?;

    let mut total = 0;
    let mut files = Vec::new();
    for entry in entries.flatten() {
        total += 1;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok((files, total))
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
