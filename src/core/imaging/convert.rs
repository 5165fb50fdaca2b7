//! Re-encode every image in a folder as sequentially numbered JPEG files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::core::operations::ensure_dir;
use crate::error::PrepResult;

use super::codec::{
    file_name, list_files, open_image, require_input_dir, to_rgb, write_jpeg, FileFailure,
    ImageFileError, JPEG_QUALITY,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Output files are named `<prefix>_<n>.jpg`
    pub prefix: String,
    pub quality: u8,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            prefix: "par".to_string(),
            quality: JPEG_QUALITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertStats {
    /// Every entry of the input folder, including subfolders
    pub total_files: usize,
    /// Sources that already had a `.jpg` extension
    pub already_jpeg: usize,
    pub converted: usize,
    pub errors: Vec<FileFailure>,
}

impl ConvertStats {
    /// JPEG files written to the output folder
    pub fn saved(&self) -> usize {
        self.already_jpeg + self.converted
    }

    pub fn log_summary(&self) {
        info!("Conversion summary:");
        info!("  Total files: {}", self.total_files);
        info!("  Already JPG (copied): {}", self.already_jpeg);
        info!("  Converted to JPG: {}", self.converted);
        info!("  Errors: {}", self.errors.len());
        info!("  Total JPG images saved: {}", self.saved());
    }
}

/// Convert every regular file in `input_dir` to JPEG under `output_dir`.
///
/// Files are visited in name order. Each one takes the next sequence number
/// whether or not it converts, so a failed file leaves a gap in the output
/// numbering. Unreadable files are counted in [`ConvertStats::errors`].
pub fn convert_directory(
    input_dir: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> PrepResult<ConvertStats> {
    require_input_dir(input_dir)?;
    ensure_dir(output_dir)?;

    info!("Converting images to JPG");
    info!("Input:  {:?}", input_dir);
    info!("Output: {:?}", output_dir);

    let (files, total_files) = list_files(input_dir)?;
    info!("Found {} files", total_files);

    let mut stats = ConvertStats {
        total_files,
        ..ConvertStats::default()
    };

    for (idx, path) in files.iter().enumerate() {
        let number = idx + 1;
        let filename = file_name(path);
        let new_filename = format!("{}_{}.jpg", options.prefix, number);
        let progress = format!("[{}/{}]", number, files.len());

        match convert_file(path, &output_dir.join(&new_filename), options.quality) {
            Ok(()) => {
                if has_jpg_extension(path) {
                    stats.already_jpeg += 1;
                    info!("{} Copied: {}", progress, filename);
                } else {
                    stats.converted += 1;
                    info!("{} Converted: {} -> {}", progress, filename, new_filename);
                }
            }
            Err(e) => {
                error!("{} Error: {} - {}", progress, filename, e);
                stats.errors.push(FileFailure {
                    filename,
                    error: e.to_string(),
                });
            }
        }
    }

    stats.log_summary();
    Ok(stats)
}

fn convert_file(src: &Path, dest: &Path, quality: u8) -> Result<(), ImageFileError> {
    let img = open_image(src)?;
    write_jpeg(&to_rgb(img), dest, quality)
}

fn has_jpg_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("jpg"))
        .unwrap_or(false)
}
