use std::collections::BTreeMap;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::core::operations::ensure_dir;
use crate::error::PrepResult;

use super::codec::{
    file_name, list_files, open_image, require_input_dir, to_rgb, write_jpeg, FileFailure,
    ImageFileError, JPEG_QUALITY,
};

/// Target resolution of the resizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        // 128x128x3 is what the training pipeline consumes
        Self {
            width: 128,
            height: 128,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeStats {
    pub total: usize,
    pub resized: usize,
    pub errors: Vec<FileFailure>,
    /// Histogram of source resolutions, keyed `WxH`
    pub original_sizes: BTreeMap<String, usize>,
}

impl ResizeStats {
    pub fn log_summary(&self) {
        info!(
            "Resized {} of {} images ({} errors)",
            self.resized,
            self.total,
            self.errors.len()
        );
        for (size, count) in &self.original_sizes {
            debug!("  original {}: {}", size, count);
        }
    }
}

/// Resize every file in `input_dir` to exactly `options` and save it as JPEG
/// under the same filename in `output_dir`.
///
/// Aspect ratio is not preserved. Lanczos3 is used for resampling.
pub fn resize_directory(
    input_dir: &Path,
    output_dir: &Path,
    options: &ResizeOptions,
) -> PrepResult<ResizeStats> {
    info!("Input: {:?}", input_dir);
    info!("Output: {:?}", output_dir);

    require_input_dir(input_dir)?;
    ensure_dir(output_dir)?;

    let (files, _) = list_files(input_dir)?;
    info!("Total: {} images", files.len());

    let mut stats = ResizeStats {
        total: files.len(),
        ..ResizeStats::default()
    };

    for path in &files {
        let filename = file_name(path);
        let result = open_image(path).and_then(|img| {
            *stats
                .original_sizes
                .entry(format!("{}x{}", img.width(), img.height()))
                .or_insert(0) += 1;
            resize_and_save(img, &output_dir.join(&filename), options)
        });
        match result {
            Ok(()) => stats.resized += 1,
            Err(e) => {
                error!("Error {}: {}", filename, e);
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

fn resize_and_save(
    img: DynamicImage,
    dest: &Path,
    options: &ResizeOptions,
) -> Result<(), ImageFileError> {
    let rgb = to_rgb(img);
    let resized = imageops::resize(&rgb, options.width, options.height, FilterType::Lanczos3);
    write_jpeg(&resized, dest, JPEG_QUALITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, ImageReader, Rgb, RgbImage};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_resize_folder() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();

        RgbImage::from_pixel(300, 200, Rgb([120, 60, 30]))
            .save(input.path().join("cat_1.png"))
            .unwrap();
        RgbImage::from_pixel(300, 200, Rgb([20, 60, 130]))
            .save(input.path().join("cat_2.jpg"))
            .unwrap();
        GrayImage::new(50, 60)
            .save(input.path().join("cat_3.png"))
            .unwrap();
        fs::write(input.path().join("cat_4.jpg"), b"truncated").unwrap();

        let stats =
            resize_directory(input.path(), output.path(), &ResizeOptions::default()).unwrap();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.resized, 3);
        assert_eq!(stats.errors.len(), 1);
        assert_eq!(stats.errors[0].filename, "cat_4.jpg");
        assert_eq!(stats.original_sizes.get("300x200"), Some(&2));
        assert_eq!(stats.original_sizes.get("50x60"), Some(&1));

        for name in ["cat_1.png", "cat_2.jpg", "cat_3.png"] {
            let reader = ImageReader::open(output.path().join(name))
                .unwrap()
                .with_guessed_format()
                .unwrap();
            assert_eq!(reader.format(), Some(ImageFormat::Jpeg));
            let img = reader.decode().unwrap();
            assert_eq!((img.width(), img.height()), (128, 128));
        }
        assert!(!output.path().join("cat_4.jpg").exists());
    }

    #[test]
    fn test_resize_custom_target() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        RgbImage::new(40, 40).save(input.path().join("dog.png")).unwrap();

        let options = ResizeOptions {
            width: 32,
            height: 16,
        };
        resize_directory(input.path(), output.path(), &options).unwrap();

        // Saved under the .png name but with JPEG content
        let img = ImageReader::open(output.path().join("dog.png"))
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();
        assert_eq!((img.width(), img.height()), (32, 16));
    }

    #[test]
    fn test_failed_write_still_counts_source_size() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        RgbImage::new(64, 48).save(input.path().join("cat_1.png")).unwrap();
        RgbImage::new(20, 20).save(input.path().join("cat_2.png")).unwrap();
        // A directory in place of the output file makes the write fail after decode
        fs::create_dir(output.path().join("cat_1.png")).unwrap();

        let stats =
            resize_directory(input.path(), output.path(), &ResizeOptions::default()).unwrap();

        assert_eq!(stats.resized, 1);
        assert_eq!(stats.errors.len(), 1);
        assert_eq!(stats.errors[0].filename, "cat_1.png");
        assert_eq!(stats.original_sizes.get("64x48"), Some(&1));
        assert_eq!(stats.original_sizes.get("20x20"), Some(&1));
    }

    #[test]
    fn test_resize_missing_input() {
        let root = tempdir().unwrap();
        let output = root.path().join("Cat_resized");
        let result = resize_directory(&root.path().join("Cat"), &output, &ResizeOptions::default());

        assert!(result.is_err());
        assert!(!output.exists());
    }
}
