use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::imaging::{ConvertOptions, ResizeOptions};
use crate::core::split::SplitConfig;
use crate::error::{PrepError, PrepResult};

/// Input/output folders and options of the format converter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(flatten)]
    pub options: ConvertOptions,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("PetImages/Parrot"),
            output_dir: PathBuf::from("PetImages/Parrot_new"),
            options: ConvertOptions::default(),
        }
    }
}

/// Input/output folders and target size of the resizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeSettings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(flatten)]
    pub options: ResizeOptions,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("PetImages/raw/Cat"),
            output_dir: PathBuf::from("PetImages/resized/Cat_resized"),
            options: ResizeOptions::default(),
        }
    }
}

/// Settings for all three pipeline steps, stored as JSON.
///
/// Every field has a default, so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub split: SplitConfig,
    pub resize: ResizeSettings,
    pub convert: ConvertSettings,
}

impl Settings {
    /// Default settings file: `settings.json` in the platform config directory
    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "pet-dataset-prep")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from `path`, or from [`Settings::get_config_path`] when
    /// no path is given.
    ///
    /// A missing file yields defaults. A file that cannot be read or parsed is
    /// reported and defaults are used.
    pub fn load(path: Option<&Path>) -> Self {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::get_config_path() {
                Some(p) => p,
                None => {
                    warn!("Could not determine config directory. Using defaults.");
                    return Self::default();
                }
            },
        };

        info!("Loading settings from: {:?}", config_path);
        match fs::read_to_string(&config_path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(settings) => {
                    info!("Successfully loaded settings");
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings file: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(e) => {
                // It's normal for the file not to exist on first run
                if e.kind() == std::io::ErrorKind::NotFound {
                    info!("No settings file found. Using defaults.");
                } else {
                    warn!("Failed to read settings file: {}. Using defaults.", e);
                }
                Self::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> PrepResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PrepError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PrepError::Settings(format!("Failed to serialize settings: {}", e)))?;
        fs::write(path, json).map_err(|e| PrepError::io(path, e))?;

        info!("Settings saved to: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::split::SplitRatios;
    use tempfile::tempdir;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.split.seed, 42);
        assert_eq!(settings.split.ratios, SplitRatios::new(0.7, 0.15, 0.15));
        assert_eq!(settings.split.source_dir, PathBuf::from("PetImages/resized"));
        assert_eq!(settings.resize.options.width, 128);
        assert_eq!(settings.resize.options.height, 128);
        assert_eq!(settings.convert.options.prefix, "par");
        assert_eq!(settings.convert.options.quality, 95);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "split": { "seed": 7, "ratios": { "train": 0.8, "val": 0.1, "test": 0.1 } },
            "resize": { "width": 224 }
        }"#;
        let settings = Settings::from_json(json).unwrap();

        assert_eq!(settings.split.seed, 7);
        assert_eq!(settings.split.ratios.train, 0.8);
        assert_eq!(settings.split.output_dir, PathBuf::from("PetImages/splitted"));
        assert_eq!(settings.resize.options.width, 224);
        assert_eq!(settings.resize.options.height, 128);
        assert_eq!(settings.convert, ConvertSettings::default());
    }

    #[test]
    fn test_settings_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.split.seed = 1234;
        settings.convert.options.prefix = "dog".to_string();
        settings.save(&path).unwrap();

        let loaded = Settings::load(Some(&path));
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_or_corrupt_falls_back() {
        let dir = tempdir().unwrap();
        assert_eq!(
            Settings::load(Some(&dir.path().join("absent.json"))),
            Settings::default()
        );

        let corrupt = dir.path().join("corrupt.json");
        fs::write(&corrupt, "{ not json").unwrap();
        assert_eq!(Settings::load(Some(&corrupt)), Settings::default());
    }
}
