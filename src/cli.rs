//! Command line surface. Flags override values loaded from the settings file.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ConvertSettings, ResizeSettings, Settings};
use crate::core::split::SplitConfig;

#[derive(Parser, Debug)]
#[command(name = "pet-dataset-prep")]
#[command(about = "Convert, resize and split a class-per-folder image dataset")]
pub struct Cli {
    /// Settings file (defaults to settings.json in the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split class folders into train/val/test
    Split(SplitArgs),
    /// Re-encode every image of a folder as numbered JPEG files
    Convert(ConvertArgs),
    /// Resize every image of a folder to a fixed resolution
    Resize(ResizeArgs),
    /// Write the effective settings to the settings file
    InitConfig,
}

#[derive(Args, Debug, Default)]
pub struct SplitArgs {
    /// Folder with one subfolder per class
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Folder receiving train/, val/ and test/
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub train: Option<f64>,

    #[arg(long)]
    pub val: Option<f64>,

    #[arg(long)]
    pub test: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SplitArgs {
    pub fn apply(&self, config: &mut SplitConfig) {
        if let Some(source) = &self.source {
            config.source_dir = source.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(train) = self.train {
            config.ratios.train = train;
        }
        if let Some(val) = self.val {
            config.ratios.val = val;
        }
        if let Some(test) = self.test {
            config.ratios.test = test;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output names become <prefix>_<n>.jpg
    #[arg(long)]
    pub prefix: Option<String>,

    /// JPEG quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,
}

impl ConvertArgs {
    pub fn apply(&self, settings: &mut ConvertSettings) {
        if let Some(input) = &self.input {
            settings.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            settings.output_dir = output.clone();
        }
        if let Some(prefix) = &self.prefix {
            settings.options.prefix = prefix.clone();
        }
        if let Some(quality) = self.quality {
            settings.options.quality = quality;
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ResizeArgs {
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,
}

impl ResizeArgs {
    pub fn apply(&self, settings: &mut ResizeSettings) {
        if let Some(input) = &self.input {
            settings.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            settings.output_dir = output.clone();
        }
        if let Some(width) = self.width {
            settings.options.width = width;
        }
        if let Some(height) = self.height {
            settings.options.height = height;
        }
    }
}

impl Cli {
    /// Merge subcommand flags into `settings`
    pub fn apply(&self, settings: &mut Settings) {
        match &self.command {
            Command::Split(args) => args.apply(&mut settings.split),
            Command::Convert(args) => args.apply(&mut settings.convert),
            Command::Resize(args) => args.apply(&mut settings.resize),
            Command::InitConfig => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::split::SplitRatios;

    #[test]
    fn test_split_flags_override_settings() {
        let cli = Cli::try_parse_from([
            "pet-dataset-prep",
            "split",
            "--source",
            "data/resized",
            "--train",
            "0.8",
            "--val",
            "0.1",
            "--test",
            "0.1",
            "--seed",
            "7",
        ])
        .unwrap();

        let mut settings = Settings::default();
        cli.apply(&mut settings);

        assert_eq!(settings.split.source_dir, PathBuf::from("data/resized"));
        assert_eq!(settings.split.output_dir, PathBuf::from("PetImages/splitted"));
        assert_eq!(settings.split.ratios, SplitRatios::new(0.8, 0.1, 0.1));
        assert_eq!(settings.split.seed, 7);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pet-dataset-prep",
            "resize",
            "--width",
            "64",
            "--config",
            "custom.json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.json")));
        let mut settings = Settings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.resize.options.width, 64);
        assert_eq!(settings.resize.options.height, 128);
    }

    #[test]
    fn test_convert_quality_range() {
        assert!(Cli::try_parse_from(["pet-dataset-prep", "convert", "--quality", "0"]).is_err());
        let cli =
            Cli::try_parse_from(["pet-dataset-prep", "convert", "--prefix", "dog"]).unwrap();
        let mut settings = Settings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.convert.options.prefix, "dog");
        assert_eq!(settings.convert.options.quality, 95);
    }

    #[test]
    fn test_resize_rejects_zero_dimensions() {
        assert!(Cli::try_parse_from(["pet-dataset-prep", "resize", "--width", "0"]).is_err());
        assert!(Cli::try_parse_from(["pet-dataset-prep", "resize", "--height", "0"]).is_err());
        assert!(Cli::try_parse_from(["pet-dataset-prep", "resize", "--width", "1"]).is_ok());
    }
}
