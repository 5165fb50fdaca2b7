//! Stratified train/val/test splitting of a class-per-folder image dataset.
//!
//! Every class folder is shuffled with one seeded generator shared by the
//! whole run, cut at truncated ratio boundaries, and copied into
//! `output_dir/<split>/<class>/`.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn};

use crate::core::dataset::{discover_classes, DatasetSplit};
use crate::core::operations::{copy_preserving, create_split_tree, split_class_dir};
use crate::error::PrepResult;

use super::SplitRatios;

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Everything a split run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Folder holding one subfolder per class
    pub source_dir: PathBuf,
    /// Folder receiving `{train,val,test}/<class>/`
    pub output_dir: PathBuf,
    pub ratios: SplitRatios,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("PetImages/resized"),
            output_dir: PathBuf::from("PetImages/splitted"),
            ratios: SplitRatios::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// The three disjoint groups of one class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassPartition {
    pub train: Vec<String>,
    pub val: Vec<String>,
    pub test: Vec<String>,
}

impl ClassPartition {
    /// Get the filenames assigned to a specific split
    pub fn get(&self, split: DatasetSplit) -> &[String] {
        match split {
            DatasetSplit::Train => &self.train,
            DatasetSplit::Val => &self.val,
            DatasetSplit::Test => &self.test,
        }
    }

    pub fn total(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }
}

/// Shuffle `images` with `rng` and cut it at the ratio boundaries.
///
/// The caller owns the generator so that consecutive classes continue the
/// same random stream.
pub fn partition_images<R: Rng + ?Sized>(
    mut images: Vec<String>,
    ratios: &SplitRatios,
    rng: &mut R,
) -> ClassPartition {
    images.shuffle(rng);

    let (train_end, val_end) = ratios.boundaries(images.len());
    let test = images.split_off(val_end);
    let val = images.split_off(train_end);

    ClassPartition {
        train: images,
        val,
        test,
    }
}

/// Per-split sample counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCounts {
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

impl SplitCounts {
    pub fn get(&self, split: DatasetSplit) -> usize {
        match split {
            DatasetSplit::Train => self.train,
            DatasetSplit::Val => self.val,
            DatasetSplit::Test => self.test,
        }
    }

    pub fn total(&self) -> usize {
        self.train + self.val + self.test
    }

    fn accumulate(&mut self, other: &SplitCounts) {
        self.train += other.train;
        self.val += other.val;
        self.test += other.test;
    }
}

impl From<&ClassPartition> for SplitCounts {
    fn from(partition: &ClassPartition) -> Self {
        Self {
            train: partition.train.len(),
            val: partition.val.len(),
            test: partition.test.len(),
        }
    }
}

/// Split outcome of one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub name: String,
    pub counts: SplitCounts,
}

/// A file that could not be copied into the output tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyFailure {
    pub class_name: String,
    pub split: String,
    pub source: PathBuf,
    pub error: String,
}

/// Statistics of one split run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitStats {
    /// Assigned samples per split, summed over all classes
    pub totals: SplitCounts,
    /// Per-class breakdown in processing order
    pub classes: Vec<ClassSummary>,
    /// Number of files actually written
    pub copied: usize,
    pub failures: Vec<CopyFailure>,
}

impl SplitStats {
    pub fn class(&self, name: &str) -> Option<&SplitCounts> {
        self.classes.iter().find(|c| c.name == name).map(|c| &c.counts)
    }

    pub fn log_summary(&self) {
        info!("Split summary:");
        for class in &self.classes {
            info!(
                "  {}: train={} val={} test={} (total {})",
                class.name,
                class.counts.train,
                class.counts.val,
                class.counts.test,
                class.counts.total()
            );
        }
        info!(
            "  TOTAL: train={} val={} test={} (total {})",
            self.totals.train,
            self.totals.val,
            self.totals.test,
            self.totals.total()
        );
        if self.failures.is_empty() {
            info!("  Copied {} files", self.copied);
        } else {
            warn!(
                "  Copied {} files, {} failed",
                self.copied,
                self.failures.len()
            );
        }
    }
}

/// Split `config.source_dir` into `config.output_dir`.
///
/// Ratios are validated before any file system access. Copy failures are
/// recorded in [`SplitStats::failures`] and never stop the run.
pub fn split_dataset(config: &SplitConfig) -> PrepResult<SplitStats> {
    info!("Seed: {}", config.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    split_dataset_with_rng(config, &mut rng)
}

/// Same as [`split_dataset`] with a caller-provided generator.
pub fn split_dataset_with_rng<R: Rng + ?Sized>(
    config: &SplitConfig,
    rng: &mut R,
) -> PrepResult<SplitStats> {
    config.ratios.validate()?;

    info!(
        "Splitting {:?} into {:?} (train={}, val={}, test={})",
        config.source_dir,
        config.output_dir,
        config.ratios.train,
        config.ratios.val,
        config.ratios.test
    );

    let classes = discover_classes(&config.source_dir)?;
    if classes.is_empty() {
        warn!("No class folders found in {:?}", config.source_dir);
    }

    let class_names: Vec<&str> = classes.iter().map(|c| c.name.as_str()).collect();
    create_split_tree(&config.output_dir, &class_names)?;
    info!("Output directory: {:?}", config.output_dir);

    let mut stats = SplitStats::default();

    for class in &classes {
        let _span = info_span!("split_class", class = %class.name).entered();

        let images = class.image_files()?;
        let partition = partition_images(images, &config.ratios, rng);
        let counts = SplitCounts::from(&partition);

        info!(
            "{}: {} images -> train={} val={} test={}",
            class.name,
            partition.total(),
            counts.train,
            counts.val,
            counts.test
        );

        for split in DatasetSplit::all() {
            let dest_dir = split_class_dir(&config.output_dir, split, &class.name);
            copy_group(
                &class.path,
                &dest_dir,
                &class.name,
                split,
                partition.get(split),
                &mut stats,
            );
        }

        stats.totals.accumulate(&counts);
        stats.classes.push(ClassSummary {
            name: class.name.clone(),
            counts,
        });
    }

    stats.log_summary();
    Ok(stats)
}

fn copy_group(
    class_dir: &Path,
    dest_dir: &Path,
    class_name: &str,
    split: DatasetSplit,
    filenames: &[String],
    stats: &mut SplitStats,
) {
    for filename in filenames {
        let src = class_dir.join(filename);
        let dest = dest_dir.join(filename);

        match copy_preserving(&src, &dest) {
            Ok(_) => stats.copied += 1,
            Err(e) => {
                error!("Failed to copy {} to {}: {}", filename, split, e);
                stats.failures.push(CopyFailure {
                    class_name: class_name.to_string(),
                    split: split.as_str().to_string(),
                    source: src,
                    error: e.to_string(),
                });
            }
        }
    }
    debug!(
        "Copied {} files into {:?}",
        filenames.len(),
        dest_dir
    );
}
