mod ratios;
mod splitter;

pub use ratios::{SplitRatios, RATIO_SUM_TOLERANCE};
pub use splitter::{
    partition_images, split_dataset, split_dataset_with_rng, ClassPartition, ClassSummary,
    CopyFailure, SplitConfig, SplitCounts, SplitStats, DEFAULT_SEED,
};
