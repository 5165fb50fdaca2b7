use serde::{Deserialize, Serialize};

use crate::core::dataset::DatasetSplit;
use crate::error::{PrepError, PrepResult};

/// Allowed distance between the ratio sum and 1.0
pub const RATIO_SUM_TOLERANCE: f64 = 0.001;

/// Train/val/test fractions of every class.
///
/// Boundaries are computed by truncation, never rounding: the train and val
/// counts are floored and whatever is left over lands in test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    pub train: f64, // e.g., 0.70 for 70%
    pub val: f64,   // e.g., 0.15 for 15%
    pub test: f64,  // e.g., 0.15 for 15%
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.70,
            val: 0.15,
            test: 0.15,
        }
    }
}

impl SplitRatios {
    pub fn new(train: f64, val: f64, test: f64) -> Self {
        Self { train, val, test }
    }

    /// Get the ratio for a specific split
    pub fn get(&self, split: DatasetSplit) -> f64 {
        match split {
            DatasetSplit::Train => self.train,
            DatasetSplit::Val => self.val,
            DatasetSplit::Test => self.test,
        }
    }

    pub fn sum(&self) -> f64 {
        self.train + self.val + self.test
    }

    /// Reject negative fractions and sums outside 1.0 ± [`RATIO_SUM_TOLERANCE`].
    pub fn validate(&self) -> PrepResult<()> {
        for split in DatasetSplit::all() {
            let value = self.get(split);
            if value.is_nan() || value < 0.0 {
                return Err(PrepError::NegativeRatio {
                    name: split.as_str(),
                    value,
                });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() >= RATIO_SUM_TOLERANCE {
            return Err(PrepError::InvalidRatios { sum });
        }
        Ok(())
    }

    /// Slice boundaries `(train_end, val_end)` for a class of `total` images.
    ///
    /// `train = [0, train_end)`, `val = [train_end, val_end)`,
    /// `test = [val_end, total)`.
    pub fn boundaries(&self, total: usize) -> (usize, usize) {
        let train_count = (total as f64 * self.train).floor() as usize;
        let val_count = (total as f64 * self.val).floor() as usize;

        let train_end = train_count.min(total);
        let val_end = (train_end + val_count).min(total);
        (train_end, val_end)
    }
}
