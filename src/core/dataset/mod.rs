mod dataset;

pub use dataset::{
    discover_classes, is_eligible_image, is_hidden, list_eligible_images, ClassDir,
    DatasetSplit, ELIGIBLE_EXTENSIONS,
};
