mod file_ops;

pub use file_ops::{
    copy_preserving, create_split_tree, ensure_dir, split_class_dir, FileOpError, FileOpResult,
};
