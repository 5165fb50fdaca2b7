use std::fs::{self, FileTimes};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::dataset::DatasetSplit;

/// Result type for file operations
pub type FileOpResult<T> = Result<T, FileOpError>;

/// Error types for file operations
#[derive(Debug, Error)]
pub enum FileOpError {
    #[error("Copy failed from {src:?} to {dest:?}: {source}")]
    CopyFailed {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create directory {path:?}: {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Copy a file byte-for-byte and carry over its permissions and timestamps.
///
/// The content copy is what matters: if the timestamps cannot be applied to
/// the destination afterwards, a warning is logged and the copy still counts.
///
/// # Returns
/// * `Ok(bytes)` number of bytes copied
/// * `Err(FileOpError::CopyFailed)` if the content could not be copied
pub fn copy_preserving(src: &Path, dest: &Path) -> FileOpResult<u64> {
    let bytes = fs::copy(src, dest).map_err(|e| FileOpError::CopyFailed {
        src: src.to_path_buf(),
        dest: dest.to_path_buf(),
        source: e,
    })?;

    if let Err(e) = copy_timestamps(src, dest) {
        warn!("Copied {:?} but could not preserve timestamps: {}", dest, e);
    }

    debug!("Copied {} bytes from {:?} to {:?}", bytes, src, dest);
    Ok(bytes)
}

fn copy_timestamps(src: &Path, dest: &Path) -> std::io::Result<()> {
    let meta = fs::metadata(src)?;
    let times = FileTimes::new()
        .set_accessed(meta.accessed()?)
        .set_modified(meta.modified()?);

    // Read-only sources produce read-only copies, which refuse a writable handle
    let file = fs::File::options()
        .write(true)
        .open(dest)
        .or_else(|_| fs::File::open(dest))?;
    file.set_times(times)
}

/// Create a directory and all parents; succeeds if it already exists.
pub fn ensure_dir(path: &Path) -> FileOpResult<()> {
    fs::create_dir_all(path).map_err(|e| FileOpError::CreateDirFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Path of the leaf folder receiving `class_name` images for `split`.
pub fn split_class_dir(output_dir: &Path, split: DatasetSplit, class_name: &str) -> PathBuf {
    output_dir.join(split.as_str()).join(class_name)
}

/// Create `output_dir/{train,val,test}/<class>` for every class.
///
/// Idempotent: existing folders are left untouched.
pub fn create_split_tree<S: AsRef<str>>(output_dir: &Path, class_names: &[S]) -> FileOpResult<()> {
    for split in DatasetSplit::all() {
        for class_name in class_names {
            ensure_dir(&split_class_dir(output_dir, split, class_name.as_ref()))?;
        }
    }
    Ok(())
}
