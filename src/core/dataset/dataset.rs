use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{PrepError, PrepResult};

/// Extensions a file must end with to take part in a split.
///
/// Only `.jpg` is accepted; `.jpeg` and `.png` files present in a class folder
/// are skipped. The converter normalizes everything to `.jpg` beforehand.
pub const ELIGIBLE_EXTENSIONS: &[&str] = &["jpg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetSplit {
    Train,
    Val,
    Test,
}

impl DatasetSplit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Val => "val",
            DatasetSplit::Test => "test",
        }
    }

    /// All splits, in output order
    pub fn all() -> [DatasetSplit; 3] {
        [DatasetSplit::Train, DatasetSplit::Val, DatasetSplit::Test]
    }
}

impl std::fmt::Display for DatasetSplit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One class folder of the source dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDir {
    /// Folder name, used as the class label
    pub name: String,
    /// Full path of the class folder
    pub path: PathBuf,
}

impl ClassDir {
    /// Eligible image filenames in this class, sorted by name
    pub fn image_files(&self) -> PrepResult<Vec<String>> {
        list_eligible_images(&self.path)
    }
}

/// Returns true for names that should never be treated as a class or image
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Case-insensitive check against [`ELIGIBLE_EXTENSIONS`].
pub fn is_eligible_image(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            ELIGIBLE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Discover class folders directly under `source_dir`.
///
/// Every immediate subdirectory whose name does not start with `.` is a class.
/// Plain files are ignored. The result is sorted by name so that runs with the
/// same seed visit classes in the same order.
pub fn discover_classes(source_dir: &Path) -> PrepResult<Vec<ClassDir>> {
    if !source_dir.exists() {
        return Err(PrepError::MissingInputDir(source_dir.to_path_buf()));
    }
    if !source_dir.is_dir() {
        return Err(PrepError::NotADirectory(source_dir.to_path_buf()));
    }

    let entries = fs::read_dir(source_dir).map_err(|e| PrepError::io(source_dir, e))?;

    let mut classes = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if is_hidden(&name) {
            debug!("Skipping hidden entry {:?}", path);
            continue;
        }
        if !path.is_dir() {
            continue;
        }

        classes.push(ClassDir { name, path });
    }

    classes.sort_by(|a, b| a.name.cmp(&b.name));
    info!(
        "Found {} classes in {:?}: {}",
        classes.len(),
        source_dir,
        classes
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(classes)
}

/// List eligible image filenames inside one class folder, sorted by name.
pub fn list_eligible_images(class_dir: &Path) -> PrepResult<Vec<String>> {
    let entries = fs::read_dir(class_dir).map_err(|e| PrepError::io(class_dir, e))?;

    let mut images = Vec::new();
    let mut skipped = 0usize;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if is_eligible_image(&path) {
            images.push(entry.file_name().to_string_lossy().to_string());
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!(
            "Skipped {} non-.jpg files in {:?}",
            skipped, class_dir
        );
    }

    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_split_names() {
        assert_eq!(DatasetSplit::Train.as_str(), "train");
        assert_eq!(DatasetSplit::Val.as_str(), "val");
        assert_eq!(DatasetSplit::Test.as_str(), "test");
        assert_eq!(DatasetSplit::all().len(), 3);
    }

    #[test]
    fn test_hidden_directories_are_not_classes() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Cat_resized")).unwrap();
        fs::create_dir(dir.path().join("Dog_resized")).unwrap();
        fs::create_dir(dir.path().join(".ipynb_checkpoints")).unwrap();
        fs::write(dir.path().join("notes.txt"), b"not a class").unwrap();

        let classes = discover_classes(dir.path()).unwrap();
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cat_resized", "Dog_resized"]);
    }

    #[test]
    fn test_missing_source_dir() {
        let dir = tempdir().unwrap();
        let result = discover_classes(&dir.path().join("nope"));
        assert!(matches!(result, Err(PrepError::MissingInputDir(_))));
    }

    #[test]
    fn test_only_jpg_is_eligible() {
        // .jpeg and .png are skipped on purpose; only .jpg in any case counts
        let dir = tempdir().unwrap();
        for name in ["a.jpg", "b.JPG", "c.Jpg", "d.jpeg", "e.png", "f", "g.jpg.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let images = list_eligible_images(dir.path()).unwrap();
        assert_eq!(images, vec!["a.jpg", "b.JPG", "c.Jpg"]);
    }

    #[test]
    fn test_class_image_files_sorted() {
        let dir = tempdir().unwrap();
        let class_path = dir.path().join("Parrot");
        fs::create_dir(&class_path).unwrap();
        for name in ["par_3.jpg", "par_1.jpg", "par_2.jpg"] {
            fs::write(class_path.join(name), b"x").unwrap();
        }

        let class = ClassDir {
            name: "Parrot".to_string(),
            path: class_path,
        };
        assert_eq!(
            class.image_files().unwrap(),
            vec!["par_1.jpg", "par_2.jpg", "par_3.jpg"]
        );
    }
}
