//! Output path derivation and directory preparation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ImageProcessorError, Result};

/// Used when the image did not come from a file.
pub const FALLBACK_OUTPUT: &str = "processed_image.jpg";

/// `<dir>/<stem>_processed<.ext>` for `source`, or [`FALLBACK_OUTPUT`].
pub fn default_output_path(source: Option<&Path>) -> PathBuf {
    let Some(source) = source else {
        return PathBuf::from(FALLBACK_OUTPUT);
    };

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match source.extension() {
        Some(ext) => format!("{stem}_processed.{}", ext.to_string_lossy()),
        None => format!("{stem}_processed"),
    };

    match source.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// `<dir>/processed_<stem>.jpg`, the naming used for directory runs.
pub fn batch_output_path(dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!("processed_{stem}.jpg"))
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ImageProcessorError::Filesystem {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_keeps_dir_and_extension() {
        assert_eq!(
            default_output_path(Some(Path::new("photos/2024/cat.jpeg"))),
            PathBuf::from("photos/2024/cat_processed.jpeg")
        );
        assert_eq!(
            default_output_path(Some(Path::new("cat.png"))),
            PathBuf::from("cat_processed.png")
        );
    }

    #[test]
    fn test_default_output_path_without_extension() {
        assert_eq!(
            default_output_path(Some(Path::new("scans/raw"))),
            PathBuf::from("scans/raw_processed")
        );
    }

    #[test]
    fn test_default_output_path_only_strips_last_extension() {
        assert_eq!(
            default_output_path(Some(Path::new("a/b.tar.png"))),
            PathBuf::from("a/b.tar_processed.png")
        );
    }

    #[test]
    fn test_default_output_path_without_source() {
        assert_eq!(default_output_path(None), PathBuf::from(FALLBACK_OUTPUT));
    }

    #[test]
    fn test_batch_output_path() {
        assert_eq!(
            batch_output_path(Path::new("out"), Path::new("images/dog.PNG")),
            PathBuf::from("out/processed_dog.jpg")
        );
    }

    #[test]
    fn test_ensure_parent_dir_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("x/y/z.png");
        ensure_parent_dir(&target).unwrap();
        assert!(tmp.path().join("x/y").is_dir());
    }

    #[test]
    fn test_ensure_parent_dir_reports_blocked_path() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("plain");
        std::fs::write(&file, b"x").unwrap();
        let err = ensure_parent_dir(&file.join("sub/out.png")).unwrap_err();
        assert!(matches!(err, ImageProcessorError::Filesystem { .. }));
    }
}
