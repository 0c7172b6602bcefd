//! Managed storage for product artwork.
//!
//! Artwork is copied into one directory as `{id}_{name}{ext}`; the ledger
//! only keeps the returned reference. Copying happens before the ledger
//! write, so a failed registration can leave a stray file behind but never a
//! dangling reference.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Copies artwork into the images directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ImageStore { dir: dir.into() }
    }

    /// Copies `source` to `{dir}/{id}_{name}{ext}` and returns the
    /// destination path as the reference string.
    ///
    /// An existing file with the same name is overwritten.
    pub fn store(&self, source: &Path, id: &str, name: &str) -> AppResult<String> {
        if !source.is_file() {
            return Err(AppError::validation(format!(
                "Image not found: {}",
                source.display()
            )));
        }

        fs::create_dir_all(&self.dir)?;

        let ext = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let file_name = format!("{}_{}{}", sanitize(id), sanitize(name), ext);
        let destination = self.dir.join(file_name);

        fs::copy(source, &destination)?;

        info!(source = %source.display(), destination = %destination.display(), "Image stored");
        Ok(destination.to_string_lossy().into_owned())
    }
}

/// Replaces characters that would escape the images directory.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_store_copies_with_id_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.PNG");
        fs::write(&source, b"png-bytes").unwrap();

        let store = ImageStore::new(dir.path().join("imagens"));
        let reference = store.store(&source, "P1", "Widget Azul").unwrap();

        let expected = dir.path().join("imagens").join("P1_Widget Azul.PNG");
        assert_eq!(PathBuf::from(&reference), expected);
        assert_eq!(fs::read(expected).unwrap(), b"png-bytes");
        assert!(source.exists());
    }

    #[test]
    fn test_store_sanitizes_separators_and_handles_no_extension() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("raw");
        fs::write(&source, b"x").unwrap();

        let store = ImageStore::new(dir.path().join("imagens"));
        let reference = store.store(&source, "a/b", "c\\d").unwrap();

        assert_eq!(
            PathBuf::from(reference),
            dir.path().join("imagens").join("a_b_c_d")
        );
    }

    #[test]
    fn test_missing_source_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let err = store
            .store(&dir.path().join("missing.jpg"), "P1", "Widget")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
