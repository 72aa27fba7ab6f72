//! Managed storage root
//!
//! Every imported file is copied (never moved) into one flat directory as
//! `<token>_<original-filename>`, where the token is a fresh UUID. The
//! original name stays recoverable from the suffix.

use crate::{ImportError, Result};
use hearth_core::naming::managed_file_name;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ManagedStorage {
    root: PathBuf,
}

impl ManagedStorage {
    /// Use `root` as the managed directory, creating it if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy `source` into the managed root
    ///
    /// A partially written copy is removed before the error is returned.
    pub fn place(&self, source: &Path) -> Result<PathBuf> {
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ImportError::InvalidPath(source.display().to_string()))?;

        let dest = self.root.join(managed_file_name(file_name));

        if let Err(e) = fs::copy(source, &dest) {
            self.discard(&dest);
            return Err(e.into());
        }

        tracing::debug!(source = %source.display(), dest = %dest.display(), "Copied into managed storage");
        Ok(dest)
    }

    /// Best-effort removal of a managed copy
    pub fn discard(&self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "Discarded managed copy"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to discard managed copy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_copies_and_keeps_source() {
        let src_dir = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("track.flac");
        fs::write(&source, b"fLaC").unwrap();

        let storage = ManagedStorage::new(root.path()).unwrap();
        let placed = storage.place(&source).unwrap();

        assert!(source.exists());
        assert!(placed.starts_with(root.path()));
        assert_eq!(fs::read(&placed).unwrap(), b"fLaC");
    }

    #[test]
    fn test_same_name_twice_gets_distinct_paths() {
        let src_dir = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("track.mp3");
        fs::write(&source, b"x").unwrap();

        let storage = ManagedStorage::new(root.path()).unwrap();
        let first = storage.place(&source).unwrap();
        let second = storage.place(&source).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_place_missing_source_leaves_nothing() {
        let root = tempfile::tempdir().unwrap();
        let storage = ManagedStorage::new(root.path()).unwrap();

        assert!(storage.place(Path::new("/missing/track.mp3")).is_err());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
