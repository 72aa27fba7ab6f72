//! Expansion of import arguments into audio files

use crate::formats::is_supported;
use crate::{ImportError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Scanner for audio files in directories
#[derive(Debug, Clone, Default)]
pub struct FileScanner {
    /// Whether to follow symbolic links
    follow_links: bool,

    /// Maximum depth to traverse
    max_depth: Option<usize>,
}

impl FileScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Set maximum directory depth to traverse
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Scan a directory for supported audio files, sorted by path
    pub fn scan_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.is_dir() {
            return Err(ImportError::InvalidPath(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let mut walker = WalkDir::new(path).follow_links(self.follow_links);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut audio_files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_supported(entry.path()))
            .map(walkdir::DirEntry::into_path)
            .collect();

        audio_files.sort();
        Ok(audio_files)
    }

    /// Expand a mix of files and directories
    ///
    /// Directories contribute their supported audio files. Files are passed
    /// through untouched so the pipeline can report unsupported ones.
    pub fn expand(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut expanded = Vec::new();

        for path in paths {
            if path.is_dir() {
                match self.scan_directory(path) {
                    Ok(mut files) => expanded.append(&mut files),
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to scan"),
                }
            } else {
                expanded.push(path.clone());
            }
        }

        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn music_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        fs::create_dir(dir.path().join("disc2")).unwrap();
        fs::write(dir.path().join("disc2").join("b.FLAC"), b"x").unwrap();
        dir
    }

    #[test]
    fn test_scan_directory_filters_and_recurses() {
        let dir = music_dir();
        let files = FileScanner::new().scan_directory(dir.path()).unwrap();

        assert_eq!(
            files,
            vec![dir.path().join("a.mp3"), dir.path().join("disc2").join("b.FLAC")]
        );
    }

    #[test]
    fn test_max_depth_limits_recursion() {
        let dir = music_dir();
        let files = FileScanner::new()
            .max_depth(1)
            .scan_directory(dir.path())
            .unwrap();

        assert_eq!(files, vec![dir.path().join("a.mp3")]);
    }

    #[test]
    fn test_expand_passes_files_through() {
        let dir = music_dir();
        let loose = PathBuf::from("/elsewhere/notes.txt");

        let files = FileScanner::new().expand(&[dir.path().to_path_buf(), loose.clone()]);

        assert_eq!(files.len(), 3);
        assert_eq!(files.last(), Some(&loose));
    }

    #[test]
    fn test_scan_file_is_invalid() {
        let dir = music_dir();
        let result = FileScanner::new().scan_directory(&dir.path().join("a.mp3"));
        assert!(matches!(result, Err(ImportError::InvalidPath(_))));
    }
}
