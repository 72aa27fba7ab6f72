//! Locating a song's file in managed storage
//!
//! Stored paths go stale when the managed root moves (a restored backup, a
//! new container path). Resolution is best-effort:
//!
//! 1. the stored path itself
//! 2. the stored file name directly under the managed root
//! 3. any `<token>_<original>` file in the root with the same original
//!    name, lexicographically first

use hearth_core::naming::original_file_name;
use std::fs;
use std::path::{Path, PathBuf};

pub fn resolve_song_path(stored: &Path, managed_root: &Path) -> Option<PathBuf> {
    if stored.is_file() {
        return Some(stored.to_path_buf());
    }

    let file_name = stored.file_name()?.to_str()?;

    let direct = managed_root.join(file_name);
    if direct.is_file() {
        tracing::debug!(path = %direct.display(), "Relocated by file name");
        return Some(direct);
    }

    let suffix = format!("_{}", original_file_name(file_name));
    let mut candidates: Vec<PathBuf> = fs::read_dir(managed_root)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(&suffix))
        })
        .map(|entry| entry.path())
        .collect();

    candidates.sort();
    let found = candidates.into_iter().next();
    if let Some(path) = &found {
        tracing::debug!(path = %path.display(), "Relocated by original name");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_path_wins() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("aaaa_song.mp3");
        fs::write(&path, b"x").unwrap();

        assert_eq!(resolve_song_path(&path, root.path()), Some(path));
    }

    #[test]
    fn test_same_name_in_new_root() {
        let root = tempfile::tempdir().unwrap();
        let name = "0123456789abcdef0123456789abcdef_song.mp3";
        fs::write(root.path().join(name), b"x").unwrap();

        let stale = Path::new("/old/library").join(name);
        assert_eq!(
            resolve_song_path(&stale, root.path()),
            Some(root.path().join(name))
        );
    }

    #[test]
    fn test_original_name_match_picks_first() {
        let root = tempfile::tempdir().unwrap();
        let b = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb_song.mp3";
        let a = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa_song.mp3";
        fs::write(root.path().join(b), b"x").unwrap();
        fs::write(root.path().join(a), b"x").unwrap();
        fs::write(root.path().join("cccccccccccccccccccccccccccccccc_other.mp3"), b"x").unwrap();

        let stale = Path::new("/old/library/0123456789abcdef0123456789abcdef_song.mp3");
        assert_eq!(
            resolve_song_path(stale, root.path()),
            Some(root.path().join(a))
        );
    }

    #[test]
    fn test_nothing_found() {
        let root = tempfile::tempdir().unwrap();
        let stale = Path::new("/old/library/0123456789abcdef0123456789abcdef_song.mp3");
        assert_eq!(resolve_song_path(stale, root.path()), None);
    }
}
