//! Scoped read access to import sources
//!
//! Some hosts hand out sources behind a transient permission (a sandbox
//! bookmark, a removable volume). The pipeline acquires an `AccessGrant`
//! before reading and the grant releases the permission when dropped.

use crate::{ImportError, Result};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// RAII handle for read access to one source
pub struct AccessGrant {
    path: PathBuf,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl AccessGrant {
    /// Grant that needs no cleanup
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            release: None,
        }
    }

    /// Grant that runs `release` when dropped
    pub fn with_release(path: impl Into<PathBuf>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            path: path.into(),
            release: Some(Box::new(release)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for AccessGrant {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
        tracing::trace!(path = %self.path.display(), "Source access released");
    }
}

impl fmt::Debug for AccessGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGrant")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Acquires read access to import sources
pub trait SourceAccess: Send + Sync {
    /// # Errors
    /// Returns `ImportError::AccessDenied` when the source cannot be read
    fn acquire(&self, source: &Path) -> Result<AccessGrant>;
}

/// Plain filesystem access: the source must be a readable regular file
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceAccess;

impl SourceAccess for FsSourceAccess {
    fn acquire(&self, source: &Path) -> Result<AccessGrant> {
        let metadata =
            std::fs::metadata(source).map_err(|e| ImportError::access_denied(source, e))?;
        if !metadata.is_file() {
            return Err(ImportError::access_denied(source, "not a regular file"));
        }

        File::open(source).map_err(|e| ImportError::access_denied(source, e))?;

        Ok(AccessGrant::new(source))
    }
}
