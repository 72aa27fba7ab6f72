//! Import orchestration
//!
//! A single import runs: access → format check → copy → integrity probe →
//! tag extraction → album resolution → commit. Any failure after the copy
//! removes the copy again, so a failed import leaves no managed file and no
//! library rows.

use crate::access::SourceAccess;
use crate::album_locks::AlbumKeyLocks;
use crate::metadata::{resolve, ResolvedMetadata};
use crate::placement::ManagedStorage;
use crate::probe::check_integrity;
use crate::{
    formats, ImportConfig, ImportError, ImportOutcome, ImportProgress, ImportSummary, Result,
};
use hearth_core::{
    Album, AlbumKey, AlbumResolution, CreateSong, DecodeProbe, ExtractedMetadata, ImportCommit,
    LibraryStore, MetadataExtractor, Song,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

/// Imports audio files into the managed library
///
/// Cheap to clone; clones share the album locks and collaborators.
#[derive(Clone)]
pub struct ImportPipeline {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn LibraryStore>,
    extractor: Arc<dyn MetadataExtractor>,
    probe: Arc<dyn DecodeProbe>,
    access: Arc<dyn SourceAccess>,
    storage: ManagedStorage,
    locks: AlbumKeyLocks,
    max_concurrent: usize,
}

/// A source copied into managed storage, not yet committed
struct Placed {
    managed_path: PathBuf,
    original_name: String,
}

impl ImportPipeline {
    /// Create a pipeline writing into `config.managed_root`
    pub fn new(
        store: Arc<dyn LibraryStore>,
        extractor: Arc<dyn MetadataExtractor>,
        probe: Arc<dyn DecodeProbe>,
        access: Arc<dyn SourceAccess>,
        config: ImportConfig,
    ) -> Result<Self> {
        let storage = ManagedStorage::new(&config.managed_root)?;
        Ok(Self {
            inner: Arc::new(Inner {
                store,
                extractor,
                probe,
                access,
                storage,
                locks: AlbumKeyLocks::new(),
                max_concurrent: config.max_concurrent_imports.max(1),
            }),
        })
    }

    pub fn managed_root(&self) -> &Path {
        self.inner.storage.root()
    }

    /// Import a single source
    ///
    /// Safe to call concurrently for distinct sources.
    #[instrument(skip_all, fields(source = %source.display()))]
    pub async fn import(&self, source: &Path) -> Result<Song> {
        let inner = Arc::clone(&self.inner);
        let source_owned = source.to_path_buf();

        // Copying is blocking filesystem work
        let placed = tokio::task::spawn_blocking(move || inner.place(&source_owned)).await??;

        // From here on the copy must not outlive a failure, panics included
        let managed_path = placed.managed_path.clone();
        match self.inner.finish(placed).await {
            Ok(song) => {
                info!(song_id = %song.id, title = %song.title, "Imported");
                Ok(song)
            }
            Err(e) => {
                self.inner.storage.discard(&managed_path);
                Err(e)
            }
        }
    }

    /// Import many sources concurrently
    ///
    /// Per-file failures are logged and counted; they never abort the rest
    /// of the batch. When `progress` is given, one `ImportProgress` is sent
    /// per finished file.
    pub async fn import_batch(
        &self,
        sources: Vec<PathBuf>,
        progress: Option<mpsc::Sender<ImportProgress>>,
    ) -> ImportSummary {
        let total = sources.len();
        let semaphore = Arc::new(Semaphore::new(self.inner.max_concurrent));
        let mut tasks = JoinSet::new();

        info!(total, max_concurrent = self.inner.max_concurrent, "Starting batch import");

        for source in sources {
            let pipeline = self.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                // Closed only if the semaphore is dropped, which cannot happen here
                let _permit = semaphore.acquire_owned().await.ok();
                let result = pipeline.import(&source).await;
                (source, result)
            });
        }

        let mut summary = ImportSummary {
            total,
            ..ImportSummary::default()
        };

        while let Some(joined) = tasks.join_next().await {
            let (source, outcome) = match joined {
                Ok((source, Ok(song))) => {
                    summary.imported += 1;
                    (
                        source,
                        ImportOutcome::Imported {
                            song_id: song.id,
                            title: song.title,
                        },
                    )
                }
                Ok((source, Err(e))) => {
                    summary.failed += 1;
                    warn!(source = %source.display(), error = %e, "Import failed");
                    (
                        source,
                        ImportOutcome::Failed {
                            reason: e.to_string(),
                        },
                    )
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(error = %e, "Import task failed");
                    (
                        PathBuf::new(),
                        ImportOutcome::Failed {
                            reason: e.to_string(),
                        },
                    )
                }
            };

            if let Some(tx) = &progress {
                let update = ImportProgress {
                    source,
                    outcome,
                    completed: summary.imported + summary.failed,
                    total,
                };
                if tx.send(update).await.is_err() {
                    debug!("Progress receiver dropped");
                }
            }
        }

        info!(
            total,
            imported = summary.imported,
            failed = summary.failed,
            "Batch import finished"
        );
        summary
    }
}

impl Inner {
    /// Access, format check and copy
    ///
    /// The access grant is dropped before returning on every path.
    fn place(&self, source: &Path) -> Result<Placed> {
        let _grant = self.access.acquire(source)?;

        if !formats::is_supported(source) {
            return Err(ImportError::UnsupportedFormat(source.display().to_string()));
        }

        let original_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ImportError::InvalidPath(source.display().to_string()))?
            .to_string();

        let managed_path = self.storage.place(source)?;
        Ok(Placed {
            managed_path,
            original_name,
        })
    }

    /// Integrity check, tag reading, album resolution and commit
    ///
    /// The caller discards the managed copy when this fails.
    async fn finish(&self, placed: Placed) -> Result<Song> {
        let Placed {
            managed_path,
            original_name,
        } = placed;

        let probe = Arc::clone(&self.probe);
        let path = managed_path.clone();
        let probed =
            tokio::task::spawn_blocking(move || check_integrity(probe.as_ref(), &path)).await??;

        let extractor = Arc::clone(&self.extractor);
        let path = managed_path.clone();
        let extracted = match tokio::task::spawn_blocking(move || extractor.extract(&path)).await {
            Ok(Ok(metadata)) => metadata,
            Ok(Err(e)) => {
                warn!(path = %managed_path.display(), error = %e, "Metadata extraction failed, using defaults");
                ExtractedMetadata::default()
            }
            Err(e) => {
                warn!(path = %managed_path.display(), error = %e, "Metadata extractor panicked, using defaults");
                ExtractedMetadata::default()
            }
        };

        let metadata = resolve(extracted, &original_name, probed);
        self.resolve_and_commit(&managed_path, metadata).await
    }

    async fn resolve_and_commit(&self, managed_path: &Path, metadata: ResolvedMetadata) -> Result<Song> {
        let key = AlbumKey::new(metadata.album.clone(), metadata.artist.clone());
        let _guard = self.locks.lock(&key).await;

        let existing = self
            .store
            .find_album_by_key(&key.name, &key.artist)
            .await
            .map_err(|e| ImportError::PersistenceFailure(e.to_string()))?;

        let album = match existing {
            Some(album) => {
                debug!(album_id = %album.id, "Reusing album");
                AlbumResolution::Existing {
                    album_id: album.id,
                    // Only fill artwork the album does not have yet
                    artwork: if album.artwork.is_some() {
                        None
                    } else {
                        metadata.artwork
                    },
                }
            }
            None => {
                let mut album = Album::new(key.name.clone(), key.artist.clone(), metadata.year);
                if let Some(artwork) = metadata.artwork {
                    album.fill_artwork(artwork);
                }
                debug!(album_id = %album.id, "Creating album");
                AlbumResolution::Created(album)
            }
        };

        let song = Song::new(CreateSong {
            title: metadata.title,
            artist: metadata.artist,
            album_name: metadata.album,
            duration_seconds: metadata.duration_seconds,
            storage_path: managed_path.to_path_buf(),
            track_number: metadata.track_number,
            year: metadata.year,
        })
        .with_album(album.album_id().clone());

        let commit = ImportCommit { song, album };
        self.store
            .commit_import(&commit)
            .await
            .map_err(|e| ImportError::PersistenceFailure(e.to_string()))?;

        Ok(commit.song)
    }
}
