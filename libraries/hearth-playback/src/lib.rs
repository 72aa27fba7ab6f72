//! Hearth - Playback Coordination
//!
//! Drives a single playback session against an `OutputDevice`.
//!
//! This crate provides:
//! - An explicit state machine (`Idle`, `Loading`, `Playing`, `Paused`,
//!   `Stopped`, `Error`)
//! - Supersession of in-flight loads by a newer `play` or a `stop`
//! - Seek clamped to the song's duration
//! - Position polling while playing, cancelled on every exit from `Playing`
//! - Snapshot (`watch`) and event (`broadcast`) observers
//! - Best-effort now-playing publishing
//! - Relocation of song files when the managed root has moved
//!
//! # Architecture
//!
//! The coordinator is a single task that owns the device. The
//! `PlaybackCoordinator` handle is `Clone` and talks to it by message, so no
//! lock guards the session state.
//!
//! # Example
//!
//! ```rust,no_run
//! use hearth_playback::{PlaybackConfig, PlaybackCoordinator};
//! # use hearth_core::{NowPlayingSurface, OutputDevice, Song};
//! # use std::sync::Arc;
//! # async fn example(
//! #     device: Box<dyn OutputDevice>,
//! #     surface: Arc<dyn NowPlayingSurface>,
//! #     song: Song,
//! # ) -> hearth_playback::Result<()> {
//!
//! let player = PlaybackCoordinator::spawn(device, surface, "/library", PlaybackConfig::default());
//!
//! player.play(song).await?;
//! player.seek(30.0).await?;
//! player.pause().await?;
//! assert!(!player.snapshot().is_playing);
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod error;
pub mod events;
pub mod relocate;
pub mod types;

pub use coordinator::PlaybackCoordinator;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use types::{
    clamp_seek, PlaybackConfig, PlaybackErrorKind, PlaybackSnapshot, PlaybackState,
};
