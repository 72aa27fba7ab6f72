//! Playback Events
//!
//! Broadcast to subscribers as the coordinator changes state:
//! - State changes (load/play/pause/stop)
//! - Song changes
//! - Position updates (every poll while playing, and after seeks)
//! - Session failures

use crate::types::{PlaybackErrorKind, PlaybackState};
use hearth_core::SongId;
use serde::{Deserialize, Serialize};

/// Events emitted by the coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    StateChanged { state: PlaybackState },

    /// Current song changed; `None` when the session was cleared
    SongChanged { song_id: Option<SongId> },

    PositionUpdate { position_ms: u64, duration_ms: u64 },

    Error { error: PlaybackErrorKind },
}
