//! Error types for playback coordination

use crate::types::PlaybackState;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// Command not allowed in the current state
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: PlaybackState,
        action: &'static str,
    },

    /// A newer `play` or a `stop` arrived before this load finished
    #[error("Superseded by a newer request")]
    Superseded,

    /// The song could not be located or opened
    #[error("Failed to load song: {0}")]
    LoadFailure(String),

    /// Output device rejected a control call
    #[error("Output device error: {0}")]
    Device(String),

    /// The coordinator task has shut down
    #[error("Playback coordinator is not running")]
    CoordinatorClosed,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

impl From<hearth_core::HearthError> for PlaybackError {
    fn from(err: hearth_core::HearthError) -> Self {
        Self::Device(err.to_string())
    }
}
