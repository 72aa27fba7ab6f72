//! Core types for playback coordination

use hearth_core::Song;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No session; initial state and the state after `stop`
    #[default]
    Idle,

    /// Opening a song on the output device
    Loading,

    Playing,

    /// Paused mid-song
    Paused,

    /// Song finished or failed mid-playback
    Stopped,

    /// Last load failed
    Error,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }

    /// Whether a song is loaded on the device
    pub fn has_session(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Error => "in error",
        };
        f.write_str(name)
    }
}

/// Failure recorded on the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum PlaybackErrorKind {
    /// Song could not be located or opened
    LoadFailure(String),

    /// Decoding failed mid-playback
    DecodeFailure(String),
}

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Position polling period while playing
    pub poll_interval: Duration,

    /// Pending caller commands before `send` waits
    pub command_buffer: usize,

    /// Events buffered per subscriber before lagging
    pub event_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            command_buffer: 32,
            event_capacity: 64,
        }
    }
}

impl PlaybackConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Observable coordinator state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,

    /// Song of the live session (or the one loading)
    pub song: Option<Song>,

    pub position: Duration,

    pub duration: Duration,

    pub is_playing: bool,

    pub last_error: Option<PlaybackErrorKind>,
}

/// Clamp a requested seek target to `[0, duration]`
///
/// NaN and negative requests land on zero.
pub fn clamp_seek(seconds: f64, duration: Duration) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    if seconds >= duration.as_secs_f64() {
        return duration;
    }
    Duration::from_secs_f64(seconds).min(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_seek_bounds() {
        let duration = Duration::from_secs(200);
        assert_eq!(clamp_seek(-5.0, duration), Duration::ZERO);
        assert_eq!(clamp_seek(50.0, duration), Duration::from_secs(50));
        assert_eq!(clamp_seek(500.0, duration), duration);
    }

    #[test]
    fn test_clamp_seek_non_finite() {
        let duration = Duration::from_secs(10);
        assert_eq!(clamp_seek(f64::NAN, duration), Duration::ZERO);
        assert_eq!(clamp_seek(f64::INFINITY, duration), duration);
        assert_eq!(clamp_seek(f64::NEG_INFINITY, duration), Duration::ZERO);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PlaybackState::Paused.to_string(), "paused");
        assert_eq!(PlaybackState::Error.to_string(), "in error");
    }

    #[test]
    fn test_default_config() {
        assert_eq!(
            PlaybackConfig::default().poll_interval,
            Duration::from_millis(250)
        );
    }
}
