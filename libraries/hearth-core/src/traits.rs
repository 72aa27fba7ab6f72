/// Core traits for Hearth collaborators
///
/// The import pipeline and the playback coordinator talk to the outside
/// world only through these seams. Real implementations live in the
/// library crates (lofty, symphonia) or in the host application.
use crate::error::Result;
use crate::types::ExtractedMetadata;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Metadata extractor trait
///
/// Implementers read descriptive tags from a file in managed storage.
pub trait MetadataExtractor: Send + Sync {
    /// Read metadata from an audio file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed. Callers treat
    /// this as non-fatal.
    fn extract(&self, path: &Path) -> Result<ExtractedMetadata>;
}

/// Decode probe trait
///
/// Answers whether the output device would be able to open a file.
pub trait DecodeProbe: Send + Sync {
    /// Probe a file and return its duration
    ///
    /// # Errors
    /// Returns an error if the container or codec cannot be opened
    fn probe(&self, path: &Path) -> Result<Duration>;
}

/// Asynchronous signals raised by the output device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSignal {
    /// Natural end of track
    Completed,
    /// Decoding failed mid-playback
    DecodeError(String),
}

/// Channel the output device uses to report signals for one opened file
#[derive(Clone)]
pub struct DeviceSignalSink {
    notify: Arc<dyn Fn(DeviceSignal) + Send + Sync>,
}

impl DeviceSignalSink {
    pub fn new(notify: impl Fn(DeviceSignal) + Send + Sync + 'static) -> Self {
        Self {
            notify: Arc::new(notify),
        }
    }

    /// Report a signal
    pub fn send(&self, signal: DeviceSignal) {
        (self.notify)(signal);
    }

    /// Report natural end of track
    pub fn completed(&self) {
        self.send(DeviceSignal::Completed);
    }

    /// Report a decode failure
    pub fn decode_error(&self, message: impl Into<String>) {
        self.send(DeviceSignal::DecodeError(message.into()));
    }
}

impl fmt::Debug for DeviceSignalSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceSignalSink").finish_non_exhaustive()
    }
}

/// Output device trait
///
/// Implementers decode and render audio. The coordinator owns exactly one
/// device and drives it from a single task.
#[async_trait]
pub trait OutputDevice: Send {
    /// Open a file for playback
    ///
    /// Signals for this file must be reported through `signals`. Dropping
    /// the returned future cancels the open.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or decoded
    async fn open(&mut self, path: &Path, signals: DeviceSignalSink) -> Result<Duration>;

    /// Start rendering the opened file
    fn start(&mut self) -> Result<()>;

    /// Suspend rendering
    fn pause(&mut self) -> Result<()>;

    /// Continue rendering after a pause
    fn resume(&mut self) -> Result<()>;

    /// Halt rendering and release the opened file
    fn stop(&mut self);

    /// Move the play head
    fn set_position(&mut self, position: Duration) -> Result<()>;

    /// Current play head position
    fn current_position(&self) -> Duration;
}

/// Information pushed to the system now-playing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlayingInfo {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_seconds: f64,
    pub elapsed_seconds: f64,
    /// 1.0 while playing, 0.0 while paused
    pub rate: f64,
}

/// Now-playing surface trait
///
/// Best-effort: errors are logged by the caller and never change playback
/// state.
pub trait NowPlayingSurface: Send + Sync {
    /// Push updated now-playing information
    fn publish(&self, info: &NowPlayingInfo) -> Result<()>;

    /// Remove now-playing information
    fn clear(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn signal_sink_forwards_signals() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sink = DeviceSignalSink::new(move |signal| seen_clone.lock().unwrap().push(signal));

        sink.completed();
        sink.decode_error("bad frame");

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                DeviceSignal::Completed,
                DeviceSignal::DecodeError("bad frame".to_string())
            ]
        );
    }
}
