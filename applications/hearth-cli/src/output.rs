//! Terminal playback collaborators
//!
//! The CLI has no audio backend. `ClockOutput` keeps time against the probed
//! duration and raises completion when the song would have ended, which is
//! enough to drive the coordinator from a terminal.

use async_trait::async_trait;
use hearth_core::{DecodeProbe, DeviceSignalSink, NowPlayingInfo, NowPlayingSurface, OutputDevice};
use hearth_importer::SymphoniaProbe;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

#[derive(Default)]
pub struct ClockOutput {
    probe: SymphoniaProbe,
    duration: Duration,
    /// Position when the clock last (re)started
    offset: Duration,
    started: Option<Instant>,
    signals: Option<DeviceSignalSink>,
    completion: Option<JoinHandle<()>>,
}

impl ClockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn run_clock(&mut self) {
        self.started = Some(Instant::now());
        self.schedule_completion();
    }

    fn halt_clock(&mut self) {
        self.offset = self.current_position();
        self.started = None;
        self.cancel_completion();
    }

    fn schedule_completion(&mut self) {
        self.cancel_completion();
        // Unknown length: the song runs until stopped
        if self.duration.is_zero() {
            return;
        }
        let Some(signals) = self.signals.clone() else {
            return;
        };
        let remaining = self.duration.saturating_sub(self.current_position());
        self.completion = Some(tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            signals.completed();
        }));
    }

    fn cap(&self, position: Duration) -> Duration {
        if self.duration.is_zero() {
            position
        } else {
            position.min(self.duration)
        }
    }

    fn cancel_completion(&mut self) {
        if let Some(handle) = self.completion.take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl OutputDevice for ClockOutput {
    async fn open(&mut self, path: &Path, signals: DeviceSignalSink) -> hearth_core::Result<Duration> {
        self.stop();
        let probe = self.probe;
        let owned = path.to_path_buf();
        let duration = tokio::task::spawn_blocking(move || probe.probe(&owned))
            .await
            .map_err(|e| hearth_core::HearthError::Other(e.to_string()))??;

        self.duration = duration;
        self.signals = Some(signals);
        Ok(duration)
    }

    fn start(&mut self) -> hearth_core::Result<()> {
        self.offset = Duration::ZERO;
        self.run_clock();
        Ok(())
    }

    fn pause(&mut self) -> hearth_core::Result<()> {
        self.halt_clock();
        Ok(())
    }

    fn resume(&mut self) -> hearth_core::Result<()> {
        self.run_clock();
        Ok(())
    }

    fn stop(&mut self) {
        self.cancel_completion();
        self.started = None;
        self.offset = Duration::ZERO;
        self.signals = None;
    }

    fn set_position(&mut self, position: Duration) -> hearth_core::Result<()> {
        self.offset = self.cap(position);
        if self.started.is_some() {
            self.run_clock();
        }
        Ok(())
    }

    fn current_position(&self) -> Duration {
        let running = self.started.map_or(Duration::ZERO, |s| s.elapsed());
        self.cap(self.offset + running)
    }
}

/// Now-playing surface that writes to the log
#[derive(Debug, Default)]
pub struct LogNowPlaying;

impl NowPlayingSurface for LogNowPlaying {
    fn publish(&self, info: &NowPlayingInfo) -> hearth_core::Result<()> {
        tracing::debug!(
            title = %info.title,
            artist = %info.artist,
            elapsed = info.elapsed_seconds,
            duration = info.duration_seconds,
            rate = info.rate,
            "Now playing"
        );
        Ok(())
    }

    fn clear(&self) -> hearth_core::Result<()> {
        tracing::debug!("Now playing cleared");
        Ok(())
    }
}
