//! Playback session coordinator
//!
//! One tokio task owns the output device and every piece of session state.
//! Callers hold a cheap `PlaybackCoordinator` handle and send commands over
//! an mpsc channel, each with a oneshot reply. Device signals and position
//! poll ticks arrive on a second, unbounded channel and carry the session
//! number they belong to, so anything left over from an earlier session is
//! dropped on arrival.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::relocate::resolve_song_path;
use crate::types::{clamp_seek, PlaybackConfig, PlaybackErrorKind, PlaybackSnapshot, PlaybackState};
use hearth_core::{DeviceSignal, DeviceSignalSink, NowPlayingInfo, NowPlayingSurface, OutputDevice, Song};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type Reply = oneshot::Sender<Result<()>>;

enum Command {
    Play { song: Box<Song>, reply: Reply },
    Pause { reply: Reply },
    Resume { reply: Reply },
    Stop { reply: Reply },
    Seek { seconds: f64, reply: Reply },
}

impl Command {
    fn into_parts(self) -> (&'static str, Reply) {
        match self {
            Self::Play { reply, .. } => ("play", reply),
            Self::Pause { reply } => ("pause", reply),
            Self::Resume { reply } => ("resume", reply),
            Self::Stop { reply } => ("stop", reply),
            Self::Seek { reply, .. } => ("seek", reply),
        }
    }
}

/// Messages raised from inside the coordinator's own machinery
enum Internal {
    Signal { session: u64, signal: DeviceSignal },
    Tick { session: u64 },
}

/// Handle to a running coordinator
///
/// Clones share the same session. The task shuts down once every handle is
/// dropped, stopping the device on the way out.
#[derive(Clone)]
pub struct PlaybackCoordinator {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<PlaybackSnapshot>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackCoordinator {
    /// Spawn the coordinator task on the current tokio runtime
    pub fn spawn(
        device: Box<dyn OutputDevice>,
        now_playing: Arc<dyn NowPlayingSurface>,
        managed_root: impl Into<PathBuf>,
        config: PlaybackConfig,
    ) -> Self {
        let (commands, commands_rx) = mpsc::channel(config.command_buffer.max(1));
        let (internal, internal_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot) = watch::channel(PlaybackSnapshot::default());
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        let actor = Actor {
            device,
            now_playing,
            managed_root: managed_root.into(),
            config,
            internal,
            snapshot_tx,
            events: events.clone(),
            state: PlaybackState::Idle,
            song: None,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            last_error: None,
            session: 0,
            polling: None,
        };

        tokio::spawn(actor.run(commands_rx, internal_rx));

        Self {
            commands,
            snapshot,
            events,
        }
    }

    /// Play a song, replacing any current session
    ///
    /// Resolves once the song is playing. Fails with `Superseded` when a
    /// newer `play` or a `stop` arrives while this one is still loading.
    pub async fn play(&self, song: Song) -> Result<()> {
        self.request(|reply| Command::Play {
            song: Box::new(song),
            reply,
        })
        .await
    }

    pub async fn pause(&self) -> Result<()> {
        self.request(|reply| Command::Pause { reply }).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.request(|reply| Command::Resume { reply }).await
    }

    /// End the session and return to `Idle`; a no-op when already idle
    pub async fn stop(&self) -> Result<()> {
        self.request(|reply| Command::Stop { reply }).await
    }

    /// Move the play head, clamped to the song's duration
    pub async fn seek(&self, seconds: f64) -> Result<()> {
        self.request(|reply| Command::Seek { seconds, reply }).await
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn state(&self) -> PlaybackState {
        self.snapshot.borrow().state
    }

    /// Receiver that observes every snapshot change
    pub fn watch(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    async fn request(&self, make: impl FnOnce(Reply) -> Command) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| PlaybackError::CoordinatorClosed)?;
        response.await.map_err(|_| PlaybackError::CoordinatorClosed)?
    }
}

/// How an in-flight load ended
enum LoadOutcome {
    Opened(hearth_core::Result<Duration>),
    Superseded { next: Box<Song>, reply: Reply },
    Stopped { reply: Reply },
    Closed,
}

struct Actor {
    device: Box<dyn OutputDevice>,
    now_playing: Arc<dyn NowPlayingSurface>,
    managed_root: PathBuf,
    config: PlaybackConfig,
    internal: mpsc::UnboundedSender<Internal>,
    snapshot_tx: watch::Sender<PlaybackSnapshot>,
    events: broadcast::Sender<PlaybackEvent>,

    state: PlaybackState,
    song: Option<Song>,
    position: Duration,
    duration: Duration,
    last_error: Option<PlaybackErrorKind>,
    /// Incremented for every load; signals and ticks from older ones are stale
    session: u64,
    polling: Option<CancellationToken>,
}

impl Actor {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut internal: mpsc::UnboundedReceiver<Internal>,
    ) {
        debug!("Playback coordinator started");

        loop {
            tokio::select! {
                biased;
                Some(message) = internal.recv() => self.handle_internal(message),
                command = commands.recv() => match command {
                    Some(Command::Play { song, reply }) => {
                        if !self.play(song, reply, &mut commands).await {
                            break;
                        }
                    }
                    Some(command) => self.handle_command(command),
                    None => break,
                },
            }
        }

        self.end_session();
        debug!("Playback coordinator stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Pause { reply } => {
                let _ = reply.send(self.pause());
            }
            Command::Resume { reply } => {
                let _ = reply.send(self.resume());
            }
            Command::Stop { reply } => {
                self.stop();
                let _ = reply.send(Ok(()));
            }
            Command::Seek { seconds, reply } => {
                let _ = reply.send(self.seek(seconds));
            }
            // Handled by the run loop, which owns the command receiver
            Command::Play { reply, .. } => {
                let _ = reply.send(Err(PlaybackError::Superseded));
            }
        }
    }

    fn handle_internal(&mut self, message: Internal) {
        match message {
            Internal::Tick { session } => {
                if session == self.session && self.state == PlaybackState::Playing {
                    self.refresh_position();
                }
            }
            Internal::Signal { session, signal } => {
                if session != self.session || !self.state.has_session() {
                    debug!(session, current = self.session, "Dropping stale device signal");
                    return;
                }
                match signal {
                    DeviceSignal::Completed => {
                        info!("Song completed");
                        self.finish(None);
                    }
                    DeviceSignal::DecodeError(message) => {
                        warn!(error = %message, "Decode error during playback");
                        self.finish(Some(PlaybackErrorKind::DecodeFailure(message)));
                    }
                }
            }
        }
    }

    /// Load and start `song`, following any supersession chain
    ///
    /// Returns false when the command channel closed mid-load.
    async fn play(&mut self, song: Box<Song>, reply: Reply, commands: &mut mpsc::Receiver<Command>) -> bool {
        let mut pending = Some((song, reply));

        while let Some((song, reply)) = pending.take() {
            self.stop();

            self.session += 1;
            let session = self.session;
            info!(song_id = %song.id, title = %song.title, session, "Loading song");

            let song = *song;
            let song_id = song.id.clone();
            let storage_path = song.storage_path.clone();
            let fallback_duration = song.duration();

            self.song = Some(song);
            self.last_error = None;
            self.emit(PlaybackEvent::SongChanged {
                song_id: Some(song_id),
            });
            self.set_state(PlaybackState::Loading);

            let Some(path) = resolve_song_path(&storage_path, &self.managed_root) else {
                let message = format!("file not found: {}", storage_path.display());
                self.fail_load(message, reply);
                continue;
            };

            let signals = self.signal_sink(session);
            let outcome = {
                let open = self.device.open(&path, signals);
                tokio::pin!(open);

                loop {
                    tokio::select! {
                        result = &mut open => break LoadOutcome::Opened(result),
                        command = commands.recv() => match command {
                            Some(Command::Play { song, reply }) => {
                                break LoadOutcome::Superseded { next: song, reply };
                            }
                            Some(Command::Stop { reply }) => break LoadOutcome::Stopped { reply },
                            Some(other) => {
                                let (action, other_reply) = other.into_parts();
                                let _ = other_reply.send(Err(PlaybackError::InvalidTransition {
                                    state: PlaybackState::Loading,
                                    action,
                                }));
                            }
                            None => break LoadOutcome::Closed,
                        },
                    }
                }
            };

            match outcome {
                LoadOutcome::Opened(Ok(duration)) => {
                    let duration = if duration.is_zero() {
                        fallback_duration
                    } else {
                        duration
                    };
                    match self.device.start() {
                        Ok(()) => {
                            self.duration = duration;
                            self.position = Duration::ZERO;
                            self.set_state(PlaybackState::Playing);
                            self.start_polling();
                            self.publish_now_playing();
                            info!(session, duration_ms = duration.as_millis() as u64, "Playing");
                            let _ = reply.send(Ok(()));
                        }
                        Err(e) => {
                            self.device.stop();
                            self.fail_load(e.to_string(), reply);
                        }
                    }
                }
                LoadOutcome::Opened(Err(e)) => {
                    self.device.stop();
                    self.fail_load(e.to_string(), reply);
                }
                LoadOutcome::Superseded { next, reply: next_reply } => {
                    // The next iteration's stop() halts the device
                    debug!(session, "Load superseded by a newer play");
                    let _ = reply.send(Err(PlaybackError::Superseded));
                    pending = Some((next, next_reply));
                }
                LoadOutcome::Stopped { reply: stop_reply } => {
                    debug!(session, "Load cancelled by stop");
                    self.stop();
                    let _ = reply.send(Err(PlaybackError::Superseded));
                    let _ = stop_reply.send(Ok(()));
                }
                LoadOutcome::Closed => {
                    let _ = reply.send(Err(PlaybackError::CoordinatorClosed));
                    return false;
                }
            }
        }

        true
    }

    fn fail_load(&mut self, message: String, reply: Reply) {
        warn!(error = %message, "Failed to load song");
        self.song = None;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.last_error = Some(PlaybackErrorKind::LoadFailure(message.clone()));
        self.emit(PlaybackEvent::SongChanged { song_id: None });
        self.emit(PlaybackEvent::Error {
            error: PlaybackErrorKind::LoadFailure(message.clone()),
        });
        self.set_state(PlaybackState::Error);
        let _ = reply.send(Err(PlaybackError::LoadFailure(message)));
    }

    fn pause(&mut self) -> Result<()> {
        self.require(&[PlaybackState::Playing], "pause")?;
        self.device.pause()?;
        self.stop_polling();
        self.position = self.device_position();
        self.set_state(PlaybackState::Paused);
        self.publish_now_playing();
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        self.require(&[PlaybackState::Paused], "resume")?;
        self.device.resume()?;
        self.set_state(PlaybackState::Playing);
        self.start_polling();
        self.publish_now_playing();
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.require(&[PlaybackState::Playing, PlaybackState::Paused], "seek")?;
        let target = clamp_seek(seconds, self.duration);
        self.device.set_position(target)?;
        self.position = target;
        debug!(position_ms = target.as_millis() as u64, "Seeked");
        self.emit_position();
        self.publish_snapshot();
        self.publish_now_playing();
        Ok(())
    }

    /// Tear down any session and return to `Idle`
    fn stop(&mut self) {
        if self.state == PlaybackState::Idle {
            return;
        }
        self.end_session();
        self.clear_now_playing();
        self.emit(PlaybackEvent::SongChanged { song_id: None });
        self.set_state(PlaybackState::Idle);
    }

    /// End of song, naturally or through a decode failure
    fn finish(&mut self, error: Option<PlaybackErrorKind>) {
        self.end_session();
        self.clear_now_playing();
        self.emit(PlaybackEvent::SongChanged { song_id: None });
        if let Some(error) = error {
            self.emit(PlaybackEvent::Error {
                error: error.clone(),
            });
            self.last_error = Some(error);
        }
        self.set_state(PlaybackState::Stopped);
    }

    fn end_session(&mut self) {
        self.stop_polling();
        if self.state.has_session() || self.state == PlaybackState::Loading {
            self.device.stop();
        }
        self.song = None;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
    }

    fn require(&self, allowed: &[PlaybackState], action: &'static str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(PlaybackError::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }

    fn signal_sink(&self, session: u64) -> DeviceSignalSink {
        let internal = self.internal.clone();
        DeviceSignalSink::new(move |signal| {
            // Closed only after the coordinator shut down
            let _ = internal.send(Internal::Signal { session, signal });
        })
    }

    fn start_polling(&mut self) {
        self.stop_polling();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let internal = self.internal.clone();
        let session = self.session;
        let period = self.config.poll_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        if internal.send(Internal::Tick { session }).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        self.polling = Some(token);
    }

    fn stop_polling(&mut self) {
        if let Some(token) = self.polling.take() {
            token.cancel();
        }
    }

    /// Device position, capped at the duration when the duration is known
    fn device_position(&self) -> Duration {
        let position = self.device.current_position();
        if self.duration.is_zero() {
            position
        } else {
            position.min(self.duration)
        }
    }

    fn refresh_position(&mut self) {
        self.position = self.device_position();
        self.emit_position();
        self.publish_snapshot();
        self.publish_now_playing();
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "State changed");
        }
        self.state = state;
        self.emit(PlaybackEvent::StateChanged { state });
        self.publish_snapshot();
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx.send_replace(PlaybackSnapshot {
            state: self.state,
            song: self.song.clone(),
            position: self.position,
            duration: self.duration,
            is_playing: self.state.is_playing(),
            last_error: self.last_error.clone(),
        });
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn emit_position(&self) {
        self.emit(PlaybackEvent::PositionUpdate {
            position_ms: self.position.as_millis() as u64,
            duration_ms: self.duration.as_millis() as u64,
        });
    }

    fn publish_now_playing(&self) {
        let Some(song) = &self.song else {
            return;
        };
        let info = NowPlayingInfo {
            title: song.title.clone(),
            artist: song.artist.clone(),
            album: song.album_name.clone(),
            duration_seconds: self.duration.as_secs_f64(),
            elapsed_seconds: self.position.as_secs_f64(),
            rate: if self.state.is_playing() { 1.0 } else { 0.0 },
        };
        if let Err(e) = self.now_playing.publish(&info) {
            warn!(error = %e, "Failed to publish now playing info");
        }
    }

    fn clear_now_playing(&self) {
        if let Err(e) = self.now_playing.clear() {
            warn!(error = %e, "Failed to clear now playing info");
        }
    }
}
