//! The queue player state machine.
//!
//! `QueuePlayer` owns every bit of transport state: which queue index is
//! current, whether the media is loading, paused or playing, the position,
//! volume, mute, shuffle and repeat flags. It talks to exactly one
//! `MediaBackend` and is driven from a single thread: the host calls the
//! transport operations and `poll` on every tick, then reads back
//! `drain_events` to learn about index changes and non-fatal failures.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::library::Track;

use super::PlayerError;
use super::media::{Generation, MediaBackend, MediaError, MediaEvent, MediaEventKind};
use super::queue::{Queue, RandomPicker, ShufflePicker, wrapping_next, wrapping_previous};
use super::types::{PlaybackState, PlayerEvent, RepeatMode, Transport};

/// Initial transport flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerOptions {
    pub volume: f32,
    /// Play as soon as a manually selected track is ready.
    pub autoplay: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            volume: 0.7,
            autoplay: false,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

pub struct QueuePlayer<B: MediaBackend> {
    backend: B,
    picker: Box<dyn ShufflePicker>,
    queue: Queue,
    current: Option<usize>,
    transport: Transport,
    generation: Generation,
    play_when_ready: bool,
    /// Index whose media most recently reported ready; load failures fall back to it.
    last_ready: Option<usize>,
    position: f64,
    duration: Option<f64>,
    volume: f32,
    muted: bool,
    shuffle: bool,
    repeat: RepeatMode,
    autoplay: bool,
    events: Vec<PlayerEvent>,
}

impl<B: MediaBackend> QueuePlayer<B> {
    pub fn new(backend: B, options: PlayerOptions) -> Self {
        Self::with_picker(backend, options, Box::new(RandomPicker))
    }

    pub fn with_picker(
        mut backend: B,
        options: PlayerOptions,
        picker: Box<dyn ShufflePicker>,
    ) -> Self {
        let volume = clamp_volume(options.volume);
        let muted = volume == 0.0;
        backend.set_volume(volume);
        backend.set_muted(muted);

        Self {
            backend,
            picker,
            queue: Queue::default(),
            current: None,
            transport: Transport::Idle,
            generation: 0,
            play_when_ready: false,
            last_ready: None,
            position: 0.0,
            duration: None,
            volume,
            muted,
            shuffle: options.shuffle,
            repeat: options.repeat,
            autoplay: options.autoplay,
            events: Vec::new(),
        }
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.queue.get(i))
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            status: self.transport.into(),
            position_seconds: self.position,
            duration_seconds: self.duration,
            volume: self.volume,
            muted: self.muted,
            shuffle_enabled: self.shuffle,
            repeat_mode: self.repeat,
        }
    }

    /// Whether playback is running or about to: playing, loading a track that
    /// will start once ready, or autoplay is on.
    pub fn keeps_playing(&self) -> bool {
        self.autoplay
            || self.transport == Transport::ReadyPlaying
            || (self.transport == Transport::Loading && self.play_when_ready)
    }

    /// Take the events emitted since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the queue and select `initial_index` (0 when out of range).
    ///
    /// An empty queue tears down the active media and parks the player in `Idle`.
    pub fn set_queue(&mut self, queue: Queue, initial_index: usize, autoplay: bool) {
        self.teardown();
        self.queue = queue;
        self.last_ready = None;

        if self.queue.is_empty() {
            debug!("queue cleared; player idle");
            self.current = None;
            self.transport = Transport::Idle;
            self.position = 0.0;
            self.duration = None;
            return;
        }

        let index = if initial_index < self.queue.len() {
            initial_index
        } else {
            0
        };
        self.load_index(index, autoplay);
    }

    /// Make `index` the current track. Out-of-range indices change nothing.
    pub fn select_track(&mut self, index: usize, autoplay: bool) -> Result<(), PlayerError> {
        let len = self.queue.len();
        if index >= len {
            debug!(index, len, "ignoring out-of-range track selection");
            return Err(PlayerError::InvalidIndex { index, len });
        }
        self.load_index(index, autoplay);
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) {
        match self.transport {
            Transport::ReadyPlaying => {
                self.backend.pause();
                self.transport = Transport::ReadyPaused;
            }
            Transport::ReadyPaused => self.start_playback(),
            Transport::Idle | Transport::Loading => {
                debug!(transport = ?self.transport, "play/pause ignored until media is ready");
            }
        }
    }

    /// Advance to the next track: a random one when shuffled, otherwise the
    /// following index. Always wraps at the end of the queue.
    pub fn next(&mut self) {
        let autoplay = self.keeps_playing();
        self.advance(autoplay);
    }

    /// Step back one index, wrapping to the last track. Ignores shuffle.
    pub fn previous(&mut self) {
        let len = self.queue.len();
        let Some(current) = self.current else {
            return;
        };
        if len == 0 {
            return;
        }
        let autoplay = self.keeps_playing();
        self.load_index(wrapping_previous(current, len), autoplay);
    }

    /// Jump to `target_seconds`, clamped to `[0, duration]`.
    ///
    /// Does nothing until the media has reported a duration.
    pub fn seek(&mut self, target_seconds: f64) {
        if !self.transport.is_ready() {
            debug!(transport = ?self.transport, "seek ignored until media is ready");
            return;
        }
        let Some(duration) = self.duration else {
            debug!("seek ignored; duration unknown");
            return;
        };

        let target = if target_seconds.is_nan() {
            0.0
        } else {
            target_seconds.clamp(0.0, duration)
        };

        match self.backend.seek(Duration::from_secs_f64(target)) {
            Ok(()) => self.position = target,
            Err(err) => warn!(target, error = %err, "seek failed"),
        }
    }

    /// Seek to a fraction of the track, e.g. a click position over a progress bar.
    pub fn seek_ratio(&mut self, ratio: f64) {
        let Some(duration) = self.duration else {
            return;
        };
        let ratio = if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        };
        self.seek(ratio * duration);
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.seek(self.position + delta_seconds);
    }

    /// Set the volume, clamped to `[0, 1]`. Zero mutes; any other value unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = clamp_volume(volume);
        self.volume = volume;
        self.backend.set_volume(volume);

        if volume == 0.0 {
            self.set_muted(true);
        } else if self.muted {
            self.set_muted(false);
        }
    }

    /// Mute or unmute without touching the stored volume.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.backend.set_muted(muted);
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.muted);
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        debug!(shuffle = self.shuffle, "shuffle toggled");
    }

    pub fn cycle_repeat(&mut self) {
        self.repeat = self.repeat.cycled();
        debug!(repeat = ?self.repeat, "repeat mode changed");
    }

    /// Apply every event the backend has queued since the last poll.
    pub fn poll(&mut self) {
        for event in self.backend.poll_events() {
            self.handle_media_event(event);
        }
    }

    /// Apply one media event. Events for a superseded load are dropped.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if event.generation != self.generation || self.current.is_none() {
            trace!(
                generation = event.generation,
                current = self.generation,
                "dropping stale media event"
            );
            return;
        }

        match event.kind {
            MediaEventKind::Ready { duration } => self.media_ready(duration),
            MediaEventKind::Playing => {
                if self.transport.is_ready() {
                    self.transport = Transport::ReadyPlaying;
                }
            }
            MediaEventKind::Paused => {
                if self.transport.is_ready() {
                    self.transport = Transport::ReadyPaused;
                }
            }
            MediaEventKind::TimeUpdate(position) => {
                if self.transport.is_ready() {
                    let position = position.as_secs_f64();
                    self.position = match self.duration {
                        Some(d) => position.min(d),
                        None => position,
                    };
                }
            }
            MediaEventKind::Ended => {
                if self.transport == Transport::ReadyPlaying {
                    self.track_ended();
                }
            }
            MediaEventKind::Error(err) => self.media_failed(err),
        }
    }

    fn advance(&mut self, autoplay: bool) {
        let len = self.queue.len();
        if len == 0 {
            return;
        }

        let target = if self.shuffle {
            self.picker.pick(len).min(len - 1)
        } else {
            self.current.map_or(0, |c| wrapping_next(c, len))
        };
        self.load_index(target, autoplay);
    }

    fn track_ended(&mut self) {
        let Some(index) = self.current else {
            return;
        };

        if self.repeat == RepeatMode::One {
            debug!(index, "repeating track");
            self.position = 0.0;
            match self.backend.seek(Duration::ZERO) {
                Ok(()) => self.start_playback(),
                Err(err) => {
                    warn!(index, error = %err, "cannot rewind; reloading track");
                    self.load_index(index, true);
                }
            }
        } else {
            self.advance(true);
        }
    }

    /// Stop whatever is loaded and invalidate its pending events.
    fn teardown(&mut self) {
        if self.current.is_some() {
            self.backend.pause();
            self.backend.unload();
        }
        self.generation += 1;
        self.play_when_ready = false;
    }

    fn load_index(&mut self, index: usize, autoplay: bool) {
        self.teardown();

        self.current = Some(index);
        self.transport = Transport::Loading;
        self.play_when_ready = autoplay;
        self.position = 0.0;
        self.duration = None;
        self.events.push(PlayerEvent::IndexChanged(index));

        let Some(track) = self.queue.get(index) else {
            return;
        };
        let source = track.source.clone();
        debug!(index, id = %track.id, generation = self.generation, autoplay, "loading track");

        if let Err(err) = self.backend.load(&source, self.generation) {
            self.load_failed(err);
        }
    }

    fn media_ready(&mut self, duration: Option<Duration>) {
        self.duration = duration.map(|d| d.as_secs_f64());
        self.last_ready = self.current;

        if self.transport == Transport::Loading {
            debug!(index = ?self.current, duration = ?self.duration, "media ready");
            if std::mem::take(&mut self.play_when_ready) {
                self.start_playback();
            } else {
                self.transport = Transport::ReadyPaused;
            }
        }
    }

    fn start_playback(&mut self) {
        match self.backend.play() {
            Ok(()) => self.transport = Transport::ReadyPlaying,
            Err(err) => {
                warn!(index = ?self.current, error = %err, "playback did not start");
                self.backend.pause();
                self.transport = Transport::ReadyPaused;
                let err = match err {
                    MediaError::Blocked(reason) => PlayerError::PlaybackBlocked(reason),
                    other => PlayerError::LoadError {
                        index: self.current.unwrap_or_default(),
                        cause: other,
                    },
                };
                self.events.push(PlayerEvent::Warning(err));
            }
        }
    }

    fn media_failed(&mut self, err: MediaError) {
        if self.transport == Transport::Loading {
            self.load_failed(err);
            return;
        }

        let index = self.current.unwrap_or_default();
        warn!(index, error = %err, "media failed during playback");
        self.backend.pause();
        self.transport = Transport::ReadyPaused;
        let err = match err {
            MediaError::Blocked(reason) => PlayerError::PlaybackBlocked(reason),
            other => PlayerError::LoadError { index, cause: other },
        };
        self.events.push(PlayerEvent::Warning(err));
    }

    /// Stay in `Loading`, or fall back to the last track that became ready.
    fn load_failed(&mut self, err: MediaError) {
        let Some(index) = self.current else {
            return;
        };
        warn!(index, error = %err, "track failed to load");
        self.play_when_ready = false;
        self.events
            .push(PlayerEvent::Warning(PlayerError::LoadError { index, cause: err }));

        match self.last_ready.take() {
            Some(previous) if previous != index && previous < self.queue.len() => {
                debug!(previous, "reverting to last playable track");
                self.load_index(previous, false);
            }
            _ => {}
        }
    }
}
