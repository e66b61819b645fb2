//! The media primitive contract.
//!
//! The queue player drives exactly one `MediaBackend`. Backends report what
//! happens to the loaded resource through `MediaEvent`s tagged with the
//! generation passed to `load`, which lets the player drop events that belong
//! to a track it has already moved away from.

use std::time::Duration;

/// Identifies one `load` call. Strictly increasing per player.
pub type Generation = u64;

/// Failures reported by a media backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    /// The resource could not be opened or decoded.
    #[error("cannot load {uri}: {reason}")]
    Load { uri: String, reason: String },
    /// The platform declined to start playback.
    #[error("playback blocked: {0}")]
    Blocked(String),
    /// Seeking is not supported for this resource.
    #[error("seek failed: {0}")]
    Seek(String),
    /// No resource is loaded.
    #[error("no media loaded")]
    NotLoaded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEventKind {
    /// Resource can play; carries the total duration when known.
    Ready { duration: Option<Duration> },
    Playing,
    Paused,
    TimeUpdate(Duration),
    Ended,
    Error(MediaError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub generation: Generation,
    pub kind: MediaEventKind,
}

impl MediaEvent {
    pub fn new(generation: Generation, kind: MediaEventKind) -> Self {
        Self { generation, kind }
    }
}

/// A single-stream decode/playback primitive.
pub trait MediaBackend {
    /// Replace any loaded resource with `source`.
    ///
    /// Errors returned here are synchronous load failures; later failures
    /// arrive as `MediaEventKind::Error`.
    fn load(&mut self, source: &str, generation: Generation) -> Result<(), MediaError>;

    /// Drop the loaded resource. No events for it may be emitted afterwards.
    fn unload(&mut self);

    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    fn seek(&mut self, position: Duration) -> Result<(), MediaError>;

    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    fn muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    /// Drain pending events, oldest first.
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}
