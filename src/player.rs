//! Queue player.
//!
//! A playback engine over an ordered list of tracks: play/pause, seek,
//! next/previous, shuffle, repeat, volume and mute. The engine is generic
//! over the media primitive so the decoding backend can be swapped without
//! touching the state machine; `RodioBackend` is the one used at runtime.

mod engine;
mod media;
mod queue;
mod sink;
mod types;

pub use engine::{PlayerOptions, QueuePlayer};
pub use media::{Generation, MediaBackend, MediaError, MediaEvent, MediaEventKind};
pub use queue::{Queue, QueueError, RandomPicker, ShufflePicker};
pub use sink::RodioBackend;
pub use types::{PlaybackState, PlaybackStatus, PlayerEvent, RepeatMode, Transport};

/// Non-fatal transport failures reported back to the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    /// The track's media never became ready, or failed while playing.
    #[error("track {index} failed: {cause}")]
    LoadError { index: usize, cause: MediaError },
    /// The platform refused to start playback; a user gesture may be needed.
    #[error("playback blocked: {0}")]
    PlaybackBlocked(String),
    /// `select_track` was called with an index outside the queue.
    #[error("track index {index} is out of range for a queue of {len}")]
    InvalidIndex { index: usize, len: usize },
}

#[cfg(test)]
pub(crate) mod fake;
