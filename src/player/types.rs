//! Player-facing small types.
//!
//! Repeat mode, transport state, the playback snapshot handed to the UI and
//! the events the player emits back to its host.

use super::PlayerError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Advance through the queue when a track ends (still wraps at the end).
    #[default]
    Off,
    /// Restart the current track when it ends.
    One,
    /// Advance through the queue indefinitely.
    All,
}

impl RepeatMode {
    /// `Off -> One -> All -> Off`.
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }
}

/// Transport state machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Transport {
    /// No queue.
    #[default]
    Idle,
    /// A track is selected but its media has not reported ready.
    Loading,
    ReadyPaused,
    ReadyPlaying,
}

impl Transport {
    pub fn is_ready(self) -> bool {
        matches!(self, Self::ReadyPaused | Self::ReadyPlaying)
    }
}

/// Coarse status shown to the user.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
}

impl From<Transport> for PlaybackStatus {
    fn from(t: Transport) -> Self {
        match t {
            Transport::Idle | Transport::Loading => Self::Stopped,
            Transport::ReadyPaused => Self::Paused,
            Transport::ReadyPlaying => Self::Playing,
        }
    }
}

/// Snapshot of the playback state owned by the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    /// Always within `[0, duration_seconds]` once the duration is known.
    pub position_seconds: f64,
    /// `None` until the media reports it.
    pub duration_seconds: Option<f64>,
    pub volume: f32,
    pub muted: bool,
    pub shuffle_enabled: bool,
    pub repeat_mode: RepeatMode,
}

/// Notifications the player hands back to its host.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The current queue index changed.
    IndexChanged(usize),
    /// A non-fatal transport failure the host may want to surface.
    Warning(PlayerError),
}
