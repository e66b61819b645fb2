//! Start muted and unmute on the first key press.

use tracing::debug;

use crate::player::{MediaBackend, QueuePlayer};

#[derive(Debug, Default)]
pub struct FirstInteractionUnmute {
    armed: bool,
}

impl FirstInteractionUnmute {
    /// Mute `player` and wait for the first interaction when `enabled`.
    pub fn arm<B: MediaBackend>(player: &mut QueuePlayer<B>, enabled: bool) -> Self {
        if enabled {
            player.set_muted(true);
        }
        Self { armed: enabled }
    }

    /// Unmute once. Later calls do nothing, so a user's own mute sticks.
    pub fn on_interaction<B: MediaBackend>(&mut self, player: &mut QueuePlayer<B>) {
        if std::mem::take(&mut self.armed) {
            debug!("first interaction; unmuting");
            player.set_muted(false);
        }
    }
}
