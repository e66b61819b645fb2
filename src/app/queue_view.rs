//! Read-only view over the player's queue.
//!
//! Rows are derived from the player on every draw. The only state kept here
//! is whether the panel is open and where the keyboard cursor sits.

use crate::player::{MediaBackend, PlayerError, Queue, QueuePlayer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRow {
    /// Zero-based queue index.
    pub index: usize,
    pub title: String,
    pub artist: String,
    pub genre: String,
    /// Whether this row is the player's current track.
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct QueueView {
    pub open: bool,
    cursor: usize,
}

impl QueueView {
    pub fn new(open: bool) -> Self {
        Self { open, cursor: 0 }
    }

    pub fn rows(queue: &Queue, current: Option<usize>) -> Vec<QueueRow> {
        queue
            .tracks()
            .iter()
            .enumerate()
            .map(|(index, t)| QueueRow {
                index,
                title: t.title.clone(),
                artist: t.artist.clone(),
                genre: t.genre.clone(),
                active: current == Some(index),
            })
            .collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Open or close the panel. Opening puts the cursor on the current track.
    pub fn toggle(&mut self, current: Option<usize>) {
        self.open = !self.open;
        if self.open {
            self.cursor = current.unwrap_or(0);
        }
    }

    /// Keep the cursor on the playing track while the panel is closed.
    pub fn follow(&mut self, current: usize) {
        if !self.open {
            self.cursor = current;
        }
    }

    /// Put the cursor back on the current track after the queue was replaced.
    pub fn reset(&mut self, current: Option<usize>) {
        self.cursor = current.unwrap_or(0);
    }

    pub fn cursor_down(&mut self, len: usize) {
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    pub fn cursor_up(&mut self, len: usize) {
        if len > 0 {
            self.cursor = (self.cursor.min(len - 1) + len - 1) % len;
        }
    }

    /// Select the row under the cursor and close the panel.
    pub fn choose<B: MediaBackend>(
        &mut self,
        player: &mut QueuePlayer<B>,
    ) -> Result<(), PlayerError> {
        self.open = false;
        let last = player.queue().len().saturating_sub(1);
        self.cursor = self.cursor.min(last);
        player.select_track(self.cursor, true)
    }
}
