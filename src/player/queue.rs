//! Queue bookkeeping.
//!
//! The player never edits the track list; it only moves its index pointer
//! with the helpers below.

use crate::library::{Track, first_duplicate_id};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("duplicate track id {0:?} in queue")]
    DuplicateId(String),
}

/// An ordered list of tracks with unique ids.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
}

impl Queue {
    pub fn new(tracks: Vec<Track>) -> Result<Self, QueueError> {
        if let Some(id) = first_duplicate_id(&tracks) {
            return Err(QueueError::DuplicateId(id.to_string()));
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

/// `(current + 1) mod len`. `len` must be non-zero.
pub(crate) fn wrapping_next(current: usize, len: usize) -> usize {
    (current + 1) % len
}

/// `(current - 1) mod len`. `len` must be non-zero.
pub(crate) fn wrapping_previous(current: usize, len: usize) -> usize {
    (current + len - 1) % len
}

/// Source of the index chosen by a shuffled `next`.
pub trait ShufflePicker {
    /// Uniformly pick an index in `[0, len)`. The current index is not excluded.
    fn pick(&mut self, len: usize) -> usize;
}

/// Thread-local RNG picker used outside tests.
#[derive(Debug, Default)]
pub struct RandomPicker;

impl ShufflePicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::random_range(0..len)
    }
}
