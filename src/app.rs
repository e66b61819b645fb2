//! Application module: the host model wrapped around the queue player.
//!
//! `App` holds the track catalogue, the filter prompt and the queue view.
//! It decides which tracks make up the player's queue; the player itself
//! never edits that list.

mod model;
mod queue_view;

pub use model::*;
pub use queue_view::{QueueRow, QueueView};

#[cfg(test)]
mod tests;
