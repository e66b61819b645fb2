//! Track catalogue.
//!
//! Tracks reach the player either from a flat JSON manifest or from a scan of
//! a local directory. This module also owns the catalogue search used by the
//! filter prompt and the small display helpers shared by the UI.

use std::path::PathBuf;

mod display;
mod manifest;
mod model;
mod scan;
mod search;

pub use display::format_clock;
pub use manifest::{load_manifest, save_manifest};
pub use model::Track;
pub(crate) use model::first_duplicate_id;
pub use scan::scan;
pub use search::{fuzzy_match_positions, search};

/// Errors raised while building a track catalogue.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },
    #[error("duplicate track id {0:?}")]
    DuplicateId(String),
}

#[cfg(test)]
mod tests;
