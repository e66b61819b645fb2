use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LibraryError;

/// One playable media item plus its display metadata.
///
/// Field names serialize in camelCase so manifests exported by the site
/// (`uploadedAt`, `src`) load without conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    #[serde(alias = "src")]
    pub source: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_artist")]
    pub artist: String,
    #[serde(default = "default_album")]
    pub album: String,
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

fn default_title() -> String {
    "Untitled Track".to_string()
}

fn default_artist() -> String {
    "Unknown Artist".to_string()
}

fn default_album() -> String {
    "Single".to_string()
}

fn default_genre() -> String {
    "Unknown".to_string()
}

impl Track {
    /// Create a track with placeholder metadata.
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            title: default_title(),
            artist: default_artist(),
            album: default_album(),
            genre: default_genre(),
            uploaded_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    /// Text searched by the filter prompt.
    pub(crate) fn haystack(&self) -> String {
        format!("{} {} {} {}", self.title, self.artist, self.album, self.genre)
    }
}

/// The first `id` that appears more than once in `tracks`.
pub(crate) fn first_duplicate_id(tracks: &[Track]) -> Option<&str> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(tracks.len());
    tracks
        .iter()
        .map(|t| t.id.as_str())
        .find(|id| !seen.insert(*id))
}

/// Reject a track list where two entries share an `id`.
pub(crate) fn ensure_unique_ids(tracks: &[Track]) -> Result<(), LibraryError> {
    match first_duplicate_id(tracks) {
        Some(id) => Err(LibraryError::DuplicateId(id.to_string())),
        None => Ok(()),
    }
}
