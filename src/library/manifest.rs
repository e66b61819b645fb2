use std::fs;
use std::path::Path;

use super::LibraryError;
use super::model::{Track, ensure_unique_ids};

/// Load a JSON array of tracks from `path`.
///
/// Unknown fields are ignored and missing display strings take their defaults,
/// so exports from the site's music endpoint load as-is.
pub fn load_manifest(path: &Path) -> Result<Vec<Track>, LibraryError> {
    let raw = fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tracks: Vec<Track> =
        serde_json::from_str(&raw).map_err(|source| LibraryError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
    ensure_unique_ids(&tracks)?;

    tracing::debug!(path = %path.display(), count = tracks.len(), "loaded manifest");
    Ok(tracks)
}

/// Write `tracks` to `path` as pretty-printed JSON.
pub fn save_manifest(path: &Path, tracks: &[Track]) -> Result<(), LibraryError> {
    ensure_unique_ids(tracks)?;
    let json = serde_json::to_string_pretty(tracks).map_err(|source| LibraryError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })
}
