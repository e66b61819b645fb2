use std::path::Path;

use chrono::{DateTime, Utc};
use lofty::file::TaggedFileExt;
use lofty::tag::ItemKey;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::LibraryError;
use super::model::Track;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Track id for `path`: its location relative to the scan root, `/`-separated.
fn track_id(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn non_blank(v: &str) -> Option<String> {
    let v = v.trim();
    (!v.is_empty()).then(|| v.to_string())
}

fn read_track(root: &Path, path: &Path) -> Track {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(non_blank);

    let mut track = Track::new(track_id(root, path), path.to_string_lossy());
    if let Some(stem) = stem {
        track.title = stem;
    }

    track.uploaded_at = path
        .metadata()
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);

    // Untagged or unreadable files keep the filename-derived defaults.
    if let Ok(tagged) = lofty::read_from_path(path) {
        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.get_string(ItemKey::TrackTitle).and_then(non_blank) {
                track.title = v;
            }
            if let Some(v) = tag.get_string(ItemKey::TrackArtist).and_then(non_blank) {
                track.artist = v;
            }
            if let Some(v) = tag.get_string(ItemKey::AlbumTitle).and_then(non_blank) {
                track.album = v;
            }
            if let Some(v) = tag.get_string(ItemKey::Genre).and_then(non_blank) {
                track.genre = v;
            }
        }
    }

    track
}

/// Walk `dir` and build a track list from the audio files found.
///
/// Results are sorted by `Artist - Title`, case-insensitively.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, LibraryError> {
    if !dir.is_dir() {
        return Err(LibraryError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() && is_audio_file(path, settings) {
            tracks.push(read_track(dir, path));
        }
    }

    tracks.sort_by_key(|t| t.label().to_lowercase());
    tracing::debug!(dir = %dir.display(), count = tracks.len(), "scanned library");
    Ok(tracks)
}
