use super::*;
use std::fs;

fn t(id: &str, title: &str, artist: &str, genre: &str) -> Track {
    Track::new(id, format!("/music/{id}.mp3"))
        .with_title(title)
        .with_artist(artist)
        .with_genre(genre)
}

#[test]
fn manifest_loads_site_export_with_src_alias_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracks.json");
    fs::write(
        &path,
        r#"[
  {
    "id": "k1",
    "src": "https://utfs.io/f/k1",
    "title": "Sunrise Mix",
    "artist": "DJ Rishi",
    "duration": "0:00",
    "type": "audio",
    "uploadedAt": "2025-03-01T12:00:00Z"
  },
  { "id": "k2", "source": "/srv/k2.flac" }
]"#,
    )
    .unwrap();

    let tracks = load_manifest(&path).unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].source, "https://utfs.io/f/k1");
    assert_eq!(tracks[0].album, "Single");
    assert_eq!(
        tracks[0].uploaded_at.map(|d| d.to_rfc3339()),
        Some("2025-03-01T12:00:00+00:00".to_string())
    );
    assert_eq!(tracks[1].title, "Untitled Track");
    assert_eq!(tracks[1].genre, "Unknown");
}

#[test]
fn manifest_rejects_duplicate_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracks.json");
    fs::write(
        &path,
        r#"[{ "id": "a", "source": "/a.mp3" }, { "id": "a", "source": "/b.mp3" }]"#,
    )
    .unwrap();

    let err = load_manifest(&path).unwrap_err();
    assert!(matches!(err, LibraryError::DuplicateId(ref id) if id == "a"));
}

#[test]
fn manifest_reports_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracks.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        load_manifest(&path),
        Err(LibraryError::Manifest { .. })
    ));
}

#[test]
fn saved_manifest_reloads_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let tracks = vec![
        t("a", "Intro", "DJ Rishi", "Techno"),
        t("b", "Outro", "DJ Rishi", "Deep House"),
    ];

    save_manifest(&path, &tracks).unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"source\""));
    assert!(!raw.contains("uploadedAt"));
    assert_eq!(load_manifest(&path).unwrap(), tracks);
}

#[test]
fn search_matches_any_display_field() {
    let tracks = vec![
        t("1", "Sunrise", "DJ Rishi", "Progressive House"),
        t("2", "Warehouse", "Someone Else", "Techno"),
        t("3", "Afterglow", "DJ Rishi", "Melodic Techno"),
    ];

    assert_eq!(search(&tracks, "techno"), vec![1, 2]);
    assert_eq!(search(&tracks, "rishi"), vec![0, 2]);
    assert_eq!(search(&tracks, "whouse"), vec![1]);
    assert_eq!(search(&tracks, "  "), vec![0, 1, 2]);
    assert!(search(&tracks, "zzz").is_empty());
}

#[test]
fn fuzzy_match_reports_positions() {
    assert_eq!(fuzzy_match_positions("Hello World", "hw"), Some(vec![0, 6]));
    assert!(fuzzy_match_positions("Hello World", "xyz").is_none());
}

#[test]
fn format_clock_matches_minutes_seconds() {
    assert_eq!(format_clock(0.0), "0:00");
    assert_eq!(format_clock(f64::NAN), "0:00");
    assert_eq!(format_clock(-3.0), "0:00");
    assert_eq!(format_clock(59.9), "0:59");
    assert_eq!(format_clock(125.0), "2:05");
    assert_eq!(format_clock(3600.0), "60:00");
}

#[test]
fn label_omits_blank_artist() {
    assert_eq!(t("1", "Song", "  Artist ", "x").label(), "Artist - Song");
    assert_eq!(t("1", "Song", "", "x").label(), "Song");
}
