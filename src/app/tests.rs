use super::*;
use crate::config::UiSettings;
use crate::library::Track;
use crate::player::fake::FakeBackend;
use crate::player::{MediaError, PlayerError, PlayerEvent, PlayerOptions, QueuePlayer};

fn t(id: &str, title: &str, genre: &str) -> Track {
    Track::new(id, format!("/music/{id}.mp3"))
        .with_title(title)
        .with_artist("DJ Rishi")
        .with_album("Sessions")
        .with_genre(genre)
}

fn app() -> App {
    App::new(
        vec![
            t("1", "Sunrise", "Progressive House"),
            t("2", "Warehouse", "Techno"),
            t("3", "Afterglow", "Melodic Techno"),
        ],
        "tracks.json".to_string(),
        &UiSettings::default(),
    )
}

fn ids(queue: &crate::player::Queue) -> Vec<&str> {
    queue.tracks().iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn full_queue_keeps_catalogue_order() {
    let app = app();
    let q = app.queue_for(None).unwrap();
    assert_eq!(ids(&q), vec!["1", "2", "3"]);
}

#[test]
fn committed_filter_builds_matching_queue() {
    let mut app = app();
    app.enter_filter_mode();
    for c in "techno".chars() {
        app.push_filter_char(c);
    }
    assert_eq!(app.matching_indices(), vec![1, 2]);

    let q = app.commit_filter().unwrap().unwrap();
    assert_eq!(ids(&q), vec!["2", "3"]);
    assert!(!app.filter_mode);
    assert_eq!(app.active_filter.as_deref(), Some("techno"));

    // Re-entering the prompt starts from the active filter.
    app.enter_filter_mode();
    assert_eq!(app.filter_query, "techno");
}

#[test]
fn filter_with_no_matches_keeps_current_queue() {
    let mut app = app();
    app.enter_filter_mode();
    app.push_filter_char('z');
    app.push_filter_char('z');

    assert!(app.commit_filter().is_none());
    assert!(app.active_filter.is_none());
    assert!(app.status.as_deref().unwrap().contains("zz"));
}

#[test]
fn blank_filter_commits_full_queue() {
    let mut app = app();
    app.enter_filter_mode();
    app.push_filter_char(' ');
    let q = app.commit_filter().unwrap().unwrap();
    assert_eq!(q.len(), 3);
    assert!(app.active_filter.is_none());
}

#[test]
fn clear_filter_restores_full_queue() {
    let mut app = app();
    app.active_filter = Some("techno".to_string());
    let q = app.clear_filter().unwrap();
    assert_eq!(q.len(), 3);
    assert!(app.active_filter.is_none());
}

#[test]
fn cancel_and_backspace_edit_the_prompt() {
    let mut app = app();
    app.enter_filter_mode();
    app.push_filter_char('a');
    app.push_filter_char('b');
    app.pop_filter_char();
    assert_eq!(app.filter_query, "a");
    app.cancel_filter();
    assert!(!app.filter_mode);
    assert!(app.filter_query.is_empty());
}

#[test]
fn warnings_become_status_hints() {
    let mut app = app();
    app.apply_player_event(&PlayerEvent::Warning(PlayerError::PlaybackBlocked(
        "no audio output device".to_string(),
    )));
    assert!(app.status.as_deref().unwrap().contains("Press space"));

    app.apply_player_event(&PlayerEvent::Warning(PlayerError::LoadError {
        index: 0,
        cause: MediaError::NotLoaded,
    }));
    assert_eq!(
        app.status.as_deref(),
        Some("Could not play track: no media loaded")
    );

    app.clear_status();
    assert!(app.status.is_none());
}

#[test]
fn queue_rows_highlight_current_index() {
    let app = app();
    let q = app.queue_for(None).unwrap();
    let rows = QueueView::rows(&q, Some(1));
    assert_eq!(rows.len(), 3);
    assert_eq!(rows.iter().filter(|r| r.active).count(), 1);
    assert!(rows[1].active);
    assert_eq!(rows[1].title, "Warehouse");
    assert_eq!(rows[2].genre, "Melodic Techno");
}

#[test]
fn queue_view_cursor_wraps_and_snaps_to_current_on_open() {
    let mut view = QueueView::new(false);
    view.toggle(Some(2));
    assert!(view.open);
    assert_eq!(view.cursor(), 2);

    view.cursor_down(3);
    assert_eq!(view.cursor(), 0);
    view.cursor_up(3);
    assert_eq!(view.cursor(), 2);

    view.toggle(Some(0));
    assert!(!view.open);
    view.follow(1);
    assert_eq!(view.cursor(), 1);
}

#[test]
fn index_changes_move_cursor_only_while_view_is_closed() {
    let mut app = app();
    app.queue_view = QueueView::new(false);
    app.apply_player_event(&PlayerEvent::IndexChanged(2));
    assert_eq!(app.queue_view.cursor(), 2);

    app.queue_view.toggle(Some(2));
    app.queue_view.cursor_up(3);
    app.apply_player_event(&PlayerEvent::IndexChanged(0));
    assert_eq!(app.queue_view.cursor(), 1);
}

#[test]
fn choosing_a_row_selects_it_with_autoplay_and_closes_view() {
    let app = app();
    let mut player = QueuePlayer::new(FakeBackend::with_duration(60), PlayerOptions::default());
    player.set_queue(app.queue_for(None).unwrap(), 0, false);
    player.poll();

    let mut view = QueueView::new(false);
    view.toggle(player.current_index());
    view.cursor_down(player.queue().len());
    view.choose(&mut player).unwrap();

    assert!(!view.open);
    assert_eq!(player.current_index(), Some(1));
    player.poll();
    assert!(player.backend().playing);
}

#[test]
fn choosing_clamps_a_stale_cursor_to_the_last_row() {
    let app = app();
    let mut player = QueuePlayer::new(FakeBackend::with_duration(60), PlayerOptions::default());
    player.set_queue(app.queue_for(None).unwrap(), 0, false);
    player.poll();

    let mut view = QueueView::new(false);
    view.toggle(Some(0));
    // Cursor left over from a longer queue.
    view.cursor_up(10);
    assert_eq!(view.cursor(), 9);

    view.choose(&mut player).unwrap();
    assert_eq!(view.cursor(), 2);
    assert_eq!(player.current_index(), Some(2));
}
