//! UI rendering for the terminal user interface.
//!
//! Everything here is derived from the `App` model and the player on each
//! frame; nothing is cached between draws.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, QueueView};
use crate::config::Settings;
use crate::library::{Track, format_clock, fuzzy_match_positions, search};
use crate::player::{MediaBackend, PlaybackStatus, QueuePlayer, RepeatMode, Transport};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next track".to_string());
    // H/L and +/- are filled from config.
    map.insert("tab".to_string(), "queue".to_string());
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "play selected".to_string());
    map.insert("/".to_string(), "filter".to_string());
    map.insert("c".to_string(), "clear filter".to_string());
    map.insert("s".to_string(), "shuffle".to_string());
    map.insert("r".to_string(), "repeat".to_string());
    map.insert("m".to_string(), "mute".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating the configured steps.
fn controls_text(scrub_seconds: u64, volume_step: f32) -> String {
    let order = [
        "space/p", "h/l", "H/L", "tab", "j/k", "enter", "/", "c", "s", "r", "+/-", "m", "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] seek -/+{scrub_seconds}s")),
            "+/-" => Some(format!(
                "[+/-] volume {}%",
                (volume_step * 100.0).round() as u32
            )),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}")),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn repeat_text(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "REPEAT: Off",
        RepeatMode::One => "REPEAT: One",
        RepeatMode::All => "REPEAT: All",
    }
}

fn transport_text(transport: Transport, status: PlaybackStatus) -> &'static str {
    match (transport, status) {
        (Transport::Loading, _) => "Loading",
        (_, PlaybackStatus::Playing) => "Playing",
        (_, PlaybackStatus::Paused) => "Paused",
        (_, PlaybackStatus::Stopped) => "Stopped",
    }
}

/// Uppercase the characters of `text` matched by `query`, the way the filter
/// prompt highlights hits.
fn highlight(text: &str, query: &str) -> String {
    let Some(positions) = fuzzy_match_positions(text, query) else {
        return text.to_string();
    };

    let mut rendered = String::new();
    let mut pos_iter = positions.into_iter();
    let mut next_pos = pos_iter.next();
    for (ci, ch) in text.chars().enumerate() {
        if next_pos == Some(ci) {
            rendered.extend(ch.to_uppercase());
            next_pos = pos_iter.next();
        } else {
            rendered.push(ch);
        }
    }
    rendered
}

fn details_text(track: &Track) -> String {
    let uploaded = track
        .uploaded_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Title: {}\nArtist: {}\nAlbum: {}\nGenre: {}\nUploaded: {}",
        track.title, track.artist, track.album, track.genre, uploaded
    )
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI and return the area of the progress bar, so mouse
/// clicks can be mapped to a seek position.
pub fn draw<B: MediaBackend>(
    frame: &mut Frame,
    app: &App,
    player: &QueuePlayer<B>,
    settings: &Settings,
) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(app.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let state = player.state();

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        match player.current_track() {
            Some(track) => {
                parts.push(format!("Track: {}", track.label()));
                parts.push(transport_text(player.transport(), state.status).to_string());
            }
            None => parts.push("No track".to_string()),
        }

        parts.push(if state.shuffle_enabled {
            "SHUFFLE: On".to_string()
        } else {
            "SHUFFLE: Off".to_string()
        });
        parts.push(repeat_text(state.repeat_mode).to_string());

        if state.muted {
            parts.push("VOLUME: muted".to_string());
        } else {
            parts.push(format!(
                "VOLUME: {}%",
                (state.volume * 100.0).round() as u32
            ));
        }

        if app.filter_mode {
            parts.push(format!("FILTER: {}_", app.filter_query));
        } else if let Some(filter) = &app.active_filter {
            parts.push(format!("FILTER: {filter}"));
        }

        parts.push(format!("Source: {}", app.source_label));

        if let Some(hint) = &app.status {
            parts.push(hint.clone());
        }

        parts.join(" • ")
    };

    let status_par = Paragraph::new(status)
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Progress
    let progress_block = Block::default().borders(Borders::ALL).title(" progress ");
    let progress_area = progress_block.inner(chunks[2]);
    let ratio = match state.duration_seconds {
        Some(d) if d > 0.0 => (state.position_seconds / d).clamp(0.0, 1.0),
        _ => 0.0,
    };
    let label = format!(
        "{} / {}",
        format_clock(state.position_seconds),
        format_clock(state.duration_seconds.unwrap_or(0.0))
    );
    let gauge = Gauge::default()
        .block(progress_block)
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, chunks[2]);

    // Main panel: filter preview, queue, or the current track's details.
    let main = chunks[3];
    if app.filter_mode {
        let q = app.filter_query.trim();
        let items: Vec<ListItem> = search(&app.catalog, q)
            .into_iter()
            .map(|i| ListItem::new(highlight(&app.catalog[i].label(), q)))
            .collect();
        let title = format!(" matches ({}) ", items.len());
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(list, main);
    } else if app.queue_view.open {
        let rows = QueueView::rows(player.queue(), player.current_index());
        let items: Vec<ListItem> = rows
            .iter()
            .map(|row| {
                let text = format!(
                    "{:>3}. {} - {} [{}]",
                    row.index + 1,
                    row.artist,
                    row.title,
                    row.genre
                );
                if row.active {
                    ListItem::new(text).style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    ListItem::new(text)
                }
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" queue ({}) ", rows.len())),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        if !rows.is_empty() {
            list_state.select(Some(app.queue_view.cursor().min(rows.len() - 1)));
        }
        frame.render_stateful_widget(list, main, &mut list_state);
    } else {
        let text = match player.current_track() {
            Some(track) => details_text(track),
            None if app.has_tracks() => "Queue is empty. Press c to clear the filter.".to_string(),
            None => "No tracks found.".to_string(),
        };
        let details = Paragraph::new(text)
            .block(left_padded(" now playing "))
            .wrap(Wrap { trim: true });
        frame.render_widget(details, main);
    }

    let footer_text = controls_text(
        settings.controls.scrub_seconds,
        settings.controls.volume_step,
    );
    let footer = Paragraph::new(footer_text)
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    progress_area
}
