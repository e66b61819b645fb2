use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::App;
use crate::config;
use crate::player::{MediaBackend, Queue, QueuePlayer};
use crate::runtime::unlock::FirstInteractionUnmute;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Inner area of the progress bar as of the last draw.
    pub progress_area: Rect,
    pub unlock: FirstInteractionUnmute,
}

impl EventLoopState {
    pub fn new(unlock: FirstInteractionUnmute) -> Self {
        Self {
            progress_area: Rect::default(),
            unlock,
        }
    }
}

/// Main terminal event loop: pumps media events into the player, draws, and
/// handles input. Returns `Ok(())` when shutdown is requested.
pub fn run<B: MediaBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut QueuePlayer<B>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        player.poll();
        for ev in player.drain_events() {
            app.apply_player_event(&ev);
        }

        terminal.draw(|f| state.progress_area = ui::draw(f, app, player, settings))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, app, player, state) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, player, state),
                _ => {}
            }
        }
    }

    debug!("quit requested");
    Ok(())
}

/// Replace the player's queue, keeping playback going if it already was.
fn install_queue<B: MediaBackend>(queue: Queue, app: &mut App, player: &mut QueuePlayer<B>) {
    let autoplay = player.keeps_playing();
    debug!(len = queue.len(), autoplay, "installing queue");
    player.set_queue(queue, 0, autoplay);
    app.queue_view.reset(player.current_index());
}

/// Handle one key press. Returns `true` when the app should quit.
pub(crate) fn handle_key_event<B: MediaBackend>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut QueuePlayer<B>,
    state: &mut EventLoopState,
) -> bool {
    state.unlock.on_interaction(player);

    if app.filter_mode {
        match key.code {
            KeyCode::Esc => app.cancel_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Enter => match app.commit_filter() {
                Some(Ok(queue)) => install_queue(queue, app, player),
                Some(Err(e)) => {
                    warn!(error = %e, "cannot build filtered queue");
                    app.status = Some(e.to_string());
                }
                None => {}
            },
            KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
            _ => {}
        }
        return false;
    }

    app.clear_status();

    if app.queue_view.open {
        let len = player.queue().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                app.queue_view.cursor_down(len);
                return false;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.queue_view.cursor_up(len);
                return false;
            }
            KeyCode::Enter => {
                if let Err(e) = app.queue_view.choose(player) {
                    app.status = Some(e.to_string());
                }
                return false;
            }
            KeyCode::Esc => {
                app.queue_view.toggle(player.current_index());
                return false;
            }
            _ => {}
        }
    }

    let volume_step = settings.controls.volume_step;
    let scrub = settings.controls.scrub_seconds as f64;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char(' ') | KeyCode::Char('p') => player.toggle_play_pause(),
        KeyCode::Char('l') | KeyCode::Char('n') => player.next(),
        KeyCode::Char('h') | KeyCode::Char('b') => player.previous(),
        KeyCode::Char('L') => player.seek_by(scrub),
        KeyCode::Char('H') => player.seek_by(-scrub),
        KeyCode::Char('s') => player.toggle_shuffle(),
        KeyCode::Char('r') => player.cycle_repeat(),
        KeyCode::Char('m') => player.toggle_mute(),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            player.set_volume(player.state().volume + volume_step)
        }
        KeyCode::Char('-') => player.set_volume(player.state().volume - volume_step),
        KeyCode::Tab => app.queue_view.toggle(player.current_index()),
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('c') => {
            if app.active_filter.is_some() {
                match app.clear_filter() {
                    Ok(queue) => install_queue(queue, app, player),
                    Err(e) => app.status = Some(e.to_string()),
                }
            }
        }
        _ => {}
    }

    false
}

/// A left click on the progress bar seeks to the clicked fraction.
pub(crate) fn handle_mouse_event<B: MediaBackend>(
    mouse: MouseEvent,
    player: &mut QueuePlayer<B>,
    state: &mut EventLoopState,
) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    state.unlock.on_interaction(player);

    let area = state.progress_area;
    if area.width == 0
        || mouse.row < area.y
        || mouse.row >= area.y + area.height
        || mouse.column < area.x
        || mouse.column >= area.x + area.width
    {
        return;
    }

    let ratio = f64::from(mouse.column - area.x) / f64::from(area.width);
    player.seek_ratio(ratio);
}
