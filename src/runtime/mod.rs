use std::env;

use anyhow::{Context, bail};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::library;
use crate::logging;
use crate::player::{QueuePlayer, RodioBackend};

mod event_loop;
mod settings;
mod startup;
mod unlock;

use startup::LaunchArgs;
use unlock::FirstInteractionUnmute;

pub fn run() -> anyhow::Result<()> {
    let (settings, config_problem) = settings::load_settings();
    let _log_guard = logging::init_logging(&settings.logging)?;
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let cwd = env::current_dir().context("cannot determine current directory")?;
    let args = match LaunchArgs::parse(env::args().skip(1), cwd) {
        Ok(args) => args,
        Err(msg) => bail!("{msg}\nusage: encore [SOURCE] [--export FILE]"),
    };

    let catalog = startup::load_catalog(&args.source, &settings.library)
        .with_context(|| format!("cannot load tracks from {}", args.source.display()))?;
    info!(source = %args.source.display(), tracks = catalog.len(), "catalogue loaded");

    if let Some(out) = &args.export {
        library::save_manifest(out, &catalog)
            .with_context(|| format!("cannot write manifest {}", out.display()))?;
        info!(path = %out.display(), "manifest exported");
        return Ok(());
    }

    let mut player = QueuePlayer::new(RodioBackend::open_default(), startup::player_options(&settings));
    let mut app = App::new(catalog, args.source.display().to_string(), &settings.ui);
    player.set_queue(app.queue_for(None)?, 0, settings.player.autoplay);
    let unlock = FirstInteractionUnmute::arm(&mut player, settings.player.unmute_on_first_interaction);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new(unlock);
    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut player, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
