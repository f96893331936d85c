mod app;
mod completion;
mod config;
mod editor;
mod form;
mod generation;
mod logging;
mod modal_ui;
mod modals;
mod model;
mod prompt;
mod repository;
mod storage;
mod templates;
mod ui;
mod validators;
mod workbench;

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{DefaultTerminal, Terminal};
use tracing::{debug, info, warn};

use crate::app::{App, FocusPane};
use crate::completion::CompletionClient;
use crate::config::{ConfigLoadStatus, LoadedConfig};
use crate::model::Storyboard;
use crate::prompt::compile_for;
use crate::repository::StoryboardRepository;
use crate::ui::draw_ui;

/// Storyboard editor that compiles project scenes into an AI coding prompt pack.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// History file to use instead of the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List saved storyboards, newest first.
    List,
    /// Print the prompt pack stored on a storyboard.
    Show {
        /// Storyboard id or unique id prefix.
        id: String,
    },
    /// Print the compiled prompt for a storyboard without sending it.
    Compile {
        /// Storyboard id or unique id prefix.
        id: String,
    },
}

/// Contract a path by replacing the home directory with `~` for display.
fn contract_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(suffix) = path.strip_prefix(&home)
    {
        return format!("~/{}", suffix.display());
    }
    path.display().to_string()
}

/// Find a storyboard by exact id, or by an id prefix matching exactly one.
fn resolve<'a>(repository: &'a StoryboardRepository, id: &str) -> Result<&'a Storyboard> {
    let history = repository.storyboards();
    if let Some(sb) = history.iter().copied().find(|sb| sb.id.as_str() == id) {
        return Ok(sb);
    }
    let matches: Vec<&Storyboard> = history
        .into_iter()
        .filter(|sb| sb.id.as_str().starts_with(id))
        .collect();
    match matches.as_slice() {
        [sb] => Ok(*sb),
        [] => bail!("no storyboard with id {}", id),
        _ => bail!("id prefix {} is ambiguous ({} matches)", id, matches.len()),
    }
}

fn format_list_line(sb: &Storyboard) -> String {
    let generated = if sb.generated_spec.is_some() { "✓" } else { " " };
    format!(
        "{}  {}  {:>2} scenes  {}  {}",
        sb.id,
        sb.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        sb.scenes.len(),
        generated,
        sb.title
    )
}

fn run_command(command: Command, loaded_config: &LoadedConfig) -> Result<()> {
    let config = &loaded_config.config;
    let repository = StoryboardRepository::open(config.storage());

    match command {
        Command::List => {
            if repository.is_empty() {
                eprintln!(
                    "No storyboards in {}",
                    contract_path(repository.storage_path())
                );
            }
            for sb in repository.storyboards() {
                println!("{}", format_list_line(sb));
            }
        }
        Command::Show { id } => {
            let sb = resolve(&repository, &id)?;
            match &sb.generated_spec {
                Some(text) => println!("{}", text),
                None => bail!("storyboard {} has no generated prompt pack", sb.id),
            }
        }
        Command::Compile { id } => {
            let sb = resolve(&repository, &id)?;
            println!(
                "{}",
                compile_for(config.prompt.target, &sb.scenes, sb.project_type)
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    // Initialize logging before anything else
    let (session_id, log_directory, level_handle, _guard) = match logging::init("info") {
        Ok(ctx) => (
            ctx.session_id,
            Some(ctx.log_directory),
            Some(ctx.level_handle),
            Some(ctx._guard),
        ),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            (logging::generate_session_id(), None, None, None)
        }
    };

    // Load configuration
    let mut loaded_config = config::load_config();
    debug!(
        config_path = %loaded_config.config_path.display(),
        status = ?loaded_config.status,
        "config_loaded"
    );
    if let ConfigLoadStatus::Error(e) = &loaded_config.status {
        eprintln!("Warning: {} (using defaults)", e);
    }
    if let Some(path) = cli.storage {
        loaded_config.config.storage.path = path.to_string_lossy().into_owned();
    }

    if std::env::var_os("RUST_LOG").is_none()
        && let Some(handle) = &level_handle
        && let Err(e) = logging::update_log_level(handle, &loaded_config.config.logging.level)
    {
        warn!(error = %e, "log_level_from_config_rejected");
    }
    if let Some(dir) = &log_directory {
        logging::cleanup_old_logs(dir);
    }

    if let Some(command) = cli.command {
        return run_command(command, &loaded_config);
    }

    // The credential is checked before the terminal is touched.
    let client = CompletionClient::from_config(&loaded_config.config.completion)
        .context("cannot start the editor without a completion credential")?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let mut app = App::new(session_id.clone(), log_directory, loaded_config, level_handle)
        .with_completion(runtime, client);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    // An unfinished request is abandoned.
    if let Some(runtime) = app.runtime.take() {
        runtime.shutdown_background();
    }

    let duration = start_time.elapsed();
    info!(
        session_id = %session_id,
        duration_secs = duration.as_secs_f64(),
        "session_end"
    );

    result
}

fn run_app(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        // Pick up a finished completion request
        app.poll_generation();

        terminal.draw(|f| draw_ui(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a short timeout to keep the elapsed timer moving
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => scroll(app, false),
                    MouseEventKind::ScrollDown => scroll(app, true),
                    _ => {}
                },
                Event::Resize(_, _) => {
                    // Terminal resized, will be handled in next draw
                }
                _ => {}
            }
        }
    }
}

fn scroll(app: &mut App, down: bool) {
    if let Some(state) = &mut app.result_view_state {
        if down {
            state.scroll_down(3);
        } else {
            state.scroll_up(3);
        }
    } else if !app.has_modal() && app.focus == FocusPane::History {
        if down {
            app.history_down();
        } else {
            app.history_up();
        }
    }
}
