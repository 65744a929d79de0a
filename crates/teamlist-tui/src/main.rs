//! teamlist - A terminal user interface for a team member roster.
//!
//! Loads the roster from its CSV storage file, lets you add, delete, sort,
//! filter and search members from the keyboard, and writes the roster back
//! on request.

mod app;
mod config;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use teamlist_core::storage;
use teamlist_core::RecordList;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use config::Config;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written inside the data directory
const LOG_FILE: &str = "teamlist.log";

const USAGE: &str = "\
Usage: teamlist [OPTIONS] [ROSTER.csv]

Opens the roster TUI. With ROSTER.csv, that file is imported instead of the
storage file.

Options:
  --print     Write the stored roster to stdout as CSV and exit
  -h, --help  Show this help";

/// What the command line asks for
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run { import: Option<PathBuf> },
    Print,
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [] => Ok(Command::Run { import: None }),
        [flag] if flag == "--print" => Ok(Command::Print),
        [flag] if flag == "-h" || flag == "--help" => Ok(Command::Help),
        [flag, ..] if flag.starts_with('-') => {
            anyhow::bail!("Unknown option `{}`\n\n{}", flag, USAGE)
        }
        [path] => Ok(Command::Run {
            import: Some(PathBuf::from(path)),
        }),
        _ => anyhow::bail!("Too many arguments\n\n{}", USAGE),
    }
}

/// Initialize the tracing subscriber for logging.
///
/// The terminal belongs to the TUI, so logs go to a file. Use the RUST_LOG
/// env var to control the level (e.g., RUST_LOG=debug).
fn init_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load()?;
    let import_arg = match command {
        Command::Print => return print_roster(&config),
        Command::Run { import } => import,
        Command::Help => None,
    };

    // Initialize logging; the guard flushes the log file on drop
    let _guard = init_tracing(&config.data_dir()?)?;
    info!("teamlist starting");

    let mut app = App::new(config.clone(), RecordList::with_sort_order(config.sort_order));
    load_roster(&mut app, import_arg.as_deref())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    // Remember the last sort order
    let mut config = app.config.clone();
    config.sort_order = app.list.sort_order();
    if let Err(e) = config.save() {
        warn!("Failed to save config: {:#}", e);
    }

    info!("teamlist shutting down");
    Ok(())
}

/// Fill the roster at startup.
///
/// An explicit path on the command line must import; a missing or broken
/// storage file only leaves a status message.
fn load_roster(app: &mut App, import_arg: Option<&Path>) -> Result<()> {
    if let Some(path) = import_arg {
        let report = storage::import_members(&mut app.list, path)
            .with_context(|| format!("Failed to import roster: {}", path.display()))?;
        info!(path = %path.display(), imported = report.imported, "Imported roster");
        app.dirty = true;
        app.status_message = Some(import_summary(path, &report));
        return Ok(());
    }

    let path = app.config.storage_path()?;
    if !path.exists() {
        info!(path = %path.display(), "No storage file yet");
        return Ok(());
    }

    match storage::import_members(&mut app.list, &path) {
        Ok(report) => {
            info!(path = %path.display(), imported = report.imported, "Loaded roster");
            for row_error in &report.row_errors {
                warn!("Skipped row in {}: {}", path.display(), row_error);
            }
            app.status_message = Some(import_summary(&path, &report));
        }
        Err(e) => {
            warn!("Failed to load roster: {}", e);
            app.status_message = Some(format!("Failed to load roster: {}", e));
        }
    }
    Ok(())
}

fn import_summary(path: &Path, report: &storage::ImportReport) -> String {
    if report.is_clean() {
        format!("Loaded {} members from {}", report.imported, path.display())
    } else {
        format!(
            "Loaded {} members from {}, skipped {} rows",
            report.imported,
            path.display(),
            report.row_errors.len()
        )
    }
}

/// Write the stored roster to stdout as CSV
fn print_roster(config: &Config) -> Result<()> {
    let path = config.storage_path()?;
    let mut list = RecordList::with_sort_order(config.sort_order);
    let report = storage::import_members(&mut list, &path)
        .with_context(|| format!("Failed to read roster: {}", path.display()))?;

    for row_error in &report.row_errors {
        eprintln!("Skipped {}", row_error);
    }

    storage::write_members(list.members(), io::stdout().lock())?;
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C always quits
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        if app.state == AppState::Quitting {
            return Ok(());
        }
    }
}
