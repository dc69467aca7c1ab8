//! about-face - terminal happiness face
//!
//! A single ratatui widget: a circular face whose smile tracks a happiness
//! value from 0 to 100. Drag the mouse upward over the face to cheer it up,
//! downward to sadden it. The value is saved on exit and restored at the
//! next launch.

mod app;
mod config;
mod frontend;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "about-face")]
#[command(about = "Terminal happiness face widget", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.about-face)
    /// Can also be set via ABOUT_FACE_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Initial happiness value, applied after any state restore
    #[arg(long, value_name = "VALUE")]
    happiness: Option<f32>,

    /// Skip state restore and start from defaults
    #[arg(long)]
    fresh: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete the saved widget state
    ResetState,
}

fn main() -> Result<()> {
    // Initialize logging to file (use RUST_LOG env var to control level)
    // TUI apps can't log to stdout, so we write to a file
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("about-face.log")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    let cli = Cli::parse();

    let base_dir = config::Config::base_dir(cli.data_dir.as_deref())?;
    let state_path = config::Config::state_path(&base_dir);

    if let Some(command) = cli.command {
        match command {
            Commands::ResetState => {
                if state_path.exists() {
                    std::fs::remove_file(&state_path)
                        .with_context(|| format!("Failed to remove {:?}", state_path))?;
                    println!("Removed saved state at {:?}", state_path);
                } else {
                    println!("No saved state at {:?}", state_path);
                }
                return Ok(());
            }
        }
    }

    let config_path = cli
        .config
        .unwrap_or_else(|| config::Config::config_path(&base_dir));
    let config = config::Config::load(&config_path)?;

    run_tui(config, state_path, cli.happiness, cli.fresh)
}

fn run_tui(
    config: config::Config,
    state_path: PathBuf,
    initial_happiness: Option<f32>,
    fresh: bool,
) -> Result<()> {
    let mut app = app::App::new(config);

    // Restore the saved happiness value, if any
    if !fresh {
        match state::SavedState::load(&state_path) {
            Ok(Some(saved)) => {
                tracing::info!(happiness = saved.happiness, "Restored widget state");
                app.face.restore_state(&saved);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Ignoring saved state: {e}");
            }
        }
    }

    if let Some(value) = initial_happiness {
        app.face.set_happiness(value);
    }

    let mut frontend = frontend::TuiFrontend::new()?;
    let (width, height) = frontend.size()?;
    app.face.on_resize(width, height);

    // Events mutate state and mark the widget dirty; one repaint per cycle
    // shows only the latest value no matter how many events arrived
    while app.running {
        for event in frontend.poll_events()? {
            app.handle_event(event);
        }

        if app.face.take_dirty() || app.needs_render {
            frontend.render(&mut app)?;
            app.needs_render = false;
        }
    }

    let (cols, rows) = frontend.size()?;
    frontend.cleanup()?;

    if app.config.persistence.autosave {
        if let Err(e) = app.face.save_state(cols, rows).save(&state_path) {
            tracing::error!("Failed to save widget state: {e}");
        }
    }

    Ok(())
}
