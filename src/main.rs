use std::fs::File;
use std::panic;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use grid_snake::config::{GridSize, Settings};
use grid_snake::error::AppError;
use grid_snake::game::Simulation;
use grid_snake::game_loop::{self, TickClock};
use grid_snake::terminal_runtime::{
    cleanup_terminal_best_effort, TerminalInput, TerminalPresenter, TerminalSession,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "grid-snake", version, about = "Snake on a wrap-around grid")]
struct Cli {
    /// Settings file (JSON). Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Simulation ticks per second.
    #[arg(long)]
    tps: Option<u32>,

    /// Seed for food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file; filter with RUST_LOG.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("grid-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    init_logging(cli.log_file.as_deref())?;

    let settings = resolve_settings(&cli)?;
    info!(?settings, "settings resolved");
    warn_if_terminal_too_small(settings.grid);

    let mut simulation = match settings.seed {
        Some(seed) => Simulation::new_with_seed(settings.grid, seed),
        None => Simulation::new(settings.grid),
    };

    install_panic_hook();
    let session = TerminalSession::enter()?;
    let mut presenter = TerminalPresenter::new(session, settings.grid);
    let mut input = TerminalInput;
    let mut clock = TickClock::new(settings.ticks_per_second);

    game_loop::run(&mut simulation, &mut input, &mut presenter, &mut clock)?;
    Ok(())
}

fn resolve_settings(cli: &Cli) -> Result<Settings, AppError> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    if let Some(width) = cli.width {
        settings.grid.width = width;
    }
    if let Some(height) = cli.height {
        settings.grid.height = height;
    }
    if let Some(tps) = cli.tps {
        settings.ticks_per_second = tps;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    settings.validate()?;
    Ok(settings)
}

fn init_logging(path: Option<&Path>) -> Result<(), AppError> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path).map_err(AppError::Log)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

fn warn_if_terminal_too_small(grid: GridSize) {
    let Ok((columns, rows)) = crossterm::terminal::size() else {
        return;
    };

    let needed_columns = u32::from(grid.width) * 2 + 2;
    let needed_rows = u32::from(grid.height) + 2;
    if u32::from(columns) < needed_columns || u32::from(rows) < needed_rows {
        warn!(
            columns,
            rows, needed_columns, needed_rows, "terminal smaller than the board; edges are clipped"
        );
    }
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal_best_effort();
        default_hook(panic_info);
    }));
}
