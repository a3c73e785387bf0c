use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use level_snake::game::{BoardConfig, GameEngine};
use level_snake::logging::init_file_logger;
use level_snake::modes::HumanMode;
use simplelog::LevelFilter;

#[derive(Parser)]
#[command(name = "level_snake")]
#[command(version, about = "Snake with level boards and obstacles")]
struct Cli {
    /// JSON board description
    #[arg(long, default_value = "boards/classic.json")]
    board: PathBuf,

    /// Start this level right away instead of showing the level menu
    #[arg(long)]
    level: Option<String>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// File that receives log output
    #[arg(long, default_value = "level_snake.log")]
    log_file: PathBuf,

    /// Log verbosity
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_file_logger(&cli.log_file, cli.log_level.into())?;

    // A broken board is fatal before the terminal is touched
    let board = BoardConfig::load(&cli.board)?;
    log::info!(
        "Loaded board {:?}: {}x{} cells, levels: {}",
        cli.board,
        board.columns(),
        board.rows(),
        board.level_names().collect::<Vec<_>>().join(", ")
    );

    let first_level = board
        .levels
        .first()
        .map(|level| level.name.clone())
        .context("Board defines no levels")?;
    let level = cli.level.clone().unwrap_or(first_level);

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(board, &level, seed)?,
        None => GameEngine::new(board, &level)?,
    };

    let mut human_mode = if cli.level.is_some() {
        HumanMode::playing(engine)
    } else {
        HumanMode::with_menu(engine)
    };
    human_mode.run().await?;

    log::info!("Bye");
    Ok(())
}
