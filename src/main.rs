use anyhow::{Context, Result};
use arcade_snake::game::{GameConfig, GameEngine, ProgressionMode};
use arcade_snake::metrics::StatsStore;
use arcade_snake::modes::HumanMode;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arcade_snake")]
#[command(version, about = "Snake with levels, drifting obstacles and rival snakes")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Cells per side of the square grid (overrides the config file)
    #[arg(long)]
    grid_size: Option<i32>,

    /// Play one endless level until the win score instead of five levels
    #[arg(long)]
    single_level: bool,

    /// Score that wins a single-level run
    #[arg(long, default_value = "500")]
    win_score: u32,

    /// Seed for reproducible spawns and rival behaviour
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score and play count are kept
    #[arg(long, default_value = "snake_stats.json")]
    stats_file: PathBuf,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
}

/// The terminal belongs to the game, so logs only go to a file when asked
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    if cli.single_level {
        config.progression = ProgressionMode::SingleLevel {
            win_score: cli.win_score,
        };
    }
    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let config = build_config(&cli)?;
    info!(
        grid_size = config.grid_size,
        progression = ?config.progression,
        seed = ?cli.seed,
        "starting"
    );

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };
    let store = StatsStore::new(&cli.stats_file);

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(engine, store)?;
            human_mode.run().await?;
        }
    }

    Ok(())
}
