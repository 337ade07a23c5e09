use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use grid_snake::config::{self, Board, Config};
use grid_snake::game::Driver;
use grid_snake::term::TermManager;

#[derive(Parser)]
#[command(name = "grid-snake")]
#[command(version, about = "Snake on a fixed grid in the terminal")]
struct Cli {
    /// Board width in tiles
    #[arg(long, default_value_t = config::BOARD_WIDTH_TILES)]
    width: u16,

    /// Board height in tiles
    #[arg(long, default_value_t = config::BOARD_HEIGHT_TILES)]
    height: u16,

    /// Milliseconds between simulation ticks
    #[arg(long, default_value_t = config::TICK_INTERVAL_MS)]
    tick_ms: u64,

    /// Seed for target placement (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log; the terminal itself is taken by the game
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            tick_interval: Duration::from_millis(self.tick_ms),
            seed: self.seed,
            ..Config::with_board(Board::new(self.width, self.height))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = cli.log_file.clone().unwrap_or_else(|| std::env::temp_dir().join("grid-snake.log"));
    let _guard = setup_logging(&log_file)?;

    let config = cli.config();
    config.validate().context("Invalid game configuration")?;

    let mut term = TermManager::new(&config);
    term.setup().context("Failed to set up the terminal")?;

    let mut driver = Driver::new(&config, term);
    let res = driver.run().context("Game loop failed");

    driver
        .into_presentation()
        .restore()
        .context("Failed to restore the terminal")?;

    res
}

/// Logs go to a file, controlled by `RUST_LOG` (default `info`).
fn setup_logging(path: &Path) -> Result<WorkerGuard> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path.file_name().context("Log file path has no file name")?;

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}", path.display());

    Ok(guard)
}
