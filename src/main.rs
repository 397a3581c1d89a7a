use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::config::{ConfigError, GameConfig};
use grid_snake::game::{Game, TickOutcome};
use grid_snake::input::{GameInput, InputHandler, IntentQueue};
use grid_snake::level::Progression;
use grid_snake::renderer::Overlay;
use grid_snake::terminal_runtime::TerminalSession;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Upper bound on how long one input poll blocks, so the screen keeps redrawing.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Initial snake length.
    #[arg(long)]
    length: Option<u16>,

    #[arg(long = "start-level")]
    start_level: Option<u32>,

    #[arg(long = "max-level")]
    max_level: Option<u32>,

    /// Clear a level by eating N x level fruit instead of reaching a score.
    #[arg(long, value_name = "FRUITS_PER_LEVEL")]
    quota: Option<u32>,

    /// Seed for a reproducible board.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file. Filter with RUST_LOG (default: info).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to set up logging: {0}")]
    Logging(String),
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
    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let config = build_config(&cli)?;
    info!(?config, "starting");

    let game = Game::new(config)?;
    let mut session = TerminalSession::enter()?;
    play(&mut session, game)
}

fn init_tracing(path: &Path) -> Result<(), AppError> {
    let file = File::create(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| AppError::Logging(error.to_string()))
}

fn build_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid.width = width;
    }
    if let Some(height) = cli.height {
        config.grid.height = height;
    }
    if let Some(length) = cli.length {
        config.initial_length = length;
    }
    if let Some(start_level) = cli.start_level {
        config.start_level = start_level;
    }
    if let Some(max_level) = cli.max_level {
        config.levels.max_level = max_level;
    }
    if let Some(fruits_per_level) = cli.quota {
        config.levels.progression = Progression::FruitQuota { fruits_per_level };
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate()?;
    Ok(config)
}

fn play(session: &mut TerminalSession, mut game: Game) -> Result<(), AppError> {
    let mut input = InputHandler::new();
    let mut intents = IntentQueue::new();
    let mut overlay = Overlay::Start;
    let mut last_tick = Instant::now();

    loop {
        session.draw(&game, overlay)?;

        let ticking = overlay == Overlay::None && !game.is_finished();
        let timeout = poll_timeout(ticking, game.settings().tick_interval, last_tick.elapsed());

        if let Some(game_input) = input.poll_input(timeout)? {
            match game_input {
                GameInput::Quit => break,
                GameInput::Confirm if game.is_finished() => {
                    game = game.reset()?;
                    intents.clear();
                    overlay = Overlay::Start;
                }
                GameInput::Confirm if overlay == Overlay::Start => {
                    overlay = Overlay::None;
                    last_tick = Instant::now();
                }
                GameInput::Pause if !game.is_finished() => match overlay {
                    Overlay::None => overlay = Overlay::Paused,
                    Overlay::Paused => {
                        overlay = Overlay::None;
                        last_tick = Instant::now();
                    }
                    Overlay::Start => {}
                },
                GameInput::Direction(direction) if overlay == Overlay::None => {
                    intents.push(game.snake.direction(), direction);
                }
                _ => {}
            }
        }

        if overlay != Overlay::None || game.is_finished() {
            continue;
        }

        if last_tick.elapsed() >= game.settings().tick_interval {
            let outcome = game.tick(intents.next_intent());
            last_tick = Instant::now();

            if matches!(outcome, TickOutcome::Collided(_) | TickOutcome::Won) {
                intents.clear();
            }
        }
    }

    info!(score = game.score, level = game.level(), "quit");
    Ok(())
}

/// How long one input poll may block. Screens that do not tick just wait a
/// frame; a running game waits until its next tick is due.
fn poll_timeout(ticking: bool, tick_interval: Duration, since_last_tick: Duration) -> Duration {
    if !ticking {
        return FRAME_INTERVAL;
    }

    tick_interval
        .saturating_sub(since_last_tick)
        .min(FRAME_INTERVAL)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{FRAME_INTERVAL, poll_timeout};

    #[test]
    fn idle_screens_wait_a_full_frame() {
        let interval = Duration::from_millis(100);

        assert_eq!(
            poll_timeout(false, interval, Duration::from_secs(5)),
            FRAME_INTERVAL
        );
        assert_eq!(poll_timeout(false, interval, interval), FRAME_INTERVAL);
    }

    #[test]
    fn running_game_waits_until_next_tick() {
        let interval = Duration::from_millis(100);

        assert_eq!(
            poll_timeout(true, interval, Duration::from_millis(10)),
            FRAME_INTERVAL
        );
        assert_eq!(
            poll_timeout(true, interval, Duration::from_millis(95)),
            Duration::from_millis(5)
        );
        assert_eq!(
            poll_timeout(true, interval, Duration::from_millis(150)),
            Duration::ZERO
        );
    }
}
