use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::config::{ConfigError, GameConfig};
use crate::grid::{Grid, Occupant};
use crate::input::Direction;
use crate::level::{LevelProgress, LevelSettings};
use crate::snake::{Position, Snake};

/// Why a run ended in a collision.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    OutOfBounds,
    Wall,
    OwnBody,
}

/// Current high-level gameplay state.
///
/// `GameOver` and `Won` are terminal until [`Game::reset`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    GameOver(DeathReason),
    Won,
}

/// What a single tick did, for the driver to render or react to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    Continued,
    FruitEaten,
    /// A fruit was eaten and it completed the level.
    LeveledUp,
    Collided(DeathReason),
    Won,
}

/// Complete mutable game state for one run.
#[derive(Debug, Clone)]
pub struct Game {
    pub grid: Grid,
    pub snake: Snake,
    pub score: u32,
    level: u32,
    fruit_eaten_this_level: u32,
    settings: LevelSettings,
    status: GameStatus,
    tick_count: u64,
    fruit_starved: bool,
    config: GameConfig,
    rng: StdRng,
}

impl Game {
    /// Creates a new run. Uses `config.seed` when set, entropy otherwise.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::build(config, rng)
    }

    /// Creates a deterministic run for tests and reproducible simulations.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: GameConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = Grid::new(config.grid)?;
        let mut snake = Snake::new(config.start_position(), config.initial_length)?;
        let settings = config.levels.settings(config.start_level);
        snake.set_colors(settings.palette.head, settings.palette.body);

        let mut game = Self {
            grid,
            snake,
            score: 0,
            level: settings.level,
            fruit_eaten_this_level: 0,
            settings,
            status: GameStatus::Running,
            tick_count: 0,
            fruit_starved: false,
            config,
            rng,
        };

        game.add_walls(settings.wall_count);
        game.replenish_fruit();

        debug!(
            width = game.config.grid.width,
            height = game.config.grid.height,
            level = game.level,
            walls = game.grid.wall_count(),
            "new run"
        );

        Ok(game)
    }

    /// Returns a fresh run with the same configuration.
    ///
    /// The new run is seeded from this run's RNG, so a seeded session stays
    /// reproducible across restarts.
    pub fn reset(&mut self) -> Result<Self, ConfigError> {
        let seed = self.rng.r#gen::<u64>();
        Self::build(self.config.clone(), StdRng::seed_from_u64(seed))
    }

    /// Advances simulation by one gameplay tick.
    ///
    /// `intent` of `None` keeps the current heading. Ticking a finished run
    /// changes nothing and repeats its terminal outcome.
    pub fn tick(&mut self, intent: Option<Direction>) -> TickOutcome {
        match self.status {
            GameStatus::Running => {}
            GameStatus::GameOver(reason) => return TickOutcome::Collided(reason),
            GameStatus::Won => return TickOutcome::Won,
        }

        self.tick_count += 1;

        if let Some(direction) = intent {
            if !self.snake.set_direction(direction) {
                trace!(?direction, "reversal ignored");
            }
        }

        let next_head = self.snake.next_head_position();
        if let Some(reason) = self.collision_at(next_head) {
            self.status = GameStatus::GameOver(reason);
            info!(
                ?reason,
                score = self.score,
                level = self.level,
                ticks = self.tick_count,
                "game over"
            );
            return TickOutcome::Collided(reason);
        }

        let ate_fruit = self.grid.occupant_at(next_head).is_fruit();
        if ate_fruit {
            self.grid.clear(next_head);
            self.snake.grow(1);
        }

        self.snake.advance();

        let mut outcome = TickOutcome::Continued;
        if ate_fruit {
            self.score += 1;
            self.fruit_eaten_this_level += 1;
            outcome = TickOutcome::FruitEaten;
            debug!(score = self.score, length = self.snake.len(), "fruit eaten");
        }

        if self.config.levels.is_complete(self.level, self.progress()) {
            if self.config.levels.is_max_level(self.level) {
                self.status = GameStatus::Won;
                info!(score = self.score, level = self.level, "game won");
                return TickOutcome::Won;
            }

            self.level_up();
            outcome = TickOutcome::LeveledUp;
        }

        self.replenish_fruit();
        outcome
    }

    fn collision_at(&self, next_head: Position) -> Option<DeathReason> {
        if !self.grid.size().contains(next_head) {
            return Some(DeathReason::OutOfBounds);
        }

        if self.grid.occupant_at(next_head) == Occupant::Wall {
            return Some(DeathReason::Wall);
        }

        if self.snake.would_bite_itself(next_head) {
            return Some(DeathReason::OwnBody);
        }

        None
    }

    fn level_up(&mut self) {
        let previous_walls = self.settings.wall_count;

        self.level += 1;
        self.fruit_eaten_this_level = 0;
        self.settings = self.config.levels.settings(self.level);
        self.snake
            .set_colors(self.settings.palette.head, self.settings.palette.body);
        self.add_walls(self.settings.wall_count.saturating_sub(previous_walls));

        info!(
            level = self.level,
            score = self.score,
            tick_ms = self.settings.tick_interval.as_millis() as u64,
            walls = self.grid.wall_count(),
            "level up"
        );
    }

    /// Adds walls away from the snake and the cell right in front of it.
    fn add_walls(&mut self, count: u32) {
        let snake = &self.snake;
        let ahead = snake.next_head_position();

        for placed in 0..count {
            let spot = self.grid.place_random(&mut self.rng, Occupant::Wall, |cell| {
                cell == ahead || snake.occupies(cell)
            });

            if spot.is_none() {
                warn!(placed, requested = count, "no room left for walls");
                return;
            }
        }
    }

    /// Tops fruit up to the level's count. Runs every tick so a board that
    /// was full when fruit was eaten gets fruit again once space frees up.
    fn replenish_fruit(&mut self) {
        let target = usize::try_from(self.settings.fruit_count).unwrap_or(usize::MAX);
        let missing = target.saturating_sub(self.grid.fruit_count());
        let fruit = Occupant::Fruit(self.settings.palette.fruit);
        let snake = &self.snake;

        for _ in 0..missing {
            let spot = self
                .grid
                .place_random(&mut self.rng, fruit, |cell| snake.occupies(cell));

            if spot.is_none() {
                if !self.fruit_starved {
                    warn!(missing, "no empty cell for fruit, continuing without");
                }
                self.fruit_starved = true;
                return;
            }
        }

        self.fruit_starved = false;
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status != GameStatus::Running
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        match self.status {
            GameStatus::GameOver(reason) => Some(reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Settings of the current level, including the tick interval the
    /// driver should wait between ticks.
    #[must_use]
    pub fn settings(&self) -> &LevelSettings {
        &self.settings
    }

    #[must_use]
    pub fn progress(&self) -> LevelProgress {
        LevelProgress {
            score: self.score,
            fruit_eaten_this_level: self.fruit_eaten_this_level,
        }
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
