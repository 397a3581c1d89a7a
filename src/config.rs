use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::LevelPolicy;
use crate::snake::Position;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns true when `position` lies inside `[0, width) x [0, height)`.
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        position.is_within_bounds(self)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

/// Errors raised while building or loading a configuration.
///
/// These are fatal at construction time; nothing inside a running game
/// produces them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u16, height: u16 },
    #[error("initial snake length must be at least 1")]
    ZeroSnakeLength,
    #[error("a snake of length {length} does not fit in a grid {width} cells wide")]
    SnakeTooLong { length: u16, width: u16 },
    #[error("max level must be at least 1")]
    ZeroMaxLevel,
    #[error("start level {start} is outside 1..={max}")]
    StartLevelOutOfRange { start: u32, max: u32 },
    #[error("level progression needs a non-zero number of {0} per level")]
    ZeroProgressionStep(&'static str),
    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable settings for one game engine instance.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridSize,
    pub initial_length: u16,
    pub start_level: u32,
    pub levels: LevelPolicy,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            initial_length: DEFAULT_SNAKE_LENGTH,
            start_level: 1,
            levels: LevelPolicy::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Creates the default configuration for a custom grid size.
    #[must_use]
    pub fn with_grid(width: u16, height: u16) -> Self {
        Self {
            grid: GridSize { width, height },
            ..Self::default()
        }
    }

    /// Loads a JSON config file and validates it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks every constraint the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid.width,
                height: self.grid.height,
            });
        }

        if self.initial_length == 0 {
            return Err(ConfigError::ZeroSnakeLength);
        }

        if self.initial_length > self.grid.width {
            return Err(ConfigError::SnakeTooLong {
                length: self.initial_length,
                width: self.grid.width,
            });
        }

        self.levels.validate()?;

        if self.start_level == 0 || self.start_level > self.levels.max_level {
            return Err(ConfigError::StartLevelOutOfRange {
                start: self.start_level,
                max: self.levels.max_level,
            });
        }

        Ok(())
    }

    /// Returns the starting head cell: grid centre, shifted right when the
    /// body would otherwise stick out of the left edge.
    #[must_use]
    pub fn start_position(&self) -> Position {
        let tail_room = self.initial_length.saturating_sub(1);
        Position {
            x: i32::from((self.grid.width / 2).max(tail_room)),
            y: i32::from(self.grid.height / 2),
        }
    }
}

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 20;

/// Default grid height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Default number of segments the snake starts with.
pub const DEFAULT_SNAKE_LENGTH: u16 = 3;

/// Horizontal margin between the terminal edge and the play area.
pub const PLAY_AREA_MARGIN_X: u16 = 1;

/// Terminal columns used to draw one logical cell.
pub const CELL_WIDTH: u16 = 2;

pub const GLYPH_WALL: &str = "██";
pub const GLYPH_FRUIT: &str = "()";
pub const GLYPH_SNAKE_BODY: &str = "▓▓";
pub const GLYPH_SNAKE_HEAD_UP: &str = "▀▀";
pub const GLYPH_SNAKE_HEAD_DOWN: &str = "▄▄";
pub const GLYPH_SNAKE_HEAD_LEFT: &str = "◀█";
pub const GLYPH_SNAKE_HEAD_RIGHT: &str = "█▶";

/// Separator between HUD fields.
pub const GLYPH_HUD_SEPARATOR: &str = "│";

#[cfg(test)]
mod tests {
    use super::{ConfigError, GameConfig, GridSize};
    use crate::snake::Position;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.grid.total_cells(), 400);
        assert_eq!(config.start_position(), Position { x: 10, y: 10 });
    }

    #[test]
    fn empty_grid_is_rejected() {
        let config = GameConfig::with_grid(0, 10);

        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn zero_length_snake_is_rejected() {
        let config = GameConfig {
            initial_length: 0,
            ..GameConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroSnakeLength)
        ));
    }

    #[test]
    fn snake_wider_than_grid_is_rejected() {
        let config = GameConfig {
            initial_length: 6,
            ..GameConfig::with_grid(5, 5)
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnakeTooLong {
                length: 6,
                width: 5
            })
        ));
    }

    #[test]
    fn start_level_must_be_within_policy_range() {
        let mut config = GameConfig::default();
        config.start_level = config.levels.max_level + 1;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartLevelOutOfRange { .. })
        ));
    }

    #[test]
    fn start_position_keeps_tail_inside_narrow_grid() {
        let config = GameConfig {
            initial_length: 4,
            ..GameConfig::with_grid(5, 3)
        };

        assert!(config.validate().is_ok());
        assert_eq!(config.start_position(), Position { x: 3, y: 1 });
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "grid": { "width": 30, "height": 12 } }"#)
                .expect("partial config should parse");

        assert_eq!(
            config.grid,
            GridSize {
                width: 30,
                height: 12
            }
        );
        assert_eq!(config.initial_length, 3);
        assert_eq!(config.start_level, 1);
    }

    #[test]
    fn missing_config_file_reports_read_error() {
        let path = std::env::temp_dir().join("grid-snake-tests-no-such-config.json");

        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn malformed_config_file_reports_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "grid-snake-tests-malformed-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").expect("test file write should succeed");

        let result = GameConfig::load(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
