use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Plain 24-bit colour carried by game entities. Only the renderer reads it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Self = Self(255, 255, 255);
}

/// Colours used for one level.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Palette {
    pub head: Rgb,
    pub body: Rgb,
    pub fruit: Rgb,
}

const PALETTES: [Palette; 6] = [
    Palette {
        head: Rgb(200, 255, 200),
        body: Rgb(60, 200, 90),
        fruit: Rgb(230, 60, 60),
    },
    Palette {
        head: Rgb(200, 240, 255),
        body: Rgb(60, 150, 230),
        fruit: Rgb(250, 210, 60),
    },
    Palette {
        head: Rgb(255, 220, 255),
        body: Rgb(200, 80, 210),
        fruit: Rgb(120, 230, 120),
    },
    Palette {
        head: Rgb(255, 240, 200),
        body: Rgb(240, 150, 50),
        fruit: Rgb(90, 160, 255),
    },
    Palette {
        head: Rgb(220, 255, 255),
        body: Rgb(50, 200, 200),
        fruit: Rgb(255, 110, 180),
    },
    Palette {
        head: Rgb(255, 255, 210),
        body: Rgb(220, 220, 70),
        fruit: Rgb(170, 90, 255),
    },
];

/// Returns the palette for `level`, cycling through a fixed table.
#[must_use]
pub fn palette_for_level(level: u32) -> Palette {
    let index = (level.saturating_sub(1) as usize) % PALETTES.len();
    PALETTES[index]
}

/// What completes a level.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Progression {
    /// Advance once the cumulative score reaches `level * points_per_level`.
    ScoreThreshold { points_per_level: u32 },
    /// Advance after eating `level * fruits_per_level` fruit within the
    /// current level. That many fruit are kept on the board at once.
    FruitQuota { fruits_per_level: u32 },
}

/// Counters the policy looks at to decide whether a level is complete.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct LevelProgress {
    pub score: u32,
    pub fruit_eaten_this_level: u32,
}

/// Everything the engine and the driver need to know about one level.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LevelSettings {
    pub level: u32,
    /// Time between two ticks; the driver paces `tick` calls with it.
    pub tick_interval: Duration,
    /// Number of fruit kept on the board.
    pub fruit_count: u32,
    /// Total number of walls on the board once this level has started.
    pub wall_count: u32,
    /// Score (or fruit count, for quota progression) that completes the level.
    pub threshold: u32,
    pub palette: Palette,
}

/// Maps level numbers to difficulty settings.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelPolicy {
    pub progression: Progression,
    pub max_level: u32,
    pub walls_per_level: u32,
    /// Extra fruit on the board every this many levels (score mode only).
    pub levels_per_extra_fruit: u32,
    pub base_tick_ms: u64,
    pub tick_step_ms: u64,
    pub min_tick_ms: u64,
}

impl Default for LevelPolicy {
    fn default() -> Self {
        Self {
            progression: Progression::ScoreThreshold {
                points_per_level: DEFAULT_POINTS_PER_LEVEL,
            },
            max_level: DEFAULT_MAX_LEVEL,
            walls_per_level: DEFAULT_WALLS_PER_LEVEL,
            levels_per_extra_fruit: 3,
            base_tick_ms: DEFAULT_TICK_INTERVAL_MS,
            tick_step_ms: TICK_STEP_MS,
            min_tick_ms: MIN_TICK_INTERVAL_MS,
        }
    }
}

impl LevelPolicy {
    /// Fruit-quota progression with the default curve.
    #[must_use]
    pub fn fruit_quota(fruits_per_level: u32) -> Self {
        Self {
            progression: Progression::FruitQuota { fruits_per_level },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }

        match self.progression {
            Progression::ScoreThreshold {
                points_per_level: 0,
            } => return Err(ConfigError::ZeroProgressionStep("points")),
            Progression::FruitQuota {
                fruits_per_level: 0,
            } => return Err(ConfigError::ZeroProgressionStep("fruit")),
            _ => {}
        }

        if self.min_tick_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        Ok(())
    }

    /// Returns the settings for `level`, clamped to `1..=max_level`.
    #[must_use]
    pub fn settings(&self, level: u32) -> LevelSettings {
        let level = level.clamp(1, self.max_level.max(1));

        LevelSettings {
            level,
            tick_interval: self.tick_interval(level),
            fruit_count: self.fruit_count(level),
            wall_count: self.walls_per_level.saturating_mul(level - 1),
            threshold: self.threshold(level),
            palette: palette_for_level(level),
        }
    }

    /// Returns true when `progress` completes `level`.
    #[must_use]
    pub fn is_complete(&self, level: u32, progress: LevelProgress) -> bool {
        match self.progression {
            Progression::ScoreThreshold { .. } => progress.score >= self.threshold(level),
            Progression::FruitQuota { .. } => {
                progress.fruit_eaten_this_level >= self.threshold(level)
            }
        }
    }

    #[must_use]
    pub fn is_max_level(&self, level: u32) -> bool {
        level >= self.max_level
    }

    fn threshold(&self, level: u32) -> u32 {
        match self.progression {
            Progression::ScoreThreshold { points_per_level } => {
                points_per_level.saturating_mul(level)
            }
            Progression::FruitQuota { fruits_per_level } => fruits_per_level.saturating_mul(level),
        }
    }

    fn fruit_count(&self, level: u32) -> u32 {
        match self.progression {
            Progression::ScoreThreshold { .. } => {
                1 + (level - 1) / self.levels_per_extra_fruit.max(1)
            }
            Progression::FruitQuota { fruits_per_level } => fruits_per_level.saturating_mul(level),
        }
    }

    fn tick_interval(&self, level: u32) -> Duration {
        let speed_penalty_ms = u64::from(level.saturating_sub(1)).saturating_mul(self.tick_step_ms);
        let clamped_ms = self
            .base_tick_ms
            .saturating_sub(speed_penalty_ms)
            .max(self.min_tick_ms)
            .max(1);
        Duration::from_millis(clamped_ms)
    }
}

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Tick interval reduction per level in milliseconds.
pub const TICK_STEP_MS: u64 = 15;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 60;

/// Score needed per level.
pub const DEFAULT_POINTS_PER_LEVEL: u32 = 5;

pub const DEFAULT_MAX_LEVEL: u32 = 10;

pub const DEFAULT_WALLS_PER_LEVEL: u32 = 5;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{LevelPolicy, LevelProgress, Progression, palette_for_level};

    #[test]
    fn first_level_has_no_walls_and_one_fruit() {
        let settings = LevelPolicy::default().settings(1);

        assert_eq!(settings.level, 1);
        assert_eq!(settings.wall_count, 0);
        assert_eq!(settings.fruit_count, 1);
        assert_eq!(settings.threshold, 5);
        assert_eq!(settings.tick_interval, Duration::from_millis(200));
    }

    #[test]
    fn difficulty_grows_monotonically() {
        let policy = LevelPolicy::default();

        for level in 1..policy.max_level {
            let current = policy.settings(level);
            let next = policy.settings(level + 1);

            assert!(next.tick_interval <= current.tick_interval);
            assert!(next.wall_count > current.wall_count);
            assert!(next.fruit_count >= current.fruit_count);
            assert!(next.threshold > current.threshold);
            assert!(next.tick_interval > Duration::ZERO);
        }
    }

    #[test]
    fn tick_interval_bottoms_out_at_minimum() {
        let policy = LevelPolicy {
            max_level: 100,
            ..LevelPolicy::default()
        };

        assert_eq!(
            policy.settings(100).tick_interval,
            Duration::from_millis(policy.min_tick_ms)
        );
    }

    #[test]
    fn huge_tick_step_clamps_instead_of_overflowing() {
        let policy = LevelPolicy {
            tick_step_ms: u64::MAX,
            ..LevelPolicy::default()
        };

        assert!(policy.validate().is_ok());
        assert_eq!(
            policy.settings(3).tick_interval,
            Duration::from_millis(policy.min_tick_ms)
        );
    }

    #[test]
    fn levels_outside_range_are_clamped() {
        let policy = LevelPolicy::default();

        assert_eq!(policy.settings(0).level, 1);
        assert_eq!(policy.settings(99).level, policy.max_level);
    }

    #[test]
    fn score_threshold_is_cumulative() {
        let policy = LevelPolicy::default();
        let progress = |score| LevelProgress {
            score,
            fruit_eaten_this_level: 0,
        };

        assert!(!policy.is_complete(2, progress(9)));
        assert!(policy.is_complete(2, progress(10)));
    }

    #[test]
    fn fruit_quota_counts_fruit_in_current_level() {
        let policy = LevelPolicy::fruit_quota(5);
        let settings = policy.settings(2);

        assert_eq!(settings.fruit_count, 10);
        assert_eq!(settings.threshold, 10);
        assert!(!policy.is_complete(
            2,
            LevelProgress {
                score: 100,
                fruit_eaten_this_level: 9,
            }
        ));
        assert!(policy.is_complete(
            2,
            LevelProgress {
                score: 15,
                fruit_eaten_this_level: 10,
            }
        ));
    }

    #[test]
    fn zero_step_progression_is_rejected() {
        let policy = LevelPolicy {
            progression: Progression::ScoreThreshold {
                points_per_level: 0,
            },
            ..LevelPolicy::default()
        };

        assert!(policy.validate().is_err());
    }

    #[test]
    fn palettes_cycle_with_level() {
        assert_eq!(palette_for_level(1), palette_for_level(7));
        assert_ne!(palette_for_level(1), palette_for_level(2));
    }

    #[test]
    fn policy_parses_from_partial_json() {
        let json = r#"{ "progression": { "mode": "fruit_quota", "fruits_per_level": 3 }, "max_level": 4 }"#;
        let policy: LevelPolicy = serde_json::from_str(json).expect("policy should parse");

        assert_eq!(
            policy.progression,
            Progression::FruitQuota {
                fruits_per_level: 3
            }
        );
        assert_eq!(policy.max_level, 4);
        assert_eq!(policy.walls_per_level, 5);
    }
}
