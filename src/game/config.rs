use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// How a run is won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionMode {
    /// Five levels with growing targets; clearing the last one wraps back to level 1
    Levels,
    /// One endless level that ends in a win once `win_score` is reached
    SingleLevel { win_score: u32 },
}

/// Reasons a configuration is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid size must be at least {min}, got {actual}")]
    GridTooSmall { min: i32, actual: i32 },
    #[error("initial snake length {length} does not fit on a {grid}x{grid} grid")]
    SnakeTooLong { length: usize, grid: i32 },
    #[error("tick rates must satisfy 0 < min ({min}) <= base ({base}) <= max ({max})")]
    TickRates { min: u32, base: u32, max: u32 },
    #[error("{name} must be within [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },
    #[error("{0} must be at least 1")]
    Zero(&'static str),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cells per side of the square grid
    pub grid_size: i32,
    /// Length of the player snake at level start
    pub initial_snake_length: usize,
    /// Standard food items placed at level start
    pub initial_food_count: usize,
    pub progression: ProgressionMode,

    // Speed
    pub base_tick_rate: u32,
    pub max_tick_rate: u32,
    /// Floor applied when slow food is eaten
    pub min_tick_rate: u32,
    /// Points needed for each +1 tick rate step
    pub speed_score_step: u32,
    pub slow_food_penalty: u32,

    // Scoring
    pub food_score: u32,
    pub big_food_score: u32,
    pub slow_food_score: u32,
    /// Award the value carried by decomposition food instead of `food_score`
    pub award_decomposition_value: bool,
    pub big_food_chance: f64,
    pub slow_food_chance: f64,

    // Levels
    pub level_score_step: u32,
    pub max_level: u32,
    pub milestone_step: u32,

    // Obstacles
    pub obstacle_base_count: usize,
    pub obstacles_per_level: usize,
    pub max_obstacles: usize,
    /// Obstacles try to drift once every this many ticks
    pub obstacle_drift_interval: u32,
    pub obstacle_drift_chance: f64,
    /// Per-axis offset from the anchor must stay strictly below this
    pub obstacle_anchor_radius: i32,

    // Rivals
    pub rival_min_level: u32,
    pub max_rivals: usize,
    pub rival_initial_length: usize,
    pub rival_player_clearance: i32,
    pub rival_obstacle_clearance: i32,
    pub rival_placement_attempts: usize,
    /// Rival updates happen every `rival_cadence_base / tick_rate` ticks
    pub rival_cadence_base: u32,
    pub rival_boost_step: f64,

    /// Upper bound on rejection-sampling draws per spawn
    pub spawn_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 40,
            initial_snake_length: 3,
            initial_food_count: 3,
            progression: ProgressionMode::Levels,
            base_tick_rate: 4,
            max_tick_rate: 8,
            min_tick_rate: 3,
            speed_score_step: 20,
            slow_food_penalty: 2,
            food_score: 10,
            big_food_score: 20,
            slow_food_score: 5,
            award_decomposition_value: false,
            big_food_chance: 0.3,
            slow_food_chance: 0.2,
            level_score_step: 100,
            max_level: 5,
            milestone_step: 100,
            obstacle_base_count: 5,
            obstacles_per_level: 3,
            max_obstacles: 20,
            obstacle_drift_interval: 10,
            obstacle_drift_chance: 0.3,
            obstacle_anchor_radius: 2,
            rival_min_level: 3,
            max_rivals: 2,
            rival_initial_length: 3,
            rival_player_clearance: 5,
            rival_obstacle_clearance: 3,
            rival_placement_attempts: 100,
            rival_cadence_base: 60,
            rival_boost_step: 0.05,
            spawn_attempts: 1000,
        }
    }
}

impl GameConfig {
    pub const MIN_GRID_SIZE: i32 = 8;

    /// Create a new configuration with a custom grid size
    pub fn new(grid_size: i32) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Single-level variant that is won at `win_score`
    pub fn single_level(win_score: u32) -> Self {
        Self {
            progression: ProgressionMode::SingleLevel { win_score },
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(20)
    }

    /// Disable every random side effect of the simulation step
    pub fn deterministic(mut self) -> Self {
        self.big_food_chance = 0.0;
        self.slow_food_chance = 0.0;
        self.obstacle_drift_chance = 0.0;
        self
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to deserialize config")?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {:?}", path))?;
        Ok(config)
    }

    /// Check that all parameters are in usable ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < Self::MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                min: Self::MIN_GRID_SIZE,
                actual: self.grid_size,
            });
        }

        if self.initial_snake_length == 0 {
            return Err(ConfigError::Zero("initial_snake_length"));
        }
        if self.initial_snake_length as i32 > self.grid_size / 2 + 1 {
            return Err(ConfigError::SnakeTooLong {
                length: self.initial_snake_length,
                grid: self.grid_size,
            });
        }

        if self.min_tick_rate == 0
            || self.min_tick_rate > self.base_tick_rate
            || self.base_tick_rate > self.max_tick_rate
        {
            return Err(ConfigError::TickRates {
                min: self.min_tick_rate,
                base: self.base_tick_rate,
                max: self.max_tick_rate,
            });
        }

        for (name, value) in [
            ("big_food_chance", self.big_food_chance),
            ("slow_food_chance", self.slow_food_chance),
            ("obstacle_drift_chance", self.obstacle_drift_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }

        let non_zero = [
            ("speed_score_step", self.speed_score_step as usize),
            ("level_score_step", self.level_score_step as usize),
            ("max_level", self.max_level as usize),
            ("milestone_step", self.milestone_step as usize),
            ("obstacle_drift_interval", self.obstacle_drift_interval as usize),
            ("rival_initial_length", self.rival_initial_length),
            ("rival_placement_attempts", self.rival_placement_attempts),
            ("rival_cadence_base", self.rival_cadence_base as usize),
            ("spawn_attempts", self.spawn_attempts),
        ];
        for (name, value) in non_zero {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }

        if let ProgressionMode::SingleLevel { win_score: 0 } = self.progression {
            return Err(ConfigError::Zero("win_score"));
        }

        Ok(())
    }
}
