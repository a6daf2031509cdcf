//! Level targets, obstacle layouts and score-driven speed.

use super::config::{GameConfig, ProgressionMode};
use super::grid::{Position, in_bounds};

/// Obstacle spawn cells, taken in order as levels get harder
pub const OBSTACLE_CANDIDATES: [(i32, i32); 20] = [
    (10, 10),
    (35, 10),
    (10, 35),
    (35, 35),
    (22, 15),
    (22, 30),
    (15, 22),
    (30, 22),
    (8, 20),
    (37, 25),
    (12, 8),
    (32, 12),
    (18, 35),
    (28, 8),
    (6, 30),
    (38, 18),
    (14, 25),
    (26, 32),
    (20, 5),
    (25, 38),
];

/// What the score means for the current level after a consumption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    /// Target not reached yet
    Continue,
    /// Move on to the given level
    Advance(u32),
    /// Final level done; play wraps back to level 1
    Cleared,
    /// Single-level run reached its winning score
    Won,
}

pub fn level_target(config: &GameConfig, level: u32) -> u32 {
    level * config.level_score_step
}

pub fn obstacle_count(config: &GameConfig, level: u32) -> usize {
    let extra = level.saturating_sub(1) as usize * config.obstacles_per_level;
    (config.obstacle_base_count + extra).min(config.max_obstacles)
}

/// Anchors for a level's obstacles; candidates off a smaller grid are dropped
pub fn obstacle_layout(config: &GameConfig, level: u32) -> Vec<Position> {
    OBSTACLE_CANDIDATES
        .iter()
        .take(obstacle_count(config, level))
        .map(|&(x, y)| Position::new(x, y))
        .filter(|&pos| in_bounds(pos, config.grid_size))
        .collect()
}

pub fn tick_rate_for_score(config: &GameConfig, score: u32) -> u32 {
    (config.base_tick_rate + score / config.speed_score_step).min(config.max_tick_rate)
}

pub fn slowed_tick_rate(config: &GameConfig, rate: u32) -> u32 {
    rate.saturating_sub(config.slow_food_penalty)
        .max(config.min_tick_rate)
}

/// The newly crossed milestone, if the score passed one since `last`
pub fn milestone_reached(config: &GameConfig, score: u32, last: u32) -> Option<u32> {
    let milestone = score / config.milestone_step * config.milestone_step;
    (milestone > last && milestone > 0).then_some(milestone)
}

pub fn evaluate_level(config: &GameConfig, level: u32, score: u32) -> LevelOutcome {
    match config.progression {
        ProgressionMode::SingleLevel { win_score } => {
            if score >= win_score {
                LevelOutcome::Won
            } else {
                LevelOutcome::Continue
            }
        }
        ProgressionMode::Levels => {
            if score < level_target(config, level) {
                LevelOutcome::Continue
            } else if level < config.max_level {
                LevelOutcome::Advance(level + 1)
            } else {
                LevelOutcome::Cleared
            }
        }
    }
}

/// Ticks between shared rival updates at the given player tick rate
pub fn rival_cadence(config: &GameConfig, tick_rate: u32) -> u32 {
    (config.rival_cadence_base / tick_rate.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_targets() {
        let config = GameConfig::default();
        assert_eq!(level_target(&config, 1), 100);
        assert_eq!(level_target(&config, 5), 500);
    }

    #[test]
    fn test_obstacle_counts() {
        let config = GameConfig::default();
        assert_eq!(obstacle_count(&config, 1), 5);
        assert_eq!(obstacle_count(&config, 2), 8);
        assert_eq!(obstacle_count(&config, 5), 17);
        assert_eq!(obstacle_count(&config, 9), 20);

        let layout = obstacle_layout(&config, 1);
        assert_eq!(layout.len(), 5);
        assert_eq!(layout[0], Position::new(10, 10));
        assert_eq!(layout[4], Position::new(22, 15));
    }

    #[test]
    fn test_layout_drops_off_grid_candidates() {
        let config = GameConfig::small();
        let layout = obstacle_layout(&config, 1);
        assert_eq!(layout, vec![Position::new(10, 10)]);
    }

    #[test]
    fn test_tick_rate_scaling() {
        let config = GameConfig::default();
        assert_eq!(tick_rate_for_score(&config, 0), 4);
        assert_eq!(tick_rate_for_score(&config, 19), 4);
        assert_eq!(tick_rate_for_score(&config, 40), 6);
        assert_eq!(tick_rate_for_score(&config, 400), 8);

        assert_eq!(slowed_tick_rate(&config, 8), 6);
        assert_eq!(slowed_tick_rate(&config, 4), 3);
        assert_eq!(slowed_tick_rate(&config, 3), 3);
    }

    #[test]
    fn test_milestones() {
        let config = GameConfig::default();
        assert_eq!(milestone_reached(&config, 90, 0), None);
        assert_eq!(milestone_reached(&config, 100, 0), Some(100));
        assert_eq!(milestone_reached(&config, 110, 100), None);
        assert_eq!(milestone_reached(&config, 215, 100), Some(200));
    }

    #[test]
    fn test_level_outcomes() {
        let config = GameConfig::default();
        assert_eq!(evaluate_level(&config, 1, 99), LevelOutcome::Continue);
        assert_eq!(evaluate_level(&config, 1, 100), LevelOutcome::Advance(2));
        assert_eq!(evaluate_level(&config, 4, 420), LevelOutcome::Advance(5));
        assert_eq!(evaluate_level(&config, 5, 500), LevelOutcome::Cleared);

        let single = GameConfig::single_level(500);
        assert_eq!(evaluate_level(&single, 1, 490), LevelOutcome::Continue);
        assert_eq!(evaluate_level(&single, 1, 500), LevelOutcome::Won);
    }

    #[test]
    fn test_rival_cadence() {
        let config = GameConfig::default();
        assert_eq!(rival_cadence(&config, 4), 15);
        assert_eq!(rival_cadence(&config, 7), 8);
        assert_eq!(rival_cadence(&config, 120), 1);
    }
}
