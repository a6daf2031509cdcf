//! Rejection-sampling placement of food.
//!
//! Every draw is checked against the occupancy grid. Draws are capped so a
//! crowded board skips a spawn instead of looping forever.

use super::config::GameConfig;
use super::entities::Entities;
use super::grid::{Position, footprint};
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawner {
    attempts: usize,
    food_value: u32,
}

impl Spawner {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            attempts: config.spawn_attempts,
            food_value: config.food_score,
        }
    }

    /// Place one standard food on a free cell
    pub fn place_standard_food<R: Rng>(
        &self,
        entities: &mut Entities,
        rng: &mut R,
    ) -> Option<Position> {
        let size = entities.size();
        let pos = self.sample(rng, size, "standard food", |p| entities.is_free(p))?;
        entities.add_food(pos, self.food_value);
        Some(pos)
    }

    /// Place the big food if none exists; its whole 2x2 footprint must be free
    pub fn place_big_food<R: Rng>(&self, entities: &mut Entities, rng: &mut R) -> Option<Position> {
        if entities.big_food().is_some() {
            return None;
        }
        // One short of the edge so the footprint stays on the grid
        let range = entities.size() - 1;
        let anchor = self.sample(rng, range, "big food", |p| {
            footprint(p).iter().all(|&cell| entities.is_free(cell))
        })?;
        entities.set_big_food(anchor);
        Some(anchor)
    }

    /// Place the slow food if none exists
    pub fn place_slow_food<R: Rng>(
        &self,
        entities: &mut Entities,
        rng: &mut R,
    ) -> Option<Position> {
        if entities.slow_food().is_some() {
            return None;
        }
        let size = entities.size();
        let pos = self.sample(rng, size, "slow food", |p| entities.is_free(p))?;
        entities.set_slow_food(pos);
        Some(pos)
    }

    fn sample<R: Rng>(
        &self,
        rng: &mut R,
        range: i32,
        what: &str,
        accept: impl Fn(Position) -> bool,
    ) -> Option<Position> {
        if range <= 0 {
            return None;
        }
        for _ in 0..self.attempts {
            let candidate = Position::new(rng.gen_range(0..range), rng.gen_range(0..range));
            if accept(candidate) {
                return Some(candidate);
            }
        }
        debug!(attempts = self.attempts, what, "spawn skipped, no free cell found");
        None
    }
}
