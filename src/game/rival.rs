//! Rival snakes: placement at level start, greedy food chasing, and
//! decomposition into food when they crash.

use super::action::Direction;
use super::config::GameConfig;
use super::entities::{Entities, Layer, Rival};
use super::grid::{Position, in_bounds};
use super::spawner::Spawner;
use rand::Rng;
use tracing::debug;

/// Why a rival was removed from play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    OutOfBounds,
    Obstacle,
    OwnBody,
    OtherRival,
    Player,
}

/// A rival that left the active set, with what it turned into
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub rival: Rival,
    pub cause: CrashCause,
    /// Cells that received a food item
    pub food_cells: Vec<Position>,
}

/// Place up to `max_rivals` rivals for a level; returns how many were placed
pub fn generate_rivals<R: Rng>(
    entities: &mut Entities,
    config: &GameConfig,
    level: u32,
    rng: &mut R,
) -> usize {
    if level < config.rival_min_level {
        return 0;
    }

    let size = entities.size();
    let mut placed = 0;
    for id in 0..config.max_rivals {
        let candidate = (0..config.rival_placement_attempts).find_map(|_| {
            let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
            let head = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
            let rival = Rival::new(id, head, direction, config.rival_initial_length);
            has_clearance(entities, config, &rival).then_some(rival)
        });

        match candidate {
            Some(rival) => {
                debug!(id, head = ?rival.head(), "rival placed");
                entities.add_rival(rival);
                placed += 1;
            }
            None => debug!(id, level, "no room for rival this level"),
        }
    }
    placed
}

fn has_clearance(entities: &Entities, config: &GameConfig, rival: &Rival) -> bool {
    let size = entities.size();
    rival.body().iter().all(|&cell| {
        in_bounds(cell, size)
            && entities.is_free(cell)
            && entities
                .player()
                .body()
                .iter()
                .all(|&p| cell.manhattan(p) >= config.rival_player_clearance)
            && entities
                .rivals()
                .iter()
                .flat_map(|other| other.body().iter())
                .all(|&p| cell.manhattan(p) >= config.rival_player_clearance)
            && entities
                .obstacles()
                .iter()
                .all(|o| cell.manhattan(o.position) >= config.rival_obstacle_clearance)
    })
}

/// One shared rival update: every rival whose move timer is due tries to move.
///
/// Crashed rivals are removed and returned, in the order they crashed.
pub fn update_rivals<R: Rng>(
    entities: &mut Entities,
    config: &GameConfig,
    spawner: &Spawner,
    rng: &mut R,
) -> Vec<Decomposition> {
    let mut crashed = Vec::new();
    let mut index = 0;

    while index < entities.rivals().len() {
        let interval = entities.rivals()[index].move_interval(config.rival_boost_step);
        let rival = entities.rival_mut(index);
        rival.move_timer += 1;
        if rival.move_timer < interval {
            index += 1;
            continue;
        }
        rival.move_timer = 0;

        match move_rival(entities, index, spawner, rng) {
            None => index += 1,
            Some(cause) => {
                let rival = entities.remove_rival(index);
                let food_cells = decompose(entities, &rival);
                debug!(id = rival.id, ?cause, food = food_cells.len(), "rival decomposed");
                crashed.push(Decomposition {
                    rival,
                    cause,
                    food_cells,
                });
            }
        }
    }

    crashed
}

/// Move one rival and let it eat; returns the crash cause if it must decompose
fn move_rival<R: Rng>(
    entities: &mut Entities,
    index: usize,
    spawner: &Spawner,
    rng: &mut R,
) -> Option<CrashCause> {
    let direction = choose_direction(entities, index);
    entities.rival_mut(index).direction = direction;

    let next = entities.rivals()[index].head().moved_in_direction(direction);
    if !in_bounds(next, entities.size()) {
        entities.rival_mut(index).direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        return Some(CrashCause::OutOfBounds);
    }
    if entities.has(next, Layer::Obstacle) {
        return Some(CrashCause::Obstacle);
    }
    if entities.rivals()[index].contains(next) {
        return Some(CrashCause::OwnBody);
    }
    if entities.other_rival_segments(index, next) > 0 {
        return Some(CrashCause::OtherRival);
    }

    entities.advance_rival(index, next);

    if entities.take_food_at(next).is_some() {
        entities.grow_rival(index, 1);
        entities.rival_mut(index).speed_boosts += 1;
        spawner.place_standard_food(entities, rng);
    }
    if entities.big_food_covers(next) {
        entities.take_big_food();
        entities.grow_rival(index, 2);
        entities.rival_mut(index).speed_boosts += 1;
    }

    entities
        .has(next, Layer::Player)
        .then_some(CrashCause::Player)
}

/// Head toward the nearest food; fall back to the first safe direction
pub fn choose_direction(entities: &Entities, index: usize) -> Direction {
    let rival = &entities.rivals()[index];
    let head = rival.head();
    let preferred = nearest_food(entities, head)
        .and_then(|target| preferred_direction(head, target))
        .unwrap_or(rival.direction);

    if is_safe(entities, index, preferred) {
        return preferred;
    }
    Direction::ALL
        .into_iter()
        .find(|&dir| is_safe(entities, index, dir))
        .unwrap_or(rival.direction)
}

/// Manhattan-nearest standard food cell or big-food anchor
pub fn nearest_food(entities: &Entities, from: Position) -> Option<Position> {
    entities
        .foods()
        .iter()
        .map(|food| food.position)
        .chain(entities.big_food())
        .min_by_key(|&pos| from.manhattan(pos))
}

/// Turn along the axis with the larger gap; equal gaps go vertical
fn preferred_direction(from: Position, to: Position) -> Option<Direction> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() > dy.abs() {
        Some(if dx > 0 { Direction::Right } else { Direction::Left })
    } else if dy != 0 {
        Some(if dy > 0 { Direction::Down } else { Direction::Up })
    } else {
        None
    }
}

fn is_safe(entities: &Entities, index: usize, direction: Direction) -> bool {
    let next = entities.rivals()[index].head().moved_in_direction(direction);
    in_bounds(next, entities.size())
        && !entities.has(next, Layer::Obstacle)
        && !entities.rivals()[index].contains(next)
        && entities.other_rival_segments(index, next) == 0
}

/// Turn a removed rival's body into standard food worth `max(5, len / 2)` each
fn decompose(entities: &mut Entities, rival: &Rival) -> Vec<Position> {
    let value = (rival.len() as u32 / 2).max(5);
    let mut cells = Vec::new();
    for &cell in rival.body() {
        if entities.has(cell, Layer::Obstacle)
            || entities.has(cell, Layer::Player)
            || entities.has(cell, Layer::Food)
        {
            continue;
        }
        entities.add_food(cell, value);
        cells.push(cell);
    }
    cells
}
