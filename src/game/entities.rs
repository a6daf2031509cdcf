//! Entity registry: snakes, obstacles and food, plus an occupancy grid that
//! answers "what is on this cell" without scanning every collection.
//!
//! All mutation goes through [`Entities`] so the collections and the
//! occupancy counters always agree.

use super::action::Direction;
use super::grid::{Position, footprint, in_bounds};
use std::collections::VecDeque;

/// What can occupy a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Player,
    Rival,
    Obstacle,
    Food,
    BigFood,
    SlowFood,
}

impl Layer {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        match self {
            Layer::Player => 0,
            Layer::Rival => 1,
            Layer::Obstacle => 2,
            Layer::Food => 3,
            Layer::BigFood => 4,
            Layer::SlowFood => 5,
        }
    }
}

/// Per-cell, per-layer occupancy counters
///
/// Counters rather than flags because rival bodies may stack duplicate tail
/// segments after eating.
#[derive(Debug, Clone, PartialEq)]
pub struct Occupancy {
    size: i32,
    cells: Vec<[u16; Layer::COUNT]>,
}

impl Occupancy {
    pub fn new(size: i32) -> Self {
        let side = size.max(0) as usize;
        Self {
            size,
            cells: vec![[0; Layer::COUNT]; side * side],
        }
    }

    fn slot(&self, pos: Position) -> Option<usize> {
        in_bounds(pos, self.size).then(|| (pos.y * self.size + pos.x) as usize)
    }

    pub fn add(&mut self, pos: Position, layer: Layer) {
        if let Some(slot) = self.slot(pos) {
            self.cells[slot][layer.index()] += 1;
        }
    }

    pub fn remove(&mut self, pos: Position, layer: Layer) {
        if let Some(slot) = self.slot(pos) {
            let count = &mut self.cells[slot][layer.index()];
            *count = count.saturating_sub(1);
        }
    }

    pub fn count(&self, pos: Position, layer: Layer) -> u16 {
        self.slot(pos)
            .map_or(0, |slot| self.cells[slot][layer.index()])
    }

    pub fn has(&self, pos: Position, layer: Layer) -> bool {
        self.count(pos, layer) > 0
    }

    /// In bounds and empty on every layer
    pub fn is_free(&self, pos: Position) -> bool {
        self.slot(pos)
            .is_some_and(|slot| self.cells[slot].iter().all(|&c| c == 0))
    }

    pub fn size(&self) -> i32 {
        self.size
    }
}

/// Kinds of food on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoodKind {
    Standard,
    /// 2x2 footprint, worth more
    Big,
    /// Lowers the tick rate when eaten
    Slow,
}

/// A standard food item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
    /// Points carried by the item; decomposition food carries a length-based value
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    pub position: Position,
    /// Spawn cell; drift stays near it
    pub anchor: Position,
}

/// The player's snake
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnake {
    /// Body segments, with head at index 0
    body: VecDeque<Position>,
    /// Current direction of movement
    pub direction: Direction,
    /// Direction to commit on the next tick
    pub next_direction: Direction,
}

impl PlayerSnake {
    /// Create a new snake with its body extending straight behind the head
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        Self {
            body: straight_body(head, direction, length),
            direction,
            next_direction: direction,
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Head/body colour pairing of a rival, fixed by its identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RivalPalette {
    pub head: [u8; 3],
    pub body: [u8; 3],
}

impl RivalPalette {
    const PALETTES: [RivalPalette; 4] = [
        RivalPalette {
            head: [0xBA, 0x68, 0xC8],
            body: [0x8E, 0x24, 0xAA],
        },
        RivalPalette {
            head: [0xFF, 0xB7, 0x4D],
            body: [0xF5, 0x7C, 0x00],
        },
        RivalPalette {
            head: [0x4D, 0xD0, 0xE1],
            body: [0x00, 0x97, 0xA7],
        },
        RivalPalette {
            head: [0xF0, 0x62, 0x92],
            body: [0xC2, 0x18, 0x5B],
        },
    ];

    pub fn for_id(id: usize) -> Self {
        Self::PALETTES[id % Self::PALETTES.len()]
    }
}

/// A computer-controlled snake
#[derive(Debug, Clone, PartialEq)]
pub struct Rival {
    pub id: usize,
    body: VecDeque<Position>,
    pub direction: Direction,
    /// Rival updates since this rival last moved
    pub move_timer: u32,
    /// Food eaten so far; raises the speed multiplier
    pub speed_boosts: u32,
    pub palette: RivalPalette,
}

impl Rival {
    pub fn new(id: usize, head: Position, direction: Direction, length: usize) -> Self {
        Self {
            id,
            body: straight_body(head, direction, length),
            direction,
            move_timer: 0,
            speed_boosts: 0,
            palette: RivalPalette::for_id(id),
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Never exceeds 1.0, so a rival can only match the shared rival cadence
    pub fn speed_multiplier(&self, boost_step: f64) -> f64 {
        (1.0 + self.speed_boosts as f64 * boost_step).min(1.0)
    }

    /// Rival updates to wait between moves
    pub fn move_interval(&self, boost_step: f64) -> u32 {
        ((1.0 / self.speed_multiplier(boost_step)).floor() as u32).max(1)
    }
}

fn straight_body(head: Position, direction: Direction, length: usize) -> VecDeque<Position> {
    let (dx, dy) = direction.delta();
    (0..length.max(1) as i32)
        .map(|i| head.moved_by(-dx * i, -dy * i))
        .collect()
}

/// Every entity in a level, with occupancy kept in sync
#[derive(Debug, Clone, PartialEq)]
pub struct Entities {
    occupancy: Occupancy,
    player: PlayerSnake,
    rivals: Vec<Rival>,
    obstacles: Vec<Obstacle>,
    foods: Vec<Food>,
    big_food: Option<Position>,
    slow_food: Option<Position>,
}

impl Entities {
    pub fn new(size: i32, player: PlayerSnake) -> Self {
        let mut entities = Self {
            occupancy: Occupancy::new(size),
            player: PlayerSnake {
                body: VecDeque::new(),
                ..player.clone()
            },
            rivals: Vec::new(),
            obstacles: Vec::new(),
            foods: Vec::new(),
            big_food: None,
            slow_food: None,
        };
        entities.reset_player(player);
        entities
    }

    pub fn size(&self) -> i32 {
        self.occupancy.size()
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn is_free(&self, pos: Position) -> bool {
        self.occupancy.is_free(pos)
    }

    pub fn has(&self, pos: Position, layer: Layer) -> bool {
        self.occupancy.has(pos, layer)
    }

    // Player

    pub fn player(&self) -> &PlayerSnake {
        &self.player
    }

    pub fn reset_player(&mut self, player: PlayerSnake) {
        for &pos in &self.player.body {
            self.occupancy.remove(pos, Layer::Player);
        }
        for &pos in &player.body {
            self.occupancy.add(pos, Layer::Player);
        }
        self.player = player;
    }

    /// Mutable access to the heading fields; the body stays private
    pub fn player_mut(&mut self) -> &mut PlayerSnake {
        &mut self.player
    }

    pub fn push_player_head(&mut self, pos: Position) {
        self.occupancy.add(pos, Layer::Player);
        self.player.body.push_front(pos);
    }

    pub fn pop_player_tail(&mut self) {
        if self.player.body.len() > 1 {
            if let Some(tail) = self.player.body.pop_back() {
                self.occupancy.remove(tail, Layer::Player);
            }
        }
    }

    // Rivals

    pub fn rivals(&self) -> &[Rival] {
        &self.rivals
    }

    pub fn add_rival(&mut self, rival: Rival) {
        for &pos in &rival.body {
            self.occupancy.add(pos, Layer::Rival);
        }
        self.rivals.push(rival);
    }

    /// Remove a rival from the active set, returning it
    pub fn remove_rival(&mut self, index: usize) -> Rival {
        let rival = self.rivals.remove(index);
        for &pos in &rival.body {
            self.occupancy.remove(pos, Layer::Rival);
        }
        rival
    }

    pub fn clear_rivals(&mut self) {
        while !self.rivals.is_empty() {
            self.remove_rival(self.rivals.len() - 1);
        }
    }

    pub fn rival_mut(&mut self, index: usize) -> &mut Rival {
        &mut self.rivals[index]
    }

    /// Translate a rival one cell: new head in, tail out
    pub fn advance_rival(&mut self, index: usize, head: Position) {
        self.occupancy.add(head, Layer::Rival);
        let rival = &mut self.rivals[index];
        rival.body.push_front(head);
        if let Some(tail) = rival.body.pop_back() {
            self.occupancy.remove(tail, Layer::Rival);
        }
    }

    /// Append `segments` copies of the current tail
    pub fn grow_rival(&mut self, index: usize, segments: usize) {
        let rival = &mut self.rivals[index];
        let Some(&tail) = rival.body.back() else {
            return;
        };
        for _ in 0..segments {
            rival.body.push_back(tail);
            self.occupancy.add(tail, Layer::Rival);
        }
    }

    /// Rival segments on a cell that do not belong to rival `index`
    pub fn other_rival_segments(&self, index: usize, pos: Position) -> usize {
        let own = self.rivals[index].body.iter().filter(|&&p| p == pos).count();
        (self.occupancy.count(pos, Layer::Rival) as usize).saturating_sub(own)
    }

    // Obstacles

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn add_obstacle(&mut self, anchor: Position) {
        self.occupancy.add(anchor, Layer::Obstacle);
        self.obstacles.push(Obstacle {
            position: anchor,
            anchor,
        });
    }

    pub fn move_obstacle(&mut self, index: usize, to: Position) {
        let obstacle = &mut self.obstacles[index];
        self.occupancy.remove(obstacle.position, Layer::Obstacle);
        self.occupancy.add(to, Layer::Obstacle);
        obstacle.position = to;
    }

    pub fn clear_obstacles(&mut self) {
        for obstacle in self.obstacles.drain(..) {
            self.occupancy.remove(obstacle.position, Layer::Obstacle);
        }
    }

    // Food

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn add_food(&mut self, position: Position, value: u32) {
        self.occupancy.add(position, Layer::Food);
        self.foods.push(Food { position, value });
    }

    pub fn take_food_at(&mut self, pos: Position) -> Option<Food> {
        let index = self.foods.iter().position(|f| f.position == pos)?;
        let food = self.foods.remove(index);
        self.occupancy.remove(pos, Layer::Food);
        Some(food)
    }

    pub fn big_food(&self) -> Option<Position> {
        self.big_food
    }

    pub fn big_food_covers(&self, pos: Position) -> bool {
        self.occupancy.has(pos, Layer::BigFood)
    }

    pub fn set_big_food(&mut self, anchor: Position) {
        self.take_big_food();
        for cell in footprint(anchor) {
            self.occupancy.add(cell, Layer::BigFood);
        }
        self.big_food = Some(anchor);
    }

    pub fn take_big_food(&mut self) -> Option<Position> {
        let anchor = self.big_food.take()?;
        for cell in footprint(anchor) {
            self.occupancy.remove(cell, Layer::BigFood);
        }
        Some(anchor)
    }

    pub fn slow_food(&self) -> Option<Position> {
        self.slow_food
    }

    pub fn set_slow_food(&mut self, pos: Position) {
        self.take_slow_food();
        self.occupancy.add(pos, Layer::SlowFood);
        self.slow_food = Some(pos);
    }

    pub fn take_slow_food(&mut self) -> Option<Position> {
        let pos = self.slow_food.take()?;
        self.occupancy.remove(pos, Layer::SlowFood);
        Some(pos)
    }

    pub fn clear_foods(&mut self) {
        for food in self.foods.drain(..) {
            self.occupancy.remove(food.position, Layer::Food);
        }
        self.take_big_food();
        self.take_slow_food();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> Entities {
        let player = PlayerSnake::new(Position::new(10, 10), Direction::Right, 3);
        Entities::new(20, player)
    }

    #[test]
    fn test_snake_creation() {
        let snake = PlayerSnake::new(Position::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body()[1], Position::new(4, 5));
        assert_eq!(snake.body()[2], Position::new(3, 5));
        assert_eq!(snake.next_direction, Direction::Right);
    }

    #[test]
    fn test_player_occupancy_follows_moves() {
        let mut entities = entities();
        assert!(entities.has(Position::new(8, 10), Layer::Player));

        entities.push_player_head(Position::new(11, 10));
        entities.pop_player_tail();

        assert!(entities.has(Position::new(11, 10), Layer::Player));
        assert!(!entities.has(Position::new(8, 10), Layer::Player));
        assert_eq!(entities.player().len(), 3);
    }

    #[test]
    fn test_big_food_footprint_is_occupied() {
        let mut entities = entities();
        entities.set_big_food(Position::new(2, 2));

        assert!(entities.big_food_covers(Position::new(3, 3)));
        assert!(!entities.is_free(Position::new(2, 3)));
        assert!(entities.is_free(Position::new(4, 4)));

        assert_eq!(entities.take_big_food(), Some(Position::new(2, 2)));
        assert!(entities.is_free(Position::new(3, 3)));
        assert_eq!(entities.take_big_food(), None);
    }

    #[test]
    fn test_food_add_and_take() {
        let mut entities = entities();
        entities.add_food(Position::new(1, 1), 10);
        entities.add_food(Position::new(2, 1), 7);

        assert!(entities.has(Position::new(2, 1), Layer::Food));
        let food = entities.take_food_at(Position::new(2, 1)).unwrap();
        assert_eq!(food.value, 7);
        assert!(!entities.has(Position::new(2, 1), Layer::Food));
        assert!(entities.take_food_at(Position::new(5, 5)).is_none());

        entities.set_slow_food(Position::new(3, 3));
        entities.clear_foods();
        assert!(entities.foods().is_empty());
        assert!(entities.is_free(Position::new(1, 1)));
        assert!(entities.is_free(Position::new(3, 3)));
    }

    #[test]
    fn test_obstacle_move_updates_occupancy() {
        let mut entities = entities();
        entities.add_obstacle(Position::new(4, 4));
        entities.move_obstacle(0, Position::new(5, 4));

        assert_eq!(entities.obstacles()[0].anchor, Position::new(4, 4));
        assert!(entities.has(Position::new(5, 4), Layer::Obstacle));
        assert!(!entities.has(Position::new(4, 4), Layer::Obstacle));
    }

    #[test]
    fn test_rival_growth_stacks_tail_segments() {
        let mut entities = entities();
        entities.add_rival(Rival::new(0, Position::new(5, 15), Direction::Right, 3));
        entities.grow_rival(0, 2);

        let tail = Position::new(3, 15);
        assert_eq!(entities.rivals()[0].len(), 5);
        assert_eq!(entities.occupancy().count(tail, Layer::Rival), 3);

        entities.advance_rival(0, Position::new(6, 15));
        assert_eq!(entities.occupancy().count(tail, Layer::Rival), 2);

        let removed = entities.remove_rival(0);
        assert_eq!(removed.len(), 5);
        assert!(entities.is_free(tail));
        assert!(entities.is_free(Position::new(6, 15)));
    }

    #[test]
    fn test_other_rival_segments() {
        let mut entities = entities();
        entities.add_rival(Rival::new(0, Position::new(5, 15), Direction::Right, 3));
        entities.add_rival(Rival::new(1, Position::new(5, 16), Direction::Up, 2));

        // rival 1 covers (5,16) and (5,17)
        assert_eq!(entities.other_rival_segments(0, Position::new(5, 16)), 1);
        assert_eq!(entities.other_rival_segments(1, Position::new(5, 16)), 0);
        assert_eq!(entities.other_rival_segments(1, Position::new(4, 15)), 1);
    }

    #[test]
    fn test_rival_speed_never_exceeds_base() {
        let mut rival = Rival::new(0, Position::new(5, 5), Direction::Left, 3);
        assert_eq!(rival.speed_multiplier(0.05), 1.0);
        rival.speed_boosts = 10;
        assert_eq!(rival.speed_multiplier(0.05), 1.0);
        assert_eq!(rival.move_interval(0.05), 1);
        assert_eq!(RivalPalette::for_id(4), RivalPalette::for_id(0));
        assert_ne!(RivalPalette::for_id(1), RivalPalette::for_id(0));
    }
}
