//! Grid geometry: positions, bounds and wrap-around movement.

use super::action::Direction;
use serde::{Deserialize, Serialize};

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction, without wrapping
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Check if a position lies on a square grid of `size` cells per side
pub fn in_bounds(pos: Position, size: i32) -> bool {
    pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
}

/// Advance one cell, mapping any coordinate that leaves the grid to the opposite edge
pub fn wrap_advance(pos: Position, direction: Direction, size: i32) -> Position {
    let next = pos.moved_in_direction(direction);
    Position::new(next.x.rem_euclid(size), next.y.rem_euclid(size))
}

/// The cells covered by a 2x2 footprint anchored at its top-left cell
pub fn footprint(anchor: Position) -> [Position; 4] {
    [
        anchor,
        anchor.moved_by(1, 0),
        anchor.moved_by(0, 1),
        anchor.moved_by(1, 1),
    ]
}
