//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The interactive mode drives it tick by tick; tests drive it with seeded engines.

pub mod action;
pub mod config;
pub mod engine;
pub mod entities;
pub mod grid;
pub mod progression;
pub mod rival;
pub mod spawner;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{ConfigError, GameConfig, ProgressionMode};
pub use engine::{GameEngine, GameEvent, StepInfo, StepResult};
pub use entities::{Entities, FoodKind, PlayerSnake, Rival, RivalPalette};
pub use grid::Position;
pub use state::{CollisionType, GameState, Outcome, Snapshot, Status};
