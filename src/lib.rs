//! Arcade Snake - a tick-based Snake with levels, drifting obstacles and rival snakes
//!
//! This library provides:
//! - Core game logic with no I/O (game module)
//! - Tick timer for interactive play (scheduler module)
//! - High score and play count tracking (metrics module)
//! - TUI rendering and key mapping (render and input modules)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod scheduler;
