//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies,
//! apart from the one-time board file load in `config`.

pub mod config;
pub mod direction;
pub mod engine;
pub mod food;
pub mod rules;
pub mod state;

// Re-export commonly used types
pub use config::{BoardConfig, LevelConfig};
pub use direction::Direction;
pub use engine::{GameEngine, Snapshot, StepInfo, StepResult};
pub use rules::TickOutcome;
pub use state::{Bounds, EndReason, GameState, GameStatus, Position, Snake};
