//! Level Snake - the classic Snake game on configurable boards
//!
//! This library provides:
//! - Core game logic with levels and obstacles (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - The interactive terminal front end (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
