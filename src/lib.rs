//! Battleship against a computer opponent of selectable skill.
//!
//! The crate holds the game state machine and the targeting engine. Callers
//! create a [`GameSession`], submit the player's shots, ask the computer to
//! take its turn and read snapshots back for rendering.

mod board;
mod common;
mod config;
mod game;
mod grid;
mod heatmap;
mod logging;
pub mod prelude;
mod ship;
pub mod strategy;

pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use grid::{BitGrid, GridError, SetCells};
pub use heatmap::Heatmap;
pub use logging::{init_logging, LOG_ENV};
pub use ship::*;
pub use strategy::{Opponent, Strategy};
