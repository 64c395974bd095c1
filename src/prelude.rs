//! Commonly used types for ease of import.

pub use crate::{
    advance_ai_turn, create_session, get_visible_state, is_terminal, submit_player_shot, winner,
    Coordinate, Difficulty, GameConfig, GameError, GameSession, GameStatus, ShotOutcome, Side,
};
