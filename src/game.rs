//! Game session: two boards, whose turn it is and who won.
//!
//! The session is the only caller of [`Board::apply_shot`] and the only place
//! the computer opponent is asked for a target. The opponent is handed the
//! visible view of the player's board, never the board itself.

use std::time::SystemTime;

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::board::{Board, BoardSnapshot, TargetView};
use crate::common::{Coordinate, PlacementError, ShotError, ShotOutcome, Side};
use crate::config::{Difficulty, FleetSpec, GameConfig};
use crate::heatmap::Heatmap;
use crate::ship::ShipClass;
use crate::strategy::{HabitPrior, Legendary, Opponent, Strategy};

/// Errors returned by session operations. A session is unchanged when one
/// is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Shot(#[from] ShotError),
    #[error("not your turn: waiting on the {expected} side")]
    InvalidTurn { expected: Side },
    #[error("game is already over ({0:?})")]
    GameOver(GameStatus),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("no unknown cells left to fire at")]
    NoTargets,
}

/// Current status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    Active,
    PlayerWon,
    AiWon,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Active)
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            GameStatus::Active => None,
            GameStatus::PlayerWon => Some(Side::Player),
            GameStatus::AiWon => Some(Side::Ai),
        }
    }
}

/// Rendering-ready state of a session as seen by one side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub perspective: Side,
    pub difficulty: Difficulty,
    pub status: GameStatus,
    pub turn: Side,
    /// The viewer's own fleet, fully revealed.
    pub own_board: BoardSnapshot,
    /// The other fleet; revealed only once the game is over.
    pub opponent_board: BoardSnapshot,
    pub player_moves: usize,
    pub ai_moves: usize,
    pub last_ai_shot: Option<Coordinate>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

/// One human-versus-computer game.
pub struct GameSession {
    config: GameConfig,
    player_board: Board,
    ai_board: Board,
    turn: Side,
    status: GameStatus,
    opponent: Opponent,
    rng: SmallRng,
    player_moves: usize,
    ai_moves: usize,
    last_ai_shot: Option<Coordinate>,
    created_at: SystemTime,
    updated_at: SystemTime,
}

impl GameSession {
    /// New session with both fleets placed at random.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut rng = seeded_rng(config.rng_seed);
        let mut player_board = Board::new(config.board_size, config.placement_rule);
        player_board.auto_place_fleet(&config.fleet, &mut rng)?;
        let mut ai_board = Board::new(config.board_size, config.placement_rule);
        ai_board.auto_place_fleet(&config.fleet, &mut rng)?;
        Ok(Self::assemble(config, player_board, ai_board, rng))
    }

    /// New session with the player's own layout; the computer's fleet is
    /// placed at random. The layout must use the configured fleet's lengths.
    pub fn with_player_fleet(
        config: GameConfig,
        layout: &[(ShipClass, Vec<Coordinate>)],
    ) -> Result<Self, GameError> {
        config.validate()?;
        let mut wanted = config.fleet.lengths();
        let mut given: Vec<usize> = layout.iter().map(|(class, _)| class.length()).collect();
        wanted.sort_unstable();
        given.sort_unstable();
        if wanted != given {
            return Err(GameError::InvalidConfig(format!(
                "fleet lengths {:?} do not match the configured {:?}",
                given, wanted
            )));
        }
        let mut player_board = Board::new(config.board_size, config.placement_rule);
        for (class, cells) in layout {
            player_board.place_ship(*class, cells)?;
        }
        let mut rng = seeded_rng(config.rng_seed);
        let mut ai_board = Board::new(config.board_size, config.placement_rule);
        ai_board.auto_place_fleet(&config.fleet, &mut rng)?;
        Ok(Self::assemble(config, player_board, ai_board, rng))
    }

    /// Rebuild a session around boards placed (and possibly fired at)
    /// elsewhere. Turn and status are derived from the shot logs. The boards
    /// keep their own fleets; the configured fleet is not checked against them.
    pub fn from_boards(
        config: GameConfig,
        player_board: Board,
        ai_board: Board,
    ) -> Result<Self, GameError> {
        config.validate_board_size()?;
        config.tuning.validate()?;
        for (side, board) in [(Side::Player, &player_board), (Side::Ai, &ai_board)] {
            if board.size() != config.board_size {
                return Err(GameError::InvalidConfig(format!(
                    "{} board is {}x{}, expected {}x{}",
                    side,
                    board.size(),
                    board.size(),
                    config.board_size,
                    config.board_size
                )));
            }
            if board.ships().is_empty() {
                return Err(GameError::InvalidConfig(format!("{} board has no ships", side)));
            }
        }
        if player_board.all_sunk() && ai_board.all_sunk() {
            return Err(GameError::InvalidConfig(
                "both fleets are already destroyed".into(),
            ));
        }
        let rng = seeded_rng(config.rng_seed);
        Ok(Self::assemble(config, player_board, ai_board, rng))
    }

    fn assemble(config: GameConfig, player_board: Board, ai_board: Board, rng: SmallRng) -> Self {
        let player_moves = ai_board.shots().len();
        let ai_moves = player_board.shots().len();
        let status = if ai_board.all_sunk() {
            GameStatus::PlayerWon
        } else if player_board.all_sunk() {
            GameStatus::AiWon
        } else {
            GameStatus::Active
        };
        let first = config.first_turn;
        let (first_moves, second_moves) = match first {
            Side::Player => (player_moves, ai_moves),
            Side::Ai => (ai_moves, player_moves),
        };
        let turn = if first_moves > second_moves {
            first.opponent()
        } else {
            first
        };
        debug!(
            "new session: {}x{} board, {} ships, difficulty {}, seed {:?}",
            config.board_size,
            config.board_size,
            config.fleet.ships().len(),
            config.difficulty,
            config.rng_seed
        );
        let now = SystemTime::now();
        GameSession {
            opponent: Opponent::new(config.difficulty),
            config,
            player_board,
            ai_board,
            turn,
            status,
            rng,
            player_moves,
            ai_moves,
            last_ai_shot: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Seed the Legendary opponent with habits observed in earlier games.
    /// Has no effect on other tiers.
    pub fn set_habit_prior(&mut self, prior: HabitPrior) {
        if let Opponent::Legendary(_) = self.opponent {
            self.opponent = Opponent::Legendary(Legendary::with_prior(prior));
        }
    }

    fn check_turn(&self, side: Side) -> Result<(), GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver(self.status));
        }
        if self.turn != side {
            return Err(GameError::InvalidTurn {
                expected: self.turn,
            });
        }
        Ok(())
    }

    /// The player fires at the computer's board.
    pub fn submit_player_shot(&mut self, coord: Coordinate) -> Result<ShotOutcome, GameError> {
        self.check_turn(Side::Player)?;
        let outcome = self.ai_board.apply_shot(coord)?;
        self.player_moves += 1;
        debug!("player fires at {}: {:?}", coord, outcome);
        self.finish_turn(Side::Player);
        Ok(outcome)
    }

    /// The computer picks a target on the player's board and fires.
    pub fn advance_ai_turn(&mut self) -> Result<(Coordinate, ShotOutcome), GameError> {
        self.check_turn(Side::Ai)?;
        let view = self.player_board.visible_view();
        let chosen = self.opponent.choose_target(
            &view,
            self.player_board.shots(),
            &self.config.tuning,
            &mut self.rng,
        );
        let coord = match chosen {
            Some(c) if view.is_unknown(c) => c,
            other => {
                let first = view.unknown_cells().next().ok_or(GameError::NoTargets)?;
                warn!(
                    "{} opponent answered {:?}, firing at {} instead",
                    self.config.difficulty, other, first
                );
                first
            }
        };
        let outcome = self.player_board.apply_shot(coord)?;
        self.ai_moves += 1;
        self.last_ai_shot = Some(coord);
        debug!("ai fires at {}: {:?}", coord, outcome);
        self.finish_turn(Side::Ai);
        Ok((coord, outcome))
    }

    fn finish_turn(&mut self, shooter: Side) {
        self.updated_at = SystemTime::now();
        let target = match shooter {
            Side::Player => &self.ai_board,
            Side::Ai => &self.player_board,
        };
        if target.all_sunk() {
            self.status = match shooter {
                Side::Player => GameStatus::PlayerWon,
                Side::Ai => GameStatus::AiWon,
            };
            info!(
                "game over: {} wins after {} player / {} ai moves",
                shooter, self.player_moves, self.ai_moves
            );
        } else {
            self.turn = shooter.opponent();
        }
    }

    /// Snapshot for `perspective`'s client.
    pub fn snapshot(&self, perspective: Side) -> SessionSnapshot {
        let (own, other) = match perspective {
            Side::Player => (&self.player_board, &self.ai_board),
            Side::Ai => (&self.ai_board, &self.player_board),
        };
        SessionSnapshot {
            perspective,
            difficulty: self.config.difficulty,
            status: self.status,
            turn: self.turn,
            own_board: own.snapshot(true),
            opponent_board: other.snapshot(self.status.is_terminal()),
            player_moves: self.player_moves,
            ai_moves: self.ai_moves,
            last_ai_shot: self.last_ai_shot,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// What the player knows about the computer's board.
    pub fn player_view(&self) -> TargetView {
        self.ai_board.visible_view()
    }

    /// The computer's current heatmap over the player's board, `None` for
    /// Rookie. Does not advance the session's random state.
    pub fn ai_heatmap(&self) -> Option<Heatmap> {
        let mut opponent = self.opponent.clone();
        let mut rng = self.rng.clone();
        opponent.heatmap(
            &self.player_board.visible_view(),
            self.player_board.shots(),
            &self.config.tuning,
            &mut rng,
        )
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn winner(&self) -> Option<Side> {
        self.status.winner()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player_board(&self) -> &Board {
        &self.player_board
    }

    pub fn ai_board(&self) -> &Board {
        &self.ai_board
    }

    pub fn player_moves(&self) -> usize {
        self.player_moves
    }

    pub fn ai_moves(&self) -> usize {
        self.ai_moves
    }

    pub fn last_ai_shot(&self) -> Option<Coordinate> {
        self.last_ai_shot
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn updated_at(&self) -> SystemTime {
        self.updated_at
    }
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}

/// Start a session. `fleet` defaults to the standard fleet for the board size.
pub fn create_session(
    difficulty: Difficulty,
    board_size: usize,
    fleet: Option<FleetSpec>,
    rng_seed: Option<u64>,
) -> Result<GameSession, GameError> {
    let mut config = GameConfig::new(difficulty).with_board_size(board_size);
    if let Some(fleet) = fleet {
        config = config.with_fleet(fleet);
    }
    config.rng_seed = rng_seed;
    GameSession::new(config)
}

pub fn submit_player_shot(
    session: &mut GameSession,
    coord: Coordinate,
) -> Result<ShotOutcome, GameError> {
    session.submit_player_shot(coord)
}

pub fn advance_ai_turn(session: &mut GameSession) -> Result<(Coordinate, ShotOutcome), GameError> {
    session.advance_ai_turn()
}

pub fn get_visible_state(session: &GameSession, perspective: Side) -> SessionSnapshot {
    session.snapshot(perspective)
}

pub fn is_terminal(session: &GameSession) -> bool {
    session.is_terminal()
}

pub fn winner(session: &GameSession) -> Option<Side> {
    session.winner()
}
