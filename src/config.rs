//! Board, fleet and difficulty configuration.

use core::fmt;
use core::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::common::Side;
use crate::game::GameError;
use crate::ship::ShipClass;

pub const DEFAULT_BOARD_SIZE: usize = 10;
pub const MIN_BOARD_SIZE: usize = 5;
pub const MAX_BOARD_SIZE: usize = 16;
pub const MIN_SHIP_LENGTH: usize = 2;
pub const MAX_SHIP_LENGTH: usize = 5;

/// Random placement attempts per ship before giving up.
pub const PLACEMENT_ATTEMPTS: usize = 100;
/// Whole-fleet restarts before auto placement reports failure.
pub const FLEET_RESTARTS: usize = 50;

pub const CARRIER: ShipClass = ShipClass::new("Carrier", 5);
pub const BATTLESHIP: ShipClass = ShipClass::new("Battleship", 4);
pub const CRUISER: ShipClass = ShipClass::new("Cruiser", 3);
pub const SUBMARINE: ShipClass = ShipClass::new("Submarine", 3);
pub const DESTROYER: ShipClass = ShipClass::new("Destroyer", 2);

pub const STANDARD_FLEET: [ShipClass; 5] = [CARRIER, BATTLESHIP, CRUISER, SUBMARINE, DESTROYER];

/// Whether ships may touch each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlacementRule {
    /// No two ships may share an edge or a corner.
    #[default]
    NoTouching,
    /// Ships may be adjacent but never overlap.
    AllowTouching,
}

/// Composition of one side's fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FleetSpec {
    ships: Vec<ShipClass>,
}

impl FleetSpec {
    pub fn new(ships: Vec<ShipClass>) -> Self {
        Self { ships }
    }

    /// The classic five-ship fleet.
    pub fn standard() -> Self {
        Self::new(STANDARD_FLEET.to_vec())
    }

    /// Fleet sized for the board, smaller boards carrying fewer and shorter
    /// ships.
    pub fn standard_for(board_size: usize) -> Self {
        let lengths: &[usize] = match board_size {
            0..=5 => &[3, 2],
            6 => &[3, 2, 2],
            7 => &[3, 3, 2, 2],
            8 => &[4, 3, 3, 2, 2],
            9 => &[4, 4, 3, 3, 2],
            _ => return Self::standard(),
        };
        Self::from_lengths(lengths)
    }

    /// Fleet from bare lengths, naming each ship after the standard class of
    /// that length.
    pub fn from_lengths(lengths: &[usize]) -> Self {
        let mut cruisers = 0;
        let ships = lengths
            .iter()
            .map(|&len| match len {
                5 => CARRIER,
                4 => BATTLESHIP,
                3 => {
                    cruisers += 1;
                    if cruisers % 2 == 1 {
                        CRUISER
                    } else {
                        SUBMARINE
                    }
                }
                2 => DESTROYER,
                other => ShipClass::new("Vessel", other),
            })
            .collect();
        Self::new(ships)
    }

    pub fn ships(&self) -> &[ShipClass] {
        &self.ships
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.ships.iter().map(|s| s.length()).collect()
    }

    /// Total number of ship cells.
    pub fn total_cells(&self) -> usize {
        self.ships.iter().map(|s| s.length()).sum()
    }
}

impl Default for FleetSpec {
    fn default() -> Self {
        Self::standard()
    }
}

/// Skill tier of the computer opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Difficulty {
    #[default]
    Rookie,
    Veteran,
    Admiral,
    Legendary,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Rookie,
        Difficulty::Veteran,
        Difficulty::Admiral,
        Difficulty::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Rookie => "rookie",
            Difficulty::Veteran => "veteran",
            Difficulty::Admiral => "admiral",
            Difficulty::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::InvalidConfig(format!("unknown difficulty '{s}'")))
    }
}

/// Tuning knobs for the targeting strategies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyConfig {
    /// Rookie hunts on a checkerboard subset of cells.
    pub parity_hunt: bool,
    /// Probability that Rookie follows up a hit instead of firing at random.
    pub rookie_follow_up: f64,
    /// Weight base for placements through unresolved hits (`bias^hits`).
    pub hit_bias: f64,
    /// Multiplier for Unknown cells orthogonally adjacent to an unresolved hit.
    pub hit_adjacency_bonus: f64,
    /// Accepted fleet samples Admiral aims for each turn.
    pub admiral_samples: usize,
    /// Sampling attempts allowed each turn, accepted or not.
    pub admiral_max_attempts: usize,
    /// Below this many accepted samples Admiral uses the Veteran heatmap.
    pub admiral_min_samples: usize,
    /// Optional wall-clock ceiling for one Admiral turn.
    pub time_limit: Option<Duration>,
    /// Per-observation decay of Legendary's habit counts, in `(0, 1]`.
    pub habit_decay: f64,
    /// Exponent applied to Legendary's region hit-rate ratio.
    pub habit_strength: f64,
}

impl DifficultyConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let base = DifficultyConfig {
            parity_hunt: true,
            rookie_follow_up: 1.0,
            hit_bias: 10.0,
            hit_adjacency_bonus: 2.0,
            admiral_samples: 600,
            admiral_max_attempts: 30_000,
            admiral_min_samples: 50,
            time_limit: None,
            habit_decay: 0.95,
            habit_strength: 1.0,
        };
        match difficulty {
            Difficulty::Rookie | Difficulty::Veteran => base,
            Difficulty::Admiral => DifficultyConfig {
                admiral_samples: 1_000,
                admiral_max_attempts: 50_000,
                ..base
            },
            Difficulty::Legendary => DifficultyConfig {
                admiral_samples: 1_500,
                admiral_max_attempts: 75_000,
                ..base
            },
        }
    }

    /// Reject tunings that would make a strategy misbehave.
    pub fn validate(&self) -> Result<(), GameError> {
        if !(0.0..=1.0).contains(&self.rookie_follow_up) {
            return Err(GameError::InvalidConfig(
                "rookie_follow_up must be within 0..=1".into(),
            ));
        }
        if !(self.habit_decay > 0.0 && self.habit_decay <= 1.0) {
            return Err(GameError::InvalidConfig(
                "habit_decay must be within (0, 1]".into(),
            ));
        }
        if !(self.hit_bias >= 1.0 && self.hit_adjacency_bonus >= 1.0) {
            return Err(GameError::InvalidConfig(
                "hit weights must be at least 1".into(),
            ));
        }
        if !self.habit_strength.is_finite() {
            return Err(GameError::InvalidConfig(
                "habit_strength must be finite".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

/// Everything needed to create a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameConfig {
    pub board_size: usize,
    pub fleet: FleetSpec,
    pub difficulty: Difficulty,
    pub placement_rule: PlacementRule,
    pub rng_seed: Option<u64>,
    pub first_turn: Side,
    pub tuning: DifficultyConfig,
}

impl GameConfig {
    /// Standard configuration for `difficulty` on a default-sized board.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            fleet: FleetSpec::standard_for(DEFAULT_BOARD_SIZE),
            difficulty,
            placement_rule: PlacementRule::default(),
            rng_seed: None,
            first_turn: Side::Player,
            tuning: DifficultyConfig::for_difficulty(difficulty),
        }
    }

    /// Change the board size, picking the standard fleet for it.
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self.fleet = FleetSpec::standard_for(size);
        self
    }

    pub fn with_fleet(mut self, fleet: FleetSpec) -> Self {
        self.fleet = fleet;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_placement_rule(mut self, rule: PlacementRule) -> Self {
        self.placement_rule = rule;
        self
    }

    pub fn with_first_turn(mut self, side: Side) -> Self {
        self.first_turn = side;
        self
    }

    pub fn with_tuning(mut self, tuning: DifficultyConfig) -> Self {
        self.tuning = tuning;
        self
    }

    /// Reject board sizes, fleets and tunings the engine cannot play.
    pub fn validate(&self) -> Result<(), GameError> {
        self.validate_board_size()?;
        if self.fleet.ships().is_empty() {
            return Err(GameError::InvalidConfig("fleet is empty".into()));
        }
        for ship in self.fleet.ships() {
            let len = ship.length();
            if !(MIN_SHIP_LENGTH..=MAX_SHIP_LENGTH).contains(&len) || len > self.board_size {
                return Err(GameError::InvalidConfig(format!(
                    "{} has unsupported length {}",
                    ship.name(),
                    len
                )));
            }
        }
        if self.fleet.total_cells() > self.board_size * self.board_size / 2 {
            return Err(GameError::InvalidConfig(format!(
                "fleet of {} cells is too large for a {}x{} board",
                self.fleet.total_cells(),
                self.board_size,
                self.board_size
            )));
        }
        self.tuning.validate()
    }

    /// Board-size check alone, for boards whose fleets were placed elsewhere.
    pub fn validate_board_size(&self) -> Result<(), GameError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(GameError::InvalidConfig(format!(
                "board size {} outside {}..={}",
                self.board_size, MIN_BOARD_SIZE, MAX_BOARD_SIZE
            )));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}
