//! Targeting strategies for the computer opponent.
//!
//! Every tier implements [`Strategy`]; the closed [`Opponent`] enum is what a
//! session holds and the one place where a tier is picked:
//! - [`Rookie`]: random hunt with a stack of follow-up cells after a hit
//! - [`Veteran`]: exact placement-count heatmap
//! - [`Admiral`]: Monte Carlo estimate of the heatmap from sampled fleets
//! - [`Legendary`]: Admiral biased by a model of the player's habits
//!
//! Strategies only ever see a [`TargetView`] and the shot log of the board
//! they attack; any belief state they keep is folded from that log.

use rand::rngs::SmallRng;

use crate::board::TargetView;
use crate::common::{Coordinate, ShotRecord};
use crate::config::{Difficulty, DifficultyConfig};
use crate::heatmap::Heatmap;

pub mod admiral;
pub mod legendary;
pub mod rookie;
pub mod veteran;

pub use admiral::{Admiral, SampleReport};
pub use legendary::{HabitModel, HabitPrior, Legendary, Region};
pub use rookie::Rookie;
pub use veteran::Veteran;

/// Interface implemented by every difficulty tier.
pub trait Strategy {
    /// Pick the next cell to fire at. The answer is always Unknown in `view`;
    /// `None` only when no Unknown cell remains.
    fn choose_target(
        &mut self,
        view: &TargetView,
        history: &[ShotRecord],
        config: &DifficultyConfig,
        rng: &mut SmallRng,
    ) -> Option<Coordinate>;
}

/// The computer opponent: one of the four tiers.
#[derive(Debug, Clone)]
pub enum Opponent {
    Rookie(Rookie),
    Veteran(Veteran),
    Admiral(Admiral),
    Legendary(Legendary),
}

impl Opponent {
    pub fn new(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Rookie => Opponent::Rookie(Rookie::new()),
            Difficulty::Veteran => Opponent::Veteran(Veteran),
            Difficulty::Admiral => Opponent::Admiral(Admiral),
            Difficulty::Legendary => Opponent::Legendary(Legendary::new()),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        match self {
            Opponent::Rookie(_) => Difficulty::Rookie,
            Opponent::Veteran(_) => Difficulty::Veteran,
            Opponent::Admiral(_) => Difficulty::Admiral,
            Opponent::Legendary(_) => Difficulty::Legendary,
        }
    }

    /// Current score map of a heatmap tier; `None` for Rookie.
    pub fn heatmap(
        &mut self,
        view: &TargetView,
        history: &[ShotRecord],
        config: &DifficultyConfig,
        rng: &mut SmallRng,
    ) -> Option<Heatmap> {
        match self {
            Opponent::Rookie(_) => None,
            Opponent::Veteran(_) => Some(veteran::score_map(view, config)),
            Opponent::Admiral(_) => Some(admiral::sample_heatmap(view, config, rng).0),
            Opponent::Legendary(l) => Some(l.heatmap(view, history, config, rng)),
        }
    }
}

impl Strategy for Opponent {
    fn choose_target(
        &mut self,
        view: &TargetView,
        history: &[ShotRecord],
        config: &DifficultyConfig,
        rng: &mut SmallRng,
    ) -> Option<Coordinate> {
        match self {
            Opponent::Rookie(s) => s.choose_target(view, history, config, rng),
            Opponent::Veteran(s) => s.choose_target(view, history, config, rng),
            Opponent::Admiral(s) => s.choose_target(view, history, config, rng),
            Opponent::Legendary(s) => s.choose_target(view, history, config, rng),
        }
    }
}
