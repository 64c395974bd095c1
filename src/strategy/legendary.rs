//! Adaptive opponent: the Admiral heatmap reweighted by a model of where this
//! player tends to put ships.
//!
//! The model splits the board into corner, edge and interior cells and keeps
//! exponentially decayed hit and shot counts per region, folded from the shot
//! log of the current game. A region that yields hits more often than the
//! board as a whole gets its cells scaled up, and the other way round. Until
//! something has been observed every weight is exactly 1.

use rand::rngs::SmallRng;

use crate::board::TargetView;
use crate::common::{Coordinate, ShotRecord};
use crate::config::DifficultyConfig;
use crate::heatmap::Heatmap;

use super::{admiral, Strategy};

const MIN_WEIGHT: f64 = 0.5;
const MAX_WEIGHT: f64 = 2.0;

/// Board region used as the habit feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Corner,
    Edge,
    Interior,
}

impl Region {
    pub fn of(coord: Coordinate, size: usize) -> Region {
        let last = size.saturating_sub(1);
        let row_edge = coord.row == 0 || coord.row == last;
        let col_edge = coord.col == 0 || coord.col == last;
        match (row_edge, col_edge) {
            (true, true) => Region::Corner,
            (true, false) | (false, true) => Region::Edge,
            (false, false) => Region::Interior,
        }
    }

    fn index(self) -> usize {
        match self {
            Region::Corner => 0,
            Region::Edge => 1,
            Region::Interior => 2,
        }
    }
}

/// Per-region counts carried over from earlier games against the same
/// player. Supplied by whoever keeps that history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HabitPrior {
    pub hits: [f64; 3],
    pub shots: [f64; 3],
}

impl HabitPrior {
    /// Record `hits` out of `shots` for `region`.
    pub fn with(mut self, region: Region, hits: f64, shots: f64) -> Self {
        self.hits[region.index()] += hits;
        self.shots[region.index()] += shots;
        self
    }
}

/// Decayed hit/shot counts per region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HabitModel {
    hits: [f64; 3],
    shots: [f64; 3],
    observations: usize,
}

impl HabitModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from counts gathered outside this game. An all-zero prior leaves
    /// the model empty.
    pub fn with_prior(prior: HabitPrior) -> Self {
        let has_data = prior.shots.iter().any(|&s| s > 0.0);
        HabitModel {
            hits: prior.hits,
            shots: prior.shots,
            observations: usize::from(has_data),
        }
    }

    /// Returns `true` until the first observation.
    pub fn is_empty(&self) -> bool {
        self.observations == 0
    }

    /// Fold in one shot outcome.
    pub fn observe(&mut self, coord: Coordinate, hit: bool, size: usize, decay: f64) {
        for i in 0..3 {
            self.hits[i] *= decay;
            self.shots[i] *= decay;
        }
        let r = Region::of(coord, size).index();
        self.shots[r] += 1.0;
        if hit {
            self.hits[r] += 1.0;
        }
        self.observations += 1;
    }

    /// Multiplier for cells of `region`.
    pub fn region_weight(&self, region: Region, strength: f64) -> f64 {
        if self.is_empty() {
            return 1.0;
        }
        let r = region.index();
        // region rates are shrunk toward the board rate; an unseen region weighs 1
        let total_hits: f64 = self.hits.iter().sum();
        let total_shots: f64 = self.shots.iter().sum();
        let base = (total_hits + 1.0) / (total_shots + 2.0);
        let rate = (self.hits[r] + base) / (self.shots[r] + 1.0);
        (rate / base).powf(strength).clamp(MIN_WEIGHT, MAX_WEIGHT)
    }

    /// Multiplier for `coord`.
    pub fn weight(&self, coord: Coordinate, size: usize, strength: f64) -> f64 {
        self.region_weight(Region::of(coord, size), strength)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Legendary {
    model: HabitModel,
    seen: usize,
}

impl Legendary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prior(prior: HabitPrior) -> Self {
        Legendary {
            model: HabitModel::with_prior(prior),
            seen: 0,
        }
    }

    pub fn model(&self) -> &HabitModel {
        &self.model
    }

    fn fold(&mut self, size: usize, history: &[ShotRecord], config: &DifficultyConfig) {
        if self.seen > history.len() {
            self.seen = 0;
        }
        for rec in &history[self.seen..] {
            self.model
                .observe(rec.coord, rec.outcome.is_hit(), size, config.habit_decay);
        }
        self.seen = history.len();
    }

    /// Admiral's heatmap scaled by the habit weights.
    pub fn heatmap(
        &mut self,
        view: &TargetView,
        history: &[ShotRecord],
        config: &DifficultyConfig,
        rng: &mut SmallRng,
    ) -> Heatmap {
        self.fold(view.size(), history, config);
        let (mut map, _) = admiral::sample_heatmap(view, config, rng);
        if self.model.is_empty() {
            return map;
        }
        let size = view.size();
        for c in view.unknown_cells() {
            map.scale(c, self.model.weight(c, size, config.habit_strength));
        }
        map
    }
}

impl Strategy for Legendary {
    fn choose_target(
        &mut self,
        view: &TargetView,
        history: &[ShotRecord],
        config: &DifficultyConfig,
        rng: &mut SmallRng,
    ) -> Option<Coordinate> {
        self.heatmap(view, history, config, rng).best_unknown(view)
    }
}
