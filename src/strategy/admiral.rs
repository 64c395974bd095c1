//! Monte Carlo heatmap.
//!
//! Each sample is a whole hypothetical fleet for the ships still afloat,
//! placed at random around known-empty cells. A sample is kept only if it
//! covers every unresolved hit. The heatmap is the fraction of kept samples
//! in which a ship occupies each Unknown cell. Sampling stops at the sample
//! target, the attempt cap or the time limit, whichever comes first; with
//! too few kept samples the Veteran count is used instead.
//!
//! Ships are placed one after another and the whole fleet is rejected at the
//! end, so on crowded boards the samples are not uniform over consistent
//! fleets: layouts that are easy to build sequentially are over-represented.

use std::time::Instant;

use log::debug;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::board::TargetView;
use crate::common::{Coordinate, ShotRecord};
use crate::config::{DifficultyConfig, PlacementRule};
use crate::grid::BitGrid;
use crate::heatmap::Heatmap;
use crate::ship::{segment, Orientation};

use super::{veteran, Strategy};

/// Placement tries per ship within one sample.
const SHIP_TRIES: usize = 20;
/// Attempts between wall-clock checks.
const CLOCK_STRIDE: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct Admiral;

/// How one turn's sampling went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleReport {
    pub accepted: usize,
    pub attempts: usize,
    /// The Veteran heatmap was returned instead of the estimate.
    pub fell_back: bool,
}

/// Draw one fleet consistent with `view`, returning its occupancy.
fn sample_fleet<R: Rng + ?Sized>(
    view: &TargetView,
    lengths: &[usize],
    blocked: &BitGrid,
    unresolved: &BitGrid,
    rng: &mut R,
) -> Option<BitGrid> {
    let size = view.size();
    let mut occupied = BitGrid::new(size);
    let mut forbidden = blocked.clone();

    for &len in lengths {
        let mut placed = false;
        for _ in 0..SHIP_TRIES {
            let orient = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_r, max_c) = match orient {
                Orientation::Horizontal => (size - 1, size - len),
                Orientation::Vertical => (size - len, size - 1),
            };
            let origin = Coordinate::new(rng.random_range(0..=max_r), rng.random_range(0..=max_c));
            let mask = BitGrid::from_coords(size, segment(origin, orient, len, size)?).ok()?;
            if mask.intersects(&forbidden) {
                continue;
            }
            occupied |= &mask;
            match view.placement_rule() {
                PlacementRule::NoTouching => forbidden |= &mask.dilate(),
                PlacementRule::AllowTouching => forbidden |= &mask,
            }
            placed = true;
            break;
        }
        if !placed {
            return None;
        }
    }

    unresolved.is_subset(&occupied).then_some(occupied)
}

/// Estimate the heatmap by sampling fleets.
pub fn sample_heatmap<R: Rng + ?Sized>(
    view: &TargetView,
    config: &DifficultyConfig,
    rng: &mut R,
) -> (Heatmap, SampleReport) {
    let size = view.size();
    let blocked = view.blocked();
    let unresolved = view.unresolved_hits();
    let mut lengths = view.remaining_lengths();
    // long ships first, they are the hardest to fit
    lengths.sort_unstable_by(|a, b| b.cmp(a));
    if lengths.iter().any(|&l| l == 0 || l > size) {
        return fallback(view, config, 0, 0);
    }

    let mut counts = Heatmap::new(size);
    let mut accepted = 0;
    let mut attempts = 0;
    let start = Instant::now();

    while accepted < config.admiral_samples && attempts < config.admiral_max_attempts {
        if let Some(limit) = config.time_limit {
            if attempts % CLOCK_STRIDE == 0 && start.elapsed() >= limit {
                break;
            }
        }
        attempts += 1;
        if let Some(occupied) = sample_fleet(view, &lengths, &blocked, &unresolved, rng) {
            accepted += 1;
            for c in occupied.iter_set() {
                if view.is_unknown(c) {
                    counts.add(c, 1.0);
                }
            }
        }
    }

    if accepted < config.admiral_min_samples.max(1) {
        return fallback(view, config, accepted, attempts);
    }

    let mut map = Heatmap::new(size);
    let inv = 1.0 / accepted as f64;
    for r in 0..size {
        for c in 0..size {
            let coord = Coordinate::new(r, c);
            map.add(coord, counts.get(coord) * inv);
        }
    }
    (
        map,
        SampleReport {
            accepted,
            attempts,
            fell_back: false,
        },
    )
}

fn fallback(
    view: &TargetView,
    config: &DifficultyConfig,
    accepted: usize,
    attempts: usize,
) -> (Heatmap, SampleReport) {
    debug!(
        "admiral: {} of {} samples accepted in {} attempts, using placement counts",
        accepted, config.admiral_samples, attempts
    );
    (
        veteran::score_map(view, config),
        SampleReport {
            accepted,
            attempts,
            fell_back: true,
        },
    )
}

impl Strategy for Admiral {
    fn choose_target(
        &mut self,
        view: &TargetView,
        _history: &[ShotRecord],
        config: &DifficultyConfig,
        rng: &mut SmallRng,
    ) -> Option<Coordinate> {
        let (map, _) = sample_heatmap(view, config, rng);
        map.best_unknown(view)
    }
}
