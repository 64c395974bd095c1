//! Placement-count heatmap.
//!
//! For each ship still afloat, enumerate every horizontal and vertical
//! placement that avoids known-empty cells and add its weight to the Unknown
//! cells it covers. Placements through unresolved hits weigh `hit_bias^k`,
//! and Unknown cells next to an unresolved hit get a flat multiplier on top.

use rand::rngs::SmallRng;

use crate::board::TargetView;
use crate::common::{Coordinate, ShotRecord};
use crate::config::{DifficultyConfig, PlacementRule};
use crate::grid::BitGrid;
use crate::heatmap::Heatmap;
use crate::ship::{segment, Orientation};

use super::Strategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct Veteran;

/// Every legal placement of a ship of `length` given what `view` reveals,
/// as (cells, number of unresolved hits covered).
fn placements<'a>(
    view: &'a TargetView,
    length: usize,
    blocked: &'a BitGrid,
    unresolved: &'a BitGrid,
) -> impl Iterator<Item = (Vec<Coordinate>, usize)> + 'a {
    let size = view.size();
    Orientation::BOTH.into_iter().flat_map(move |orient| {
        (0..size)
            .flat_map(move |r| (0..size).map(move |c| Coordinate::new(r, c)))
            .filter_map(move |origin| {
                let cells: Vec<Coordinate> = segment(origin, orient, length, size)?.collect();
                if cells.iter().any(|&c| blocked.is_set(c)) {
                    return None;
                }
                if view.placement_rule() == PlacementRule::NoTouching {
                    // an unresolved hit touching this ship but outside it
                    // would belong to a second, touching ship
                    let mask = BitGrid::from_coords(size, cells.iter().copied()).ok()?;
                    let stray = &(&mask.dilate() & unresolved) & &!&mask;
                    if !stray.is_empty() {
                        return None;
                    }
                }
                let n_hits = cells.iter().filter(|&&c| unresolved.is_set(c)).count();
                Some((cells, n_hits))
            })
    })
}

/// Number of legal placements of one ship of `length`.
pub fn placement_count(view: &TargetView, length: usize) -> usize {
    let blocked = view.blocked();
    let unresolved = view.unresolved_hits();
    placements(view, length, &blocked, &unresolved).count()
}

/// Score map over all cells; only Unknown cells carry a score.
pub fn score_map(view: &TargetView, config: &DifficultyConfig) -> Heatmap {
    let size = view.size();
    let mut map = Heatmap::new(size);
    let blocked = view.blocked();
    let unresolved = view.unresolved_hits();

    for len in view.remaining_lengths() {
        for (cells, n_hits) in placements(view, len, &blocked, &unresolved) {
            let weight = if n_hits == 0 {
                1.0
            } else {
                config.hit_bias.powi(n_hits as i32)
            };
            for c in cells {
                if view.is_unknown(c) {
                    map.add(c, weight);
                }
            }
        }
    }

    let mut boosted = BitGrid::new(size);
    for h in unresolved.iter_set() {
        for n in h.neighbors(size) {
            if view.is_unknown(n) && !boosted.is_set(n) {
                let _ = boosted.set(n);
                map.scale(n, config.hit_adjacency_bonus);
            }
        }
    }
    map
}

impl Strategy for Veteran {
    fn choose_target(
        &mut self,
        view: &TargetView,
        _history: &[ShotRecord],
        config: &DifficultyConfig,
        _rng: &mut SmallRng,
    ) -> Option<Coordinate> {
        score_map(view, config).best_unknown(view)
    }
}
