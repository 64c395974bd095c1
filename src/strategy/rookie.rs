//! Hunt/target opponent.
//!
//! Hunts at random (on a checkerboard when parity hunting is on) until it
//! hits, then works through a stack of neighbouring cells. Once two hits line
//! up, the two cells extending that line go to the top of the stack.

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::board::TargetView;
use crate::common::{Coordinate, ShotOutcome, ShotRecord};
use crate::config::DifficultyConfig;

use super::Strategy;

#[derive(Debug, Clone, Default)]
pub struct Rookie {
    /// Follow-up cells; the next one is at the end.
    candidates: Vec<Coordinate>,
    /// Hits on the ship currently being chased.
    chase: Vec<Coordinate>,
    /// Shot-log entries already folded in.
    seen: usize,
}

impl Rookie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while there are follow-up cells queued.
    pub fn is_targeting(&self) -> bool {
        !self.candidates.is_empty()
    }

    fn fold(&mut self, view: &TargetView, history: &[ShotRecord]) {
        if self.seen > history.len() {
            // log belongs to another board
            *self = Rookie::new();
        }
        for rec in &history[self.seen..] {
            match rec.outcome {
                ShotOutcome::Miss => {}
                ShotOutcome::Hit => {
                    self.chase.push(rec.coord);
                    self.push_neighbors(view, rec.coord);
                    self.prefer_line(view);
                }
                ShotOutcome::Sunk(_) | ShotOutcome::AllSunk(_) => {
                    self.candidates.clear();
                    self.chase.clear();
                }
            }
        }
        self.seen = history.len();
    }

    fn push_neighbors(&mut self, view: &TargetView, coord: Coordinate) {
        for n in coord.neighbors(view.size()) {
            if view.is_unknown(n) && !self.candidates.contains(&n) {
                self.candidates.push(n);
            }
        }
    }

    /// Move the cells extending the latest line of hits to the top.
    fn prefer_line(&mut self, view: &TargetView) {
        let Some(&last) = self.chase.last() else {
            return;
        };
        let row: Vec<usize> = self
            .chase
            .iter()
            .filter(|h| h.row == last.row)
            .map(|h| h.col)
            .collect();
        let col: Vec<usize> = self
            .chase
            .iter()
            .filter(|h| h.col == last.col)
            .map(|h| h.row)
            .collect();
        let ends = if row.len() >= 2 {
            let (lo, hi) = min_max(&row);
            [
                last.offset(0, lo as isize - last.col as isize - 1, view.size()),
                last.offset(0, hi as isize - last.col as isize + 1, view.size()),
            ]
        } else if col.len() >= 2 {
            let (lo, hi) = min_max(&col);
            [
                last.offset(lo as isize - last.row as isize - 1, 0, view.size()),
                last.offset(hi as isize - last.row as isize + 1, 0, view.size()),
            ]
        } else {
            return;
        };
        for end in ends.into_iter().flatten() {
            if view.is_unknown(end) {
                self.candidates.retain(|&c| c != end);
                self.candidates.push(end);
            }
        }
    }

    fn hunt(view: &TargetView, config: &DifficultyConfig, rng: &mut SmallRng) -> Option<Coordinate> {
        let unknown: Vec<Coordinate> = view.unknown_cells().collect();
        if config.parity_hunt {
            let parity: Vec<Coordinate> = unknown
                .iter()
                .copied()
                .filter(|c| (c.row + c.col) % 2 == 0)
                .collect();
            if let Some(&c) = parity.choose(rng) {
                return Some(c);
            }
        }
        unknown.choose(rng).copied()
    }
}

fn min_max(values: &[usize]) -> (usize, usize) {
    let lo = values.iter().copied().min().unwrap_or(0);
    let hi = values.iter().copied().max().unwrap_or(0);
    (lo, hi)
}

impl Strategy for Rookie {
    fn choose_target(
        &mut self,
        view: &TargetView,
        history: &[ShotRecord],
        config: &DifficultyConfig,
        rng: &mut SmallRng,
    ) -> Option<Coordinate> {
        self.fold(view, history);

        if self.candidates.is_empty() {
            // hits left over from a ship we stopped chasing when another sank
            let leftover: Vec<Coordinate> = view.unresolved_hits().iter_set().collect();
            for h in leftover {
                if !self.chase.contains(&h) {
                    self.chase.push(h);
                }
                self.push_neighbors(view, h);
            }
        }

        let p = config.rookie_follow_up;
        let follow_up = p >= 1.0 || (p > 0.0 && rng.random_bool(p));
        if follow_up {
            while let Some(c) = self.candidates.pop() {
                if view.is_unknown(c) {
                    return Some(c);
                }
            }
        }
        Self::hunt(view, config, rng)
    }
}
