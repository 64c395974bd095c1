//! Per-cell score grids produced by the heatmap strategies.

use serde::Serialize;

use crate::board::TargetView;
use crate::common::Coordinate;

/// Relative likelihood, per cell, that an afloat ship occupies it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    size: usize,
    scores: Vec<f64>,
}

impl Heatmap {
    /// All-zero map.
    pub fn new(size: usize) -> Self {
        Heatmap {
            size,
            scores: vec![0.0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, coord: Coordinate) -> f64 {
        self.scores[coord.row * self.size + coord.col]
    }

    pub fn add(&mut self, coord: Coordinate, amount: f64) {
        self.scores[coord.row * self.size + coord.col] += amount;
    }

    pub fn scale(&mut self, coord: Coordinate, factor: f64) {
        self.scores[coord.row * self.size + coord.col] *= factor;
    }

    /// Sum of all scores.
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }

    /// Rows of scores, for rendering.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.scores.chunks(self.size.max(1))
    }

    /// The Unknown cell with the highest score. Ties go to the lowest row,
    /// then the lowest column. `None` only when no Unknown cell remains.
    pub fn best_unknown(&self, view: &TargetView) -> Option<Coordinate> {
        let mut best: Option<(Coordinate, f64)> = None;
        for c in view.unknown_cells() {
            let s = self.get(c);
            match best {
                Some((_, b)) if s <= b => {}
                _ => best = Some((c, s)),
            }
        }
        best.map(|(c, _)| c)
    }

    /// Scores divided by their sum; a zero map becomes uniform.
    pub fn normalized(&self) -> Heatmap {
        let total = self.total();
        let scores = if total == 0.0 {
            let n = self.scores.len().max(1) as f64;
            vec![1.0 / n; self.scores.len()]
        } else {
            self.scores.iter().map(|s| s / total).collect()
        };
        Heatmap {
            size: self.size,
            scores,
        }
    }

    /// Pearson correlation of the scores of the cells in `cells`.
    pub fn correlation<I>(&self, other: &Heatmap, cells: I) -> f64
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let pairs: Vec<(f64, f64)> = cells
            .into_iter()
            .map(|c| (self.get(c), other.get(c)))
            .collect();
        let n = pairs.len() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let (mx, my) = pairs
            .iter()
            .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x / n, sy + y / n));
        let (mut cov, mut vx, mut vy) = (0.0, 0.0, 0.0);
        for (x, y) in &pairs {
            cov += (x - mx) * (y - my);
            vx += (x - mx) * (x - mx);
            vy += (y - my) * (y - my);
        }
        if vx == 0.0 || vy == 0.0 {
            return 0.0;
        }
        cov / (vx.sqrt() * vy.sqrt())
    }
}
