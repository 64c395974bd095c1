//! A runtime-sized bit grid.
//!
//! Boards are square `size × size` grids packed row-major into a vector of
//! `u64` words. Used for ship masks, hit/miss sets and sampled fleets, where
//! overlap checks reduce to word-wise AND.

use core::fmt;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use crate::common::Coordinate;

const WORD_BITS: usize = u64::BITS as usize;

/// Errors returned by grid operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Row or column index is outside `[0, size)`.
    #[error("index out of bounds: row={row}, col={col}, size={size}")]
    IndexOutOfBounds { row: usize, col: usize, size: usize },
}

/// A square bit grid with one bit per cell.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitGrid {
    size: usize,
    words: Vec<u64>,
}

impl BitGrid {
    /// Create an empty grid of `size × size` cells.
    pub fn new(size: usize) -> Self {
        let cells = size * size;
        BitGrid {
            size,
            words: vec![0; cells.div_ceil(WORD_BITS)],
        }
    }

    /// Side length of the grid.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `coord` lies inside the grid.
    #[inline]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    /// Gets the bit at `coord`.
    pub fn get(&self, coord: Coordinate) -> Result<bool, GridError> {
        let idx = self.index(coord)?;
        Ok(self.words[idx / WORD_BITS] >> (idx % WORD_BITS) & 1 == 1)
    }

    /// Gets the bit at `coord`, treating out-of-bounds cells as clear.
    #[inline]
    pub fn is_set(&self, coord: Coordinate) -> bool {
        self.get(coord).unwrap_or(false)
    }

    /// Sets the bit at `coord`.
    pub fn set(&mut self, coord: Coordinate) -> Result<(), GridError> {
        let idx = self.index(coord)?;
        self.words[idx / WORD_BITS] |= 1 << (idx % WORD_BITS);
        Ok(())
    }

    /// Clears the bit at `coord`.
    pub fn clear(&mut self, coord: Coordinate) -> Result<(), GridError> {
        let idx = self.index(coord)?;
        self.words[idx / WORD_BITS] &= !(1 << (idx % WORD_BITS));
        Ok(())
    }

    /// Clears every bit.
    pub fn clear_all(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Number of set cells.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if no bits are set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns `true` if the two grids share any set cell.
    pub fn intersects(&self, other: &BitGrid) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(a, b)| a & b != 0)
    }

    /// Returns `true` if every set cell of `self` is also set in `other`.
    pub fn is_subset(&self, other: &BitGrid) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| a & !b == 0)
    }

    /// Builds a grid from an iterator of coordinates.
    pub fn from_coords<I>(size: usize, coords: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut grid = Self::new(size);
        for c in coords {
            grid.set(c)?;
        }
        Ok(grid)
    }

    /// Grid of every cell within one step (including diagonals) of a set cell,
    /// the set cells themselves included.
    pub fn dilate(&self) -> BitGrid {
        let mut out = self.clone();
        for c in self.iter_set() {
            for n in c.surrounding(self.size) {
                // in bounds by construction
                let _ = out.set(n);
            }
        }
        out
    }

    /// Iterator over the set cells in row-major order.
    pub fn iter_set(&self) -> SetCells<'_> {
        SetCells { grid: self, idx: 0 }
    }

    #[inline]
    fn index(&self, coord: Coordinate) -> Result<usize, GridError> {
        if !self.contains(coord) {
            return Err(GridError::IndexOutOfBounds {
                row: coord.row,
                col: coord.col,
                size: self.size,
            });
        }
        Ok(coord.row * self.size + coord.col)
    }

    fn trim(&mut self) {
        let used = self.size * self.size;
        let rem = used % WORD_BITS;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }
}

impl fmt::Debug for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitGrid<{}>:", self.size)?;
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            for c in 0..self.size {
                let bit = if self.is_set(Coordinate::new(r, c)) {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            if r + 1 < self.size {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Iterator over the set cells of a [`BitGrid`].
#[derive(Clone, Copy)]
pub struct SetCells<'a> {
    grid: &'a BitGrid,
    idx: usize,
}

impl Iterator for SetCells<'_> {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.grid.size;
        while self.idx < n * n {
            let idx = self.idx;
            let word = self.grid.words[idx / WORD_BITS] >> (idx % WORD_BITS);
            if word == 0 {
                // skip the rest of an empty word
                self.idx = (idx / WORD_BITS + 1) * WORD_BITS;
                continue;
            }
            self.idx += 1;
            if word & 1 == 1 {
                return Some(Coordinate::new(idx / n, idx % n));
            }
        }
        None
    }
}

impl BitAnd for &BitGrid {
    type Output = BitGrid;
    fn bitand(self, rhs: Self) -> BitGrid {
        let mut out = self.clone();
        out &= rhs;
        out
    }
}

impl BitOr for &BitGrid {
    type Output = BitGrid;
    fn bitor(self, rhs: Self) -> BitGrid {
        let mut out = self.clone();
        out |= rhs;
        out
    }
}

/// Inverts the grid within board bounds.
impl Not for &BitGrid {
    type Output = BitGrid;
    fn not(self) -> BitGrid {
        let mut out = BitGrid {
            size: self.size,
            words: self.words.iter().map(|w| !w).collect(),
        };
        out.trim();
        out
    }
}

impl BitAndAssign<&BitGrid> for BitGrid {
    fn bitand_assign(&mut self, rhs: &BitGrid) {
        for (a, b) in self.words.iter_mut().zip(rhs.words.iter()) {
            *a &= b;
        }
    }
}

impl BitOrAssign<&BitGrid> for BitGrid {
    fn bitor_assign(&mut self, rhs: &BitGrid) {
        for (a, b) in self.words.iter_mut().zip(rhs.words.iter()) {
            *a |= b;
        }
    }
}
