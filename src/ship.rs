//! Ship classes and placed ships, with hits tracked in a `BitGrid`.

use core::fmt;

use serde::Serialize;

use crate::common::{Coordinate, PlacementError};
use crate::grid::BitGrid;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub const BOTH: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

    /// Row and column step taken along the ship.
    #[inline]
    pub fn step(self) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        }
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ShipClass {
    name: &'static str,
    length: usize,
}

impl ShipClass {
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// Cells covered by a ship of `length` starting at `origin`, or `None` if it
/// runs off an `size × size` board.
pub fn segment(
    origin: Coordinate,
    orientation: Orientation,
    length: usize,
    size: usize,
) -> Option<impl Iterator<Item = Coordinate>> {
    if length == 0 {
        return None;
    }
    let (dr, dc) = orientation.step();
    let end_row = origin.row + dr * (length - 1);
    let end_col = origin.col + dc * (length - 1);
    if end_row >= size || end_col >= size {
        return None;
    }
    Some((0..length).map(move |i| Coordinate::new(origin.row + dr * i, origin.col + dc * i)))
}

/// A ship placed on a board.
#[derive(Clone, PartialEq, Eq)]
pub struct Ship {
    class: ShipClass,
    orientation: Orientation,
    cells: Vec<Coordinate>,
    mask: BitGrid,
    hits: BitGrid,
}

impl Ship {
    /// Place a ship of `class` at `origin` with `orientation` on a board of
    /// side `size`.
    pub fn new(
        class: ShipClass,
        origin: Coordinate,
        orientation: Orientation,
        size: usize,
    ) -> Result<Self, PlacementError> {
        let cells: Vec<Coordinate> = segment(origin, orientation, class.length(), size)
            .ok_or(PlacementError::OutOfBounds(origin))?
            .collect();
        let mask = BitGrid::from_coords(size, cells.iter().copied())?;
        Ok(Ship {
            class,
            orientation,
            cells,
            mask,
            hits: BitGrid::new(size),
        })
    }

    /// Build a ship from an explicit list of cells. The cells must form one
    /// straight, gap-free line of exactly `class.length()` cells, given in any
    /// order.
    pub fn from_cells(
        class: ShipClass,
        cells: &[Coordinate],
        size: usize,
    ) -> Result<Self, PlacementError> {
        if cells.len() != class.length() {
            return Err(PlacementError::WrongLength {
                name: class.name(),
                expected: class.length(),
                found: cells.len(),
            });
        }
        if let Some(&c) = cells.iter().find(|c| c.row >= size || c.col >= size) {
            return Err(PlacementError::OutOfBounds(c));
        }
        let mut sorted = cells.to_vec();
        sorted.sort();
        let Some(&origin) = sorted.first() else {
            return Err(PlacementError::InvalidLength(0));
        };
        let orientation = if sorted.iter().all(|c| c.row == origin.row) {
            Orientation::Horizontal
        } else if sorted.iter().all(|c| c.col == origin.col) {
            Orientation::Vertical
        } else {
            return Err(PlacementError::NotContiguous);
        };
        let ship = Ship::new(class, origin, orientation, size)?;
        if ship.cells != sorted {
            return Err(PlacementError::NotContiguous);
        }
        Ok(ship)
    }

    /// Register a shot at `coord`. Returns `true` if it struck this ship.
    pub fn register_hit(&mut self, coord: Coordinate) -> bool {
        if self.mask.is_set(coord) {
            let _ = self.hits.set(coord);
            true
        } else {
            false
        }
    }

    /// Check if every segment has been hit.
    pub fn is_sunk(&self) -> bool {
        self.hits.count_ones() == self.class.length()
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    pub fn name(&self) -> &'static str {
        self.class.name()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Occupied cells, ordered from the origin.
    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.mask.is_set(coord)
    }

    /// Occupancy mask of the ship on the board.
    pub fn mask(&self) -> &BitGrid {
        &self.mask
    }

    /// Cells of this ship already hit.
    pub fn hits(&self) -> &BitGrid {
        &self.hits
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ name: \"{}\", origin: {}, orientation: {:?}, hits: {} }}",
            self.class.name(),
            self.cells[0],
            self.orientation,
            self.hits.count_ones(),
        )
    }
}
