//! Game board: ship registry, shot application and the attacker-safe view.

use core::fmt;
use std::time::SystemTime;

use log::trace;
use rand::Rng;
use serde::Serialize;

use crate::common::{CellState, Coordinate, PlacementError, ShotError, ShotOutcome, ShotRecord};
use crate::config::{FleetSpec, PlacementRule, FLEET_RESTARTS, PLACEMENT_ATTEMPTS};
use crate::grid::BitGrid;
use crate::ship::{segment, Orientation, Ship, ShipClass};

/// One side's board: the true grid, the ships on it and the log of shots
/// fired against it.
#[derive(Clone)]
pub struct Board {
    size: usize,
    rule: PlacementRule,
    cells: Vec<CellState>,
    ships: Vec<Ship>,
    ship_map: BitGrid,
    shots: Vec<ShotRecord>,
}

impl Board {
    /// Create an empty board (no ships placed).
    pub fn new(size: usize, rule: PlacementRule) -> Self {
        Board {
            size,
            rule,
            cells: vec![CellState::Unknown; size * size],
            ships: Vec::new(),
            ship_map: BitGrid::new(size),
            shots: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn placement_rule(&self) -> PlacementRule {
        self.rule
    }

    /// True state of a cell, `Ship` included. Out-of-bounds cells read as
    /// `Unknown`.
    pub fn cell(&self, coord: Coordinate) -> CellState {
        if self.in_bounds(coord) {
            self.cells[self.index(coord)]
        } else {
            CellState::Unknown
        }
    }

    /// All ships, in placement order. Sunk ships stay registered.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Ships still afloat.
    pub fn remaining_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(|s| !s.is_sunk())
    }

    /// Ships already sunk.
    pub fn sunk_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(|s| s.is_sunk())
    }

    /// Returns `true` when every registered ship is sunk.
    pub fn all_sunk(&self) -> bool {
        self.ships.iter().all(|s| s.is_sunk())
    }

    /// Board occupancy mask of all ships.
    pub fn ship_map(&self) -> &BitGrid {
        &self.ship_map
    }

    /// Shots taken against this board, oldest first.
    pub fn shots(&self) -> &[ShotRecord] {
        &self.shots
    }

    /// Place a ship occupying exactly `cells`.
    pub fn place_ship(
        &mut self,
        class: ShipClass,
        cells: &[Coordinate],
    ) -> Result<(), PlacementError> {
        let ship = Ship::from_cells(class, cells, self.size)?;
        self.register(ship)
    }

    /// Place a ship by origin and orientation.
    pub fn place(
        &mut self,
        class: ShipClass,
        origin: Coordinate,
        orientation: Orientation,
    ) -> Result<(), PlacementError> {
        let ship = Ship::new(class, origin, orientation, self.size)?;
        self.register(ship)
    }

    /// Returns `Ok(())` if a ship with `mask` could be added under the board's
    /// placement rule.
    pub fn check_placement(&self, mask: &BitGrid) -> Result<(), PlacementError> {
        if let Some(c) = (mask & &self.ship_map).iter_set().next() {
            return Err(PlacementError::Overlaps(c));
        }
        if self.rule == PlacementRule::NoTouching {
            if let Some(c) = (&mask.dilate() & &self.ship_map).iter_set().next() {
                return Err(PlacementError::Touches(c));
            }
        }
        Ok(())
    }

    fn register(&mut self, ship: Ship) -> Result<(), PlacementError> {
        self.check_placement(ship.mask())?;
        for &c in ship.cells() {
            let idx = self.index(c);
            self.cells[idx] = CellState::Ship;
        }
        self.ship_map |= ship.mask();
        trace!("placed {:?}", ship);
        self.ships.push(ship);
        Ok(())
    }

    /// Returns a random legal (origin, orientation) for `class`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        class: ShipClass,
    ) -> Result<(Coordinate, Orientation), PlacementError> {
        let len = class.length();
        if len == 0 || len > self.size {
            return Err(PlacementError::InvalidLength(len));
        }
        for _ in 0..PLACEMENT_ATTEMPTS {
            let orient = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_r, max_c) = match orient {
                Orientation::Horizontal => (self.size - 1, self.size - len),
                Orientation::Vertical => (self.size - len, self.size - 1),
            };
            let origin = Coordinate::new(rng.random_range(0..=max_r), rng.random_range(0..=max_c));
            let Some(cells) = segment(origin, orient, len, self.size) else {
                continue;
            };
            let mask = BitGrid::from_coords(self.size, cells)?;
            if self.check_placement(&mask).is_ok() {
                return Ok((origin, orient));
            }
        }
        Err(PlacementError::UnableToPlace {
            name: class.name(),
            attempts: PLACEMENT_ATTEMPTS,
        })
    }

    /// Randomly place every ship of `fleet`. Retries are bounded; on failure
    /// the board is left as it was.
    pub fn auto_place_fleet<R: Rng + ?Sized>(
        &mut self,
        fleet: &FleetSpec,
        rng: &mut R,
    ) -> Result<(), PlacementError> {
        let mut last_err = None;
        for _ in 0..FLEET_RESTARTS {
            let mut scratch = self.clone();
            match scratch.place_all(fleet, rng) {
                Ok(()) => {
                    *self = scratch;
                    return Ok(());
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or(PlacementError::UnableToPlace {
            name: "fleet",
            attempts: FLEET_RESTARTS,
        }))
    }

    fn place_all<R: Rng + ?Sized>(
        &mut self,
        fleet: &FleetSpec,
        rng: &mut R,
    ) -> Result<(), PlacementError> {
        for &class in fleet.ships() {
            let (origin, orient) = self.random_placement(rng, class)?;
            self.place(class, origin, orient)?;
        }
        Ok(())
    }

    /// Fire at `coord`. Either the grid, the struck ship and the shot log are
    /// all updated, or an error is returned and nothing changes.
    pub fn apply_shot(&mut self, coord: Coordinate) -> Result<ShotOutcome, ShotError> {
        if !self.in_bounds(coord) {
            return Err(ShotError::OutOfBounds(coord));
        }
        let idx = self.index(coord);
        if matches!(self.cells[idx], CellState::Hit | CellState::Miss) {
            return Err(ShotError::DuplicateShot(coord));
        }

        let outcome = match self.ships.iter().position(|s| s.contains(coord)) {
            Some(i) => {
                self.cells[idx] = CellState::Hit;
                let ship = &mut self.ships[i];
                ship.register_hit(coord);
                if !ship.is_sunk() {
                    ShotOutcome::Hit
                } else if self.all_sunk() {
                    ShotOutcome::AllSunk(self.ships[i].name())
                } else {
                    ShotOutcome::Sunk(self.ships[i].name())
                }
            }
            None => {
                self.cells[idx] = CellState::Miss;
                ShotOutcome::Miss
            }
        };

        self.shots.push(ShotRecord {
            seq: self.shots.len(),
            coord,
            outcome,
            at: SystemTime::now(),
        });
        Ok(outcome)
    }

    /// The attacker-safe projection of this board.
    pub fn visible_view(&self) -> TargetView {
        let mut hits = BitGrid::new(self.size);
        let mut misses = BitGrid::new(self.size);
        for (i, state) in self.cells.iter().enumerate() {
            let c = Coordinate::new(i / self.size, i % self.size);
            // in bounds by construction
            let _ = match state {
                CellState::Hit => hits.set(c),
                CellState::Miss => misses.set(c),
                _ => Ok(()),
            };
        }
        let mut sunk = BitGrid::new(self.size);
        let mut sunk_ships = Vec::new();
        let mut remaining = Vec::new();
        for ship in &self.ships {
            if ship.is_sunk() {
                sunk |= ship.mask();
                sunk_ships.push(SunkShip {
                    class: ship.class(),
                    cells: ship.cells().to_vec(),
                });
            } else {
                remaining.push(ship.class());
            }
        }
        TargetView {
            size: self.size,
            rule: self.rule,
            hits,
            misses,
            sunk,
            sunk_ships,
            remaining,
            shots_fired: self.shots.len(),
        }
    }

    /// Shot statistics for this board.
    pub fn stats(&self) -> ShotStats {
        let hits = self
            .cells
            .iter()
            .filter(|&&s| s == CellState::Hit)
            .count();
        let shots_fired = self.shots.len();
        let total_ship_cells = self.ship_map.count_ones();
        let remaining_cells = total_ship_cells - hits;
        let ships_sunk = self.sunk_ships().count();
        ShotStats {
            shots_fired,
            hits,
            misses: shots_fired - hits,
            accuracy: percent(hits, shots_fired),
            ship_cells_remaining: remaining_cells,
            total_ship_cells,
            percent_ship_cells_remaining: percent(remaining_cells, total_ship_cells),
            ships_remaining: self.ships.len() - ships_sunk,
            ships_sunk,
            board_size: self.size,
            total_cells: self.size * self.size,
            fleet_destroyed: !self.ships.is_empty() && self.all_sunk(),
        }
    }

    /// Snapshot for rendering. With `reveal` the full layout is shown;
    /// otherwise only what an attacker may see.
    pub fn snapshot(&self, reveal: bool) -> BoardSnapshot {
        let cells = (0..self.size)
            .map(|r| {
                (0..self.size)
                    .map(|c| match self.cell(Coordinate::new(r, c)) {
                        CellState::Ship if !reveal => CellState::Unknown,
                        other => other,
                    })
                    .collect()
            })
            .collect();
        let ships = self
            .ships
            .iter()
            .filter(|s| reveal || s.is_sunk())
            .map(|s| ShipSnapshot {
                name: s.name(),
                length: s.class().length(),
                cells: s.cells().to_vec(),
                hits: s.hits().count_ones(),
                sunk: s.is_sunk(),
            })
            .collect();
        BoardSnapshot {
            size: self.size,
            revealed: reveal,
            cells,
            ships,
            stats: self.stats(),
        }
    }

    #[inline]
    fn in_bounds(&self, coord: Coordinate) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    #[inline]
    fn index(&self, coord: Coordinate) -> usize {
        coord.row * self.size + coord.col
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  size: {},\n  rule: {:?},\n  ship_map: {:?},\n  ships: {:?},\n  shots: {}\n}}",
            self.size,
            self.rule,
            self.ship_map,
            self.ships,
            self.shots.len()
        )
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

/// A sunk ship, whose class and cells are public knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SunkShip {
    pub class: ShipClass,
    pub cells: Vec<Coordinate>,
}

/// What an attacker knows about a board: hits, misses, the ships it has
/// sunk and the classes still afloat. Never exposes unhit ship cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetView {
    size: usize,
    rule: PlacementRule,
    hits: BitGrid,
    misses: BitGrid,
    sunk: BitGrid,
    sunk_ships: Vec<SunkShip>,
    remaining: Vec<ShipClass>,
    shots_fired: usize,
}

impl TargetView {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn placement_rule(&self) -> PlacementRule {
        self.rule
    }

    /// `Hit`, `Miss` or `Unknown`; never `Ship`.
    pub fn cell(&self, coord: Coordinate) -> CellState {
        if self.hits.is_set(coord) {
            CellState::Hit
        } else if self.misses.is_set(coord) {
            CellState::Miss
        } else {
            CellState::Unknown
        }
    }

    /// Returns `true` for in-bounds cells not yet fired upon.
    pub fn is_unknown(&self, coord: Coordinate) -> bool {
        coord.row < self.size && coord.col < self.size && self.cell(coord) == CellState::Unknown
    }

    /// Cells not yet fired upon, row-major.
    pub fn unknown_cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.size)
            .flat_map(move |r| (0..self.size).map(move |c| Coordinate::new(r, c)))
            .filter(move |&c| self.cell(c) == CellState::Unknown)
    }

    pub fn hits(&self) -> &BitGrid {
        &self.hits
    }

    pub fn misses(&self) -> &BitGrid {
        &self.misses
    }

    /// Cells of sunk ships.
    pub fn sunk_cells(&self) -> &BitGrid {
        &self.sunk
    }

    pub fn sunk_ships(&self) -> &[SunkShip] {
        &self.sunk_ships
    }

    /// Classes of the ships still afloat.
    pub fn remaining(&self) -> &[ShipClass] {
        &self.remaining
    }

    pub fn remaining_lengths(&self) -> Vec<usize> {
        self.remaining.iter().map(|s| s.length()).collect()
    }

    /// Hits not yet attributed to a sunk ship.
    pub fn unresolved_hits(&self) -> BitGrid {
        &self.hits & &!&self.sunk
    }

    /// Cells known to hold no afloat ship: misses, sunk ships and, when ships
    /// may not touch, the ring around each sunk ship.
    pub fn blocked(&self) -> BitGrid {
        let around_sunk = match self.rule {
            PlacementRule::NoTouching => self.sunk.dilate(),
            PlacementRule::AllowTouching => self.sunk.clone(),
        };
        &self.misses | &around_sunk
    }

    pub fn shots_fired(&self) -> usize {
        self.shots_fired
    }
}

/// Shot statistics of one board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotStats {
    pub shots_fired: usize,
    pub hits: usize,
    pub misses: usize,
    /// Percentage of shots that hit, rounded to one decimal.
    pub accuracy: f64,
    pub ship_cells_remaining: usize,
    pub total_ship_cells: usize,
    pub percent_ship_cells_remaining: f64,
    pub ships_remaining: usize,
    pub ships_sunk: usize,
    pub board_size: usize,
    pub total_cells: usize,
    pub fleet_destroyed: bool,
}

/// Ship entry of a [`BoardSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipSnapshot {
    pub name: &'static str,
    pub length: usize,
    pub cells: Vec<Coordinate>,
    pub hits: usize,
    pub sunk: bool,
}

/// Rendering-ready copy of a board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub size: usize,
    /// Whether unhit ship cells are shown.
    pub revealed: bool,
    /// Row-major cell states.
    pub cells: Vec<Vec<CellState>>,
    pub ships: Vec<ShipSnapshot>,
    pub stats: ShotStats,
}
