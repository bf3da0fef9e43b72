//! Board geometry and the hazard table.
//!
//! Cells are numbered 1..=100 along a boustrophedon path: the bottom row holds
//! 1–10 left-to-right, the row above runs 11–20 right-to-left, and so on. Row 0
//! is the *bottom* row here; canvas code flips it via [`cell_center`].
//!
//! The hazard table (snakes and ladders) is immutable once built. The classic
//! layout lives in `layout_classic.rs` and is shared through [`classic`].

use std::sync::OnceLock;

use crate::error::GameError;

mod layout_classic;

pub use layout_classic::{CLASSIC_LADDERS, CLASSIC_SNAKES};

/// Cells per row / column.
pub const GRID_SIZE: u8 = 10;
/// Last cell on the board; reaching it wins.
pub const FINAL_CELL: u8 = GRID_SIZE * GRID_SIZE;

// --- Geometry ---------------------------------------------------------------

/// Grid position of a cell. `row` 0 is the bottom row, `col` 0 the left column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellCoord {
    pub row: u8,
    pub col: u8,
}

/// Grid position of `cell`, or `None` when the cell is off the board (0 or >100).
pub fn cell_coords(cell: u8) -> Option<CellCoord> {
    if cell < 1 || cell > FINAL_CELL {
        return None;
    }
    let index = cell - 1;
    let row = index / GRID_SIZE;
    let along = index % GRID_SIZE;
    let col = if row % 2 == 0 {
        along
    } else {
        GRID_SIZE - 1 - along
    };
    Some(CellCoord { row, col })
}

/// Cell number at a grid position (row 0 = bottom), or `None` when out of range.
pub fn cell_at(row: u8, col: u8) -> Option<u8> {
    if row >= GRID_SIZE || col >= GRID_SIZE {
        return None;
    }
    let along = if row % 2 == 0 { col } else { GRID_SIZE - 1 - col };
    Some(row * GRID_SIZE + along + 1)
}

/// Pixel center of `cell` on a canvas whose squares are `cell_size` wide.
/// Screen row 0 is the top of the canvas, i.e. board row 9.
pub fn cell_center(cell: u8, cell_size: f64) -> Option<(f64, f64)> {
    let CellCoord { row, col } = cell_coords(cell)?;
    let screen_row = f64::from(GRID_SIZE - 1 - row);
    Some((
        f64::from(col) * cell_size + cell_size / 2.0,
        screen_row * cell_size + cell_size / 2.0,
    ))
}

// --- Hazards ----------------------------------------------------------------

/// Whether a hazard sends a player down or up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HazardKind {
    Snake,
    Ladder,
}

/// A forced move from `start` to `end`, triggered by landing exactly on `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hazard {
    pub kind: HazardKind,
    pub start: u8,
    pub end: u8,
}

impl Hazard {
    pub const fn snake(start: u8, end: u8) -> Self {
        Self {
            kind: HazardKind::Snake,
            start,
            end,
        }
    }

    pub const fn ladder(start: u8, end: u8) -> Self {
        Self {
            kind: HazardKind::Ladder,
            start,
            end,
        }
    }
}

/// Immutable lookup from start cell to hazard. Index 0 is unused.
#[derive(Clone, Debug)]
pub struct HazardTable {
    by_start: [Option<Hazard>; FINAL_CELL as usize + 1],
    ordered: Vec<Hazard>,
}

impl HazardTable {
    /// Build a table, rejecting layouts that break the board invariants:
    /// cells inside 1..=100, snakes go down, ladders go up, no hazard starts
    /// on the final cell, and no two hazards share a start.
    pub fn new(hazards: &[Hazard]) -> Result<Self, GameError> {
        let mut by_start = [None; FINAL_CELL as usize + 1];
        for h in hazards {
            let invalid = |reason| GameError::InvalidHazard {
                start: h.start,
                end: h.end,
                reason,
            };
            if h.start < 1 || h.start > FINAL_CELL || h.end < 1 || h.end > FINAL_CELL {
                return Err(invalid("cell outside the board"));
            }
            if h.start == FINAL_CELL {
                return Err(invalid("final cell cannot hold a hazard"));
            }
            match h.kind {
                HazardKind::Snake if h.end >= h.start => {
                    return Err(invalid("snake must lead downward"));
                }
                HazardKind::Ladder if h.end <= h.start => {
                    return Err(invalid("ladder must lead upward"));
                }
                _ => {}
            }
            let slot = &mut by_start[h.start as usize];
            if slot.is_some() {
                return Err(invalid("start cell already holds a hazard"));
            }
            *slot = Some(*h);
        }
        Ok(Self {
            by_start,
            ordered: hazards.to_vec(),
        })
    }

    /// The hazard starting at `cell`, if any.
    pub fn lookup(&self, cell: u8) -> Option<Hazard> {
        self.by_start.get(cell as usize).copied().flatten()
    }

    pub fn snakes(&self) -> impl Iterator<Item = &Hazard> {
        self.ordered.iter().filter(|h| h.kind == HazardKind::Snake)
    }

    pub fn ladders(&self) -> impl Iterator<Item = &Hazard> {
        self.ordered.iter().filter(|h| h.kind == HazardKind::Ladder)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// The fixed board used by every game. Built once, shared for the process lifetime.
pub fn classic() -> &'static HazardTable {
    static CLASSIC: OnceLock<HazardTable> = OnceLock::new();
    CLASSIC.get_or_init(|| {
        let hazards: Vec<Hazard> = CLASSIC_SNAKES
            .iter()
            .chain(CLASSIC_LADDERS.iter())
            .copied()
            .collect();
        match HazardTable::new(&hazards) {
            Ok(table) => table,
            // The classic layout is a compile-time constant covered by tests.
            Err(err) => panic!("classic layout is invalid: {err}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_row_runs_left_to_right() {
        assert_eq!(cell_coords(1), Some(CellCoord { row: 0, col: 0 }));
        assert_eq!(cell_coords(10), Some(CellCoord { row: 0, col: 9 }));
    }

    #[test]
    fn test_second_row_reverses() {
        assert_eq!(cell_coords(11), Some(CellCoord { row: 1, col: 9 }));
        assert_eq!(cell_coords(20), Some(CellCoord { row: 1, col: 0 }));
        assert_eq!(cell_coords(100), Some(CellCoord { row: 9, col: 0 }));
    }

    #[test]
    fn test_out_of_range_has_no_coordinate() {
        assert_eq!(cell_coords(0), None);
        assert_eq!(cell_coords(101), None);
        assert_eq!(cell_at(10, 0), None);
        assert_eq!(cell_at(0, 10), None);
        assert_eq!(cell_center(0, 60.0), None);
    }

    #[test]
    fn test_cell_at_inverts_cell_coords() {
        for cell in 1..=FINAL_CELL {
            let c = cell_coords(cell).unwrap();
            assert_eq!(cell_at(c.row, c.col), Some(cell));
        }
    }

    #[test]
    fn test_cell_center_flips_rows() {
        // Cell 1 sits bottom-left, cell 100 top-left.
        assert_eq!(cell_center(1, 60.0), Some((30.0, 570.0)));
        assert_eq!(cell_center(100, 60.0), Some((30.0, 30.0)));
        assert_eq!(cell_center(91, 60.0), Some((570.0, 30.0)));
    }

    #[test]
    fn test_classic_lookup() {
        let table = classic();
        assert_eq!(table.lookup(4), Some(Hazard::ladder(4, 56)));
        assert_eq!(table.lookup(98), Some(Hazard::snake(98, 28)));
        assert_eq!(table.lookup(5), None);
        assert_eq!(table.lookup(FINAL_CELL), None);
        assert_eq!(table.lookup(200), None);
        assert_eq!(table.snakes().count(), 5);
        assert_eq!(table.ladders().count(), 5);
    }

    #[test]
    fn test_rejects_shared_start() {
        let err = HazardTable::new(&[Hazard::snake(40, 3), Hazard::ladder(40, 60)]).unwrap_err();
        assert!(matches!(err, GameError::InvalidHazard { start: 40, .. }));
    }

    #[test]
    fn test_rejects_wrong_direction_and_final_cell() {
        assert!(HazardTable::new(&[Hazard::snake(10, 20)]).is_err());
        assert!(HazardTable::new(&[Hazard::ladder(30, 30)]).is_err());
        assert!(HazardTable::new(&[Hazard::snake(100, 1)]).is_err());
        assert!(HazardTable::new(&[Hazard::ladder(0, 5)]).is_err());
    }
}
