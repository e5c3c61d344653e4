//! Box layer and goal mark bookkeeping.

use std::collections::BTreeSet;

use sokoban_core::{BoxOccupancy, CellCoord};

/// Goal cell that counts toward the win condition while a box covers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Mark {
    cell: CellCoord,
    filled: bool,
}

impl Mark {
    /// Creates an unfilled mark anchored at the provided cell.
    pub(crate) const fn new(cell: CellCoord) -> Self {
        Self {
            cell,
            filled: false,
        }
    }

    pub(crate) const fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) const fn is_filled(&self) -> bool {
        self.filled
    }

    /// Recomputes the filled flag from the current box positions.
    pub(crate) fn refresh(&mut self, boxes: &impl BoxOccupancy) {
        self.filled = boxes.has_box(self.cell);
    }
}

/// Keyed set of box positions; a cell holds at most one box.
#[derive(Clone, Debug, Default)]
pub(crate) struct BoxLayer {
    cells: BTreeSet<CellCoord>,
}

impl BoxLayer {
    pub(crate) fn from_cells(cells: impl IntoIterator<Item = CellCoord>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Relocates a box without validating either cell.
    pub(crate) fn relocate(&mut self, from: CellCoord, to: CellCoord) {
        let _ = self.cells.remove(&from);
        let _ = self.cells.insert(to);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }
}

impl BoxOccupancy for BoxLayer {
    fn has_box(&self, cell: CellCoord) -> bool {
        self.contains(cell)
    }
}
