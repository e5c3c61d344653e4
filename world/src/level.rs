//! Validation of level descriptors before a world is built from them.

use std::{collections::BTreeSet, fmt};

use sokoban_core::{CellCoord, LevelDescriptor};
use thiserror::Error;

/// Entity collection a level cell belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Static walls.
    Wall,
    /// Pushable boxes.
    Box,
    /// Goal marks.
    Mark,
    /// Collectible gold.
    Gold,
    /// Preferred hero spawn cell.
    HeroSpawn,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wall => "wall",
            Self::Box => "box",
            Self::Mark => "mark",
            Self::Gold => "gold",
            Self::HeroSpawn => "hero spawn",
        };
        f.write_str(name)
    }
}

/// Reasons a level descriptor cannot seed a world.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The board has no cells.
    #[error("level board must contain at least one cell")]
    EmptyBoard,
    /// An entity lies outside the board.
    #[error("{layer} at {cell:?} lies outside a board of size {size}")]
    OutOfBounds {
        /// Collection holding the offending cell.
        layer: Layer,
        /// Offending cell.
        cell: CellCoord,
        /// Side length of the board.
        size: u32,
    },
    /// A wall and a box share a cell.
    #[error("wall and box overlap at {cell:?}")]
    Overlap {
        /// Cell claimed by both.
        cell: CellCoord,
    },
    /// A box cell is listed more than once.
    #[error("box listed twice at {cell:?}")]
    DuplicateBox {
        /// Repeated cell.
        cell: CellCoord,
    },
    /// Gold starts on a cell that is already a barrier.
    #[error("gold at {cell:?} sits on a {layer}")]
    GoldBlocked {
        /// Barrier layer under the gold.
        layer: Layer,
        /// Offending cell.
        cell: CellCoord,
    },
    /// The level asks for more filled marks than it defines.
    #[error("level expects {expected} filled marks but defines only {marks}")]
    UnreachableTarget {
        /// Filled marks required to win.
        expected: usize,
        /// Distinct marks present in the level.
        marks: usize,
    },
}

pub(crate) fn validate(level: &LevelDescriptor) -> Result<(), LevelError> {
    let size = level.size;
    if size == 0 {
        return Err(LevelError::EmptyBoard);
    }

    let layers = [
        (Layer::Wall, level.walls.as_slice()),
        (Layer::Box, level.boxes.as_slice()),
        (Layer::Mark, level.marks.as_slice()),
        (Layer::Gold, level.gold.as_slice()),
        (Layer::HeroSpawn, level.hero_spawn.as_slice()),
    ];
    for (layer, cells) in layers {
        if let Some(cell) = cells.iter().find(|cell| !within(**cell, size)) {
            return Err(LevelError::OutOfBounds {
                layer,
                cell: *cell,
                size,
            });
        }
    }

    let walls: BTreeSet<CellCoord> = level.walls.iter().copied().collect();
    if let Some(cell) = level.boxes.iter().find(|cell| walls.contains(*cell)) {
        return Err(LevelError::Overlap { cell: *cell });
    }

    let mut boxes = BTreeSet::new();
    if let Some(cell) = level.boxes.iter().find(|cell| !boxes.insert(**cell)) {
        return Err(LevelError::DuplicateBox { cell: *cell });
    }

    for cell in &level.gold {
        let layer = if walls.contains(cell) {
            Layer::Wall
        } else if boxes.contains(cell) {
            Layer::Box
        } else {
            continue;
        };
        return Err(LevelError::GoldBlocked { layer, cell: *cell });
    }

    let marks = level.marks.iter().collect::<BTreeSet<_>>().len();
    if level.expected_filled_marks > marks {
        return Err(LevelError::UnreachableTarget {
            expected: level.expected_filled_marks,
            marks,
        });
    }

    Ok(())
}

pub(crate) const fn within(cell: CellCoord, size: u32) -> bool {
    cell.column() < size && cell.row() < size
}
