#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sokoban engine.
//!
//! This crate defines the message surface that connects drivers and the
//! authoritative field simulation. Drivers submit [`Command`] values
//! describing player intents and external signals, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values for
//! scoring and session layers to react to. Read-only consumers observe the
//! board through a [`BoardView`] snapshot.

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Registers the player if needed and spawns a fresh hero for it.
    NewGame {
        /// Player joining the field.
        player: PlayerId,
    },
    /// Deregisters a player and discards its hero.
    RemovePlayer {
        /// Player leaving the field.
        player: PlayerId,
    },
    /// Records the direction the player's hero should step on the next tick.
    SetHeroDirection {
        /// Player controlling the hero.
        player: PlayerId,
        /// Direction of travel for the next step.
        direction: Direction,
    },
    /// Requests that the player's hero drops a bomb on its cell next tick.
    PlantBomb {
        /// Player controlling the hero.
        player: PlayerId,
    },
    /// External hazard signal that kills the player's hero.
    KillHero {
        /// Player whose hero is struck.
        player: PlayerId,
    },
    /// Updates the externally determined "boxes are stuck" flag.
    SetBoxesBlocked {
        /// Whether the current box layout can no longer be solved.
        blocked: bool,
    },
    /// Places a bomb on the provided cell unless one is already there.
    SetBomb {
        /// Cell receiving the bomb.
        cell: CellCoord,
    },
    /// Removes the bomb from the provided cell, if any.
    RemoveBomb {
        /// Cell to clear.
        cell: CellCoord,
    },
    /// Advances the simulation by one discrete step.
    Tick,
}

/// Events reported by the world after processing commands.
///
/// `Won` and `Lost` are the semantic signals consumed by scoring. Every other
/// variant confirms a state change for observers that mirror the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Announces that a player achieved a win condition during a tick.
    Won {
        /// Player the signal is addressed to.
        player: PlayerId,
        /// Condition that produced the win.
        cause: WinCause,
    },
    /// Announces that a player is in a losing state during a tick.
    Lost {
        /// Player the signal is addressed to.
        player: PlayerId,
        /// Condition that produced the loss.
        cause: LoseCause,
    },
    /// Confirms that a hero was spawned for a player.
    HeroSpawned {
        /// Owner of the hero.
        player: PlayerId,
        /// Cell the hero occupies after spawning.
        cell: CellCoord,
    },
    /// Confirms that a hero stepped between two cells.
    HeroMoved {
        /// Owner of the hero.
        player: PlayerId,
        /// Cell the hero occupied before moving.
        from: CellCoord,
        /// Cell the hero occupies after moving.
        to: CellCoord,
    },
    /// Confirms that a box was pushed between two cells.
    BoxPushed {
        /// Cell the box occupied before the push.
        from: CellCoord,
        /// Cell the box occupies after the push.
        to: CellCoord,
    },
    /// Confirms that a bomb now occupies a cell.
    BombPlaced {
        /// Cell holding the bomb.
        cell: CellCoord,
    },
    /// Confirms that a bomb was cleared from a cell.
    BombRemoved {
        /// Cell that held the bomb.
        cell: CellCoord,
    },
    /// Confirms that collected gold reappeared on the board.
    GoldRespawned {
        /// Cell the gold was collected from.
        from: CellCoord,
        /// Cell holding the replacement gold.
        to: CellCoord,
    },
    /// Confirms that a hero stopped being alive.
    HeroDied {
        /// Owner of the hero.
        player: PlayerId,
        /// Cell where the hero died.
        cell: CellCoord,
    },
    /// Confirms that a player left the field.
    PlayerRemoved {
        /// Player that was deregistered.
        player: PlayerId,
    },
}

/// Conditions that produce a [`Event::Won`] signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinCause {
    /// The hero picked up a gold coin.
    GoldCollected,
    /// The number of marks covered by boxes reached the level target.
    MarksFilled,
}

/// Conditions that produce a [`Event::Lost`] signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoseCause {
    /// The hero is no longer alive.
    HeroDead,
    /// The box layout was flagged as unsolvable.
    BoxesBlocked,
}

/// Unique identifier assigned to a participant by the session layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Cardinal movement directions available to the hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// Location of a single board cell expressed as column and row coordinates.
///
/// The column is the horizontal `x` axis and the row the vertical `y` axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring cell one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// The upper bound depends on the board and is checked by the world.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };
        Some(CellCoord::new(column?, row?))
    }
}

/// Capability to ask whether a box currently sits on a cell.
///
/// Marks depend on this narrow view instead of the whole field so they cannot
/// mutate unrelated state while refreshing.
pub trait BoxOccupancy {
    /// Reports whether a box occupies the provided cell.
    fn has_box(&self, cell: CellCoord) -> bool;
}

/// In-memory contract describing a level before simulation starts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Side length of the square board measured in cells.
    pub size: u32,
    /// Cells holding impassable walls.
    pub walls: Vec<CellCoord>,
    /// Cells holding pushable boxes.
    pub boxes: Vec<CellCoord>,
    /// Goal cells that must be covered by boxes.
    pub marks: Vec<CellCoord>,
    /// Cells holding collectible gold.
    pub gold: Vec<CellCoord>,
    /// Number of simultaneously filled marks required to win.
    pub expected_filled_marks: usize,
    /// Preferred spawn cell for heroes; a free cell is sampled when absent.
    pub hero_spawn: Option<CellCoord>,
}

/// Immutable representation of a single hero's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroSnapshot {
    /// Player controlling the hero.
    pub player: PlayerId,
    /// Cell currently occupied by the hero.
    pub cell: CellCoord,
    /// Whether the hero survived every hazard so far.
    pub alive: bool,
}

/// Category of entity reported in a [`BoardView`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Static impassable cell.
    Wall,
    /// Player avatar.
    Hero {
        /// Whether the hero is still alive.
        alive: bool,
    },
    /// Collectible bonus.
    Gold,
    /// Placed hazard.
    Bomb,
    /// Pushable obstacle.
    Box,
    /// Goal cell.
    Mark {
        /// Whether a box covered the mark at the last tick.
        filled: bool,
    },
}

/// Single entity position captured in a [`BoardView`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardElement {
    /// Category of the entity.
    pub kind: ElementKind,
    /// Cell occupied by the entity.
    pub cell: CellCoord,
}

/// Read-only snapshot of every entity on the board.
///
/// Elements are grouped by category in a fixed order: walls, heroes, gold,
/// bombs, boxes, marks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    size: u32,
    elements: Vec<BoardElement>,
}

impl BoardView {
    /// Creates a new board view from already ordered elements.
    #[must_use]
    pub fn from_elements(size: u32, elements: Vec<BoardElement>) -> Self {
        Self { size, elements }
    }

    /// Side length of the board measured in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Iterator over the captured elements in category order.
    pub fn iter(&self) -> impl Iterator<Item = &BoardElement> {
        self.elements.iter()
    }
}
