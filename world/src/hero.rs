//! Hero movement, box pushing and hazard contact.

use sokoban_core::{CellCoord, Direction};

/// Placement and occupancy operations the hero relies on while stepping.
pub(crate) trait Field {
    /// Reports whether the cell blocks movement.
    fn is_barrier(&self, cell: CellCoord) -> bool;

    /// Reports whether a box occupies the cell.
    fn is_box(&self, cell: CellCoord) -> bool;

    /// Reports whether a bomb occupies the cell.
    fn is_bomb(&self, cell: CellCoord) -> bool;

    /// Relocates a box; callers validate the destination beforehand.
    fn move_box(&mut self, from: CellCoord, to: CellCoord);

    /// Places a bomb, returning `false` when one already occupies the cell.
    fn set_bomb(&mut self, cell: CellCoord) -> bool;
}

/// Changes produced by a single hero step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct StepOutcome {
    pub(crate) planted: Option<CellCoord>,
    pub(crate) pushed: Option<(CellCoord, CellCoord)>,
    pub(crate) moved: Option<(CellCoord, CellCoord)>,
    pub(crate) died: bool,
}

/// Avatar controlled by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Hero {
    cell: CellCoord,
    alive: bool,
    direction: Option<Direction>,
    bomb_requested: bool,
}

impl Hero {
    pub(crate) const fn spawn(cell: CellCoord) -> Self {
        Self {
            cell,
            alive: true,
            direction: None,
            bomb_requested: false,
        }
    }

    pub(crate) const fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Records the direction consumed by the next step.
    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = Some(direction);
    }

    pub(crate) fn request_bomb(&mut self) {
        self.bomb_requested = true;
    }

    /// Marks the hero dead, returning `true` if it was alive before.
    pub(crate) fn die(&mut self) -> bool {
        let was_alive = self.alive;
        self.alive = false;
        was_alive
    }

    /// Consumes pending intents and performs at most one step.
    ///
    /// A box in the way is pushed only when the cell beyond it is not a
    /// barrier; otherwise neither the box nor the hero moves. Entering a cell
    /// that holds a bomb kills the hero.
    pub(crate) fn tick<F: Field>(&mut self, field: &mut F) -> StepOutcome {
        let direction = self.direction.take();
        let plant = std::mem::take(&mut self.bomb_requested);
        let mut outcome = StepOutcome::default();

        if !self.alive {
            return outcome;
        }

        if plant && field.set_bomb(self.cell) {
            outcome.planted = Some(self.cell);
        }

        let Some(direction) = direction else {
            return outcome;
        };
        let Some(next) = self.cell.step(direction) else {
            return outcome;
        };

        if field.is_box(next) {
            let Some(beyond) = next.step(direction) else {
                return outcome;
            };
            if field.is_barrier(beyond) {
                return outcome;
            }
            field.move_box(next, beyond);
            outcome.pushed = Some((next, beyond));
        } else if field.is_barrier(next) {
            return outcome;
        }

        outcome.moved = Some((self.cell, next));
        self.cell = next;

        if field.is_bomb(next) {
            self.alive = false;
            outcome.died = true;
        }

        outcome
    }
}
