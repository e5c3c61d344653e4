//! Parsing of move scripts into per-tick player inputs.

use anyhow::{bail, Result};
use sokoban_core::{Command, Direction, PlayerId};

/// Input applied to the hero before a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Move(Direction),
    Bomb,
    Wait,
}

impl Step {
    /// Commands that queue this input for the player's hero.
    pub(crate) fn commands(self, player: PlayerId) -> Vec<Command> {
        match self {
            Self::Move(direction) => vec![Command::SetHeroDirection { player, direction }],
            Self::Bomb => vec![Command::PlantBomb { player }],
            Self::Wait => Vec::new(),
        }
    }
}

/// Parses a script such as `RRD.BL` into steps, one per tick.
///
/// `U`, `D`, `L`, `R` move, `B` plants a bomb and `.` waits. Whitespace is
/// ignored and letters are case-insensitive.
pub(crate) fn parse(script: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, symbol) in script.chars().enumerate() {
        let step = match symbol.to_ascii_uppercase() {
            'U' => Step::Move(Direction::North),
            'D' => Step::Move(Direction::South),
            'L' => Step::Move(Direction::West),
            'R' => Step::Move(Direction::East),
            'B' => Step::Bomb,
            '.' => Step::Wait,
            other if other.is_whitespace() => continue,
            other => bail!("unexpected move {other:?} at position {index}"),
        };
        steps.push(step);
    }
    Ok(steps)
}
