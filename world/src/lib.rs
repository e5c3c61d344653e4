#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative field state management for Sokoban.

mod hero;
mod level;
mod marks;

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sokoban_core::{
    CellCoord, Command, Direction, Event, LevelDescriptor, LoseCause, PlayerId, WinCause,
};
use tracing::{debug, info, warn};

use hero::{Field, Hero, StepOutcome};
use marks::{BoxLayer, Mark};

pub use level::{Layer, LevelError};

const DEFAULT_RNG_SEED: u64 = 0x5ce4_7a1d_03b9_e6f1;

/// Maximum number of draws spent looking for a free cell.
pub const FREE_CELL_ATTEMPTS: usize = 100;

/// Cell returned by [`World::free_random`] when sampling finds no free cell.
pub const FALLBACK_CELL: CellCoord = CellCoord::new(0, 0);

/// Configuration parameters required to construct a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeding free-cell sampling with `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Seed used for free-cell sampling.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_RNG_SEED)
    }
}

#[derive(Clone, Debug)]
struct Player {
    id: PlayerId,
    hero: Option<Hero>,
}

/// Represents the authoritative Sokoban field state.
#[derive(Clone, Debug)]
pub struct World {
    size: u32,
    walls: BTreeSet<CellCoord>,
    boxes: BoxLayer,
    marks: Vec<Mark>,
    gold: Vec<CellCoord>,
    bombs: BTreeSet<CellCoord>,
    players: Vec<Player>,
    hero_spawn: Option<CellCoord>,
    expected_filled_marks: usize,
    filled_marks: usize,
    boxes_blocked: bool,
    won: bool,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Builds a world from a validated level descriptor.
    pub fn from_level(level: LevelDescriptor, config: Config) -> Result<Self, LevelError> {
        level::validate(&level)?;

        let marks: BTreeSet<CellCoord> = level.marks.into_iter().collect();
        Ok(Self {
            size: level.size,
            walls: level.walls.into_iter().collect(),
            boxes: BoxLayer::from_cells(level.boxes),
            marks: marks.into_iter().map(Mark::new).collect(),
            gold: level.gold,
            bombs: BTreeSet::new(),
            players: Vec::new(),
            hero_spawn: level.hero_spawn,
            expected_filled_marks: level.expected_filled_marks,
            filled_marks: 0,
            boxes_blocked: false,
            won: false,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed()),
            tick_index: 0,
        })
    }

    /// Reports whether the cell blocks movement.
    ///
    /// Cells outside the board, walls, boxes and heroes are barriers.
    #[must_use]
    pub fn is_barrier(&self, cell: CellCoord) -> bool {
        !self.within(cell) || self.is_wall(cell) || self.is_box(cell) || self.is_hero(cell)
    }

    /// Signed variant of [`World::is_barrier`] for probes past the board edge.
    #[must_use]
    pub fn is_barrier_at(&self, x: i64, y: i64) -> bool {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(column), Ok(row)) => self.is_barrier(CellCoord::new(column, row)),
            _ => true,
        }
    }

    /// Reports whether no entity of any kind occupies the in-bounds cell.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.within(cell)
            && !self.is_gold(cell)
            && !self.is_bomb(cell)
            && !self.is_wall(cell)
            && !self.is_box(cell)
            && !self.is_hero(cell)
    }

    /// Reports whether a wall occupies the cell.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.walls.contains(&cell)
    }

    /// Reports whether a box occupies the cell.
    #[must_use]
    pub fn is_box(&self, cell: CellCoord) -> bool {
        self.boxes.contains(cell)
    }

    /// Reports whether a bomb occupies the cell.
    #[must_use]
    pub fn is_bomb(&self, cell: CellCoord) -> bool {
        self.bombs.contains(&cell)
    }

    /// Reports whether a goal mark lies on the cell.
    #[must_use]
    pub fn is_mark(&self, cell: CellCoord) -> bool {
        self.marks.iter().any(|mark| mark.cell() == cell)
    }

    /// Reports whether gold lies on the cell.
    #[must_use]
    pub fn is_gold(&self, cell: CellCoord) -> bool {
        self.gold.contains(&cell)
    }

    /// Reports whether any orthogonal neighbour of the cell is a barrier.
    #[must_use]
    pub fn is_adjacent_to_wall(&self, cell: CellCoord) -> bool {
        Direction::ALL.iter().any(|direction| {
            cell.step(*direction)
                .map_or(true, |neighbour| self.is_barrier(neighbour))
        })
    }

    /// Relocates a box without validating either cell.
    ///
    /// Callers must already have checked that `to` is not a barrier.
    pub fn move_box(&mut self, from: CellCoord, to: CellCoord) {
        self.boxes.relocate(from, to);
    }

    /// Places a bomb on the in-bounds cell, returning `false` if nothing changed.
    pub fn set_bomb(&mut self, cell: CellCoord) -> bool {
        self.within(cell) && self.bombs.insert(cell)
    }

    /// Removes the bomb on the cell, returning `false` if there was none.
    pub fn remove_bomb(&mut self, cell: CellCoord) -> bool {
        self.bombs.remove(&cell)
    }

    /// Samples a free cell, giving up after [`FREE_CELL_ATTEMPTS`] draws.
    pub fn try_free_random(&mut self) -> Option<CellCoord> {
        for _ in 0..FREE_CELL_ATTEMPTS {
            let column = self.rng.gen_range(0..self.size);
            let row = self.rng.gen_range(0..self.size);
            let cell = CellCoord::new(column, row);
            if self.is_free(cell) {
                return Some(cell);
            }
        }
        None
    }

    /// Samples a free cell, returning [`FALLBACK_CELL`] when sampling is exhausted.
    ///
    /// The fallback cell may be occupied. Use [`World::try_free_random`] when
    /// the result must satisfy [`World::is_free`].
    pub fn free_random(&mut self) -> CellCoord {
        self.try_free_random().unwrap_or_else(|| {
            warn!(
                attempts = FREE_CELL_ATTEMPTS,
                "no free cell found, using fallback cell"
            );
            FALLBACK_CELL
        })
    }

    /// Registers the player if needed and spawns a fresh hero for it.
    pub fn new_game(&mut self, player: PlayerId, out_events: &mut Vec<Event>) {
        let slot = match self.players.iter().position(|entry| entry.id == player) {
            Some(slot) => slot,
            None => {
                self.players.push(Player {
                    id: player,
                    hero: None,
                });
                self.players.len() - 1
            }
        };
        self.players[slot].hero = None;

        let spawn = match self.hero_spawn {
            Some(spawn) if !self.is_barrier(spawn) => Some(spawn),
            _ => self.try_free_random(),
        };
        let Some(cell) = spawn else {
            warn!(
                player = player.get(),
                attempts = FREE_CELL_ATTEMPTS,
                "no free cell to spawn hero, player left without a hero"
            );
            return;
        };
        self.players[slot].hero = Some(Hero::spawn(cell));
        debug!(player = player.get(), ?cell, "hero spawned");
        out_events.push(Event::HeroSpawned { player, cell });
    }

    /// Deregisters the player and discards its hero.
    pub fn remove(&mut self, player: PlayerId, out_events: &mut Vec<Event>) {
        let before = self.players.len();
        self.players.retain(|entry| entry.id != player);
        if self.players.len() != before {
            debug!(player = player.get(), "player removed");
            out_events.push(Event::PlayerRemoved { player });
        }
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        self.filled_marks = 0;

        let active = self
            .players
            .first()
            .and_then(|entry| entry.hero.map(|hero| (entry.id, hero)));
        if let Some((player, mut hero)) = active {
            let outcome = hero.tick(self);
            if let Some(entry) = self.players.first_mut() {
                entry.hero = Some(hero);
            }
            report_step(player, hero.cell(), outcome, out_events);
            self.collect_gold(player, hero.cell(), out_events);

            let lose_cause = if !hero.is_alive() {
                Some(LoseCause::HeroDead)
            } else if self.boxes_blocked {
                Some(LoseCause::BoxesBlocked)
            } else {
                None
            };
            if let Some(cause) = lose_cause {
                info!(player = player.get(), ?cause, tick = self.tick_index, "lost");
                out_events.push(Event::Lost { player, cause });
            }
        }

        for mark in &mut self.marks {
            mark.refresh(&self.boxes);
        }
        self.filled_marks = self.marks.iter().filter(|mark| mark.is_filled()).count();

        if self.filled_marks == self.expected_filled_marks {
            self.won = true;
            if let Some((player, _)) = active {
                info!(
                    player = player.get(),
                    filled = self.filled_marks,
                    tick = self.tick_index,
                    "won by filling marks"
                );
                out_events.push(Event::Won {
                    player,
                    cause: WinCause::MarksFilled,
                });
            }
        }
    }

    fn collect_gold(&mut self, player: PlayerId, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(index) = self.gold.iter().position(|gold| *gold == cell) else {
            return;
        };
        let _ = self.gold.remove(index);
        self.won = true;
        info!(player = player.get(), ?cell, tick = self.tick_index, "gold collected");
        out_events.push(Event::Won {
            player,
            cause: WinCause::GoldCollected,
        });

        let respawn = match self.try_free_random() {
            Some(respawn) => respawn,
            None => self.respawn_fallback(cell),
        };
        self.gold.push(respawn);
        out_events.push(Event::GoldRespawned {
            from: cell,
            to: respawn,
        });
    }

    /// Cell used for respawned gold once sampling is exhausted.
    ///
    /// Prefers [`FALLBACK_CELL`] but never returns `avoid` unless the board
    /// has a single cell, so the collecting hero cannot pick the coin up again
    /// without moving.
    fn respawn_fallback(&self, avoid: CellCoord) -> CellCoord {
        let size = self.size;
        let cell = (0..size)
            .flat_map(|row| (0..size).map(move |column| CellCoord::new(column, row)))
            .find(|cell| *cell != avoid)
            .unwrap_or(FALLBACK_CELL);
        warn!(
            attempts = FREE_CELL_ATTEMPTS,
            ?cell,
            "no free cell for gold, using fallback cell"
        );
        cell
    }

    fn hero_mut(&mut self, player: PlayerId) -> Option<&mut Hero> {
        self.players
            .iter_mut()
            .find(|entry| entry.id == player)
            .and_then(|entry| entry.hero.as_mut())
    }

    fn heroes(&self) -> impl Iterator<Item = (PlayerId, &Hero)> {
        self.players
            .iter()
            .filter_map(|entry| entry.hero.as_ref().map(|hero| (entry.id, hero)))
    }

    fn is_hero(&self, cell: CellCoord) -> bool {
        self.heroes().any(|(_, hero)| hero.cell() == cell)
    }

    fn within(&self, cell: CellCoord) -> bool {
        level::within(cell, self.size)
    }
}

fn report_step(
    player: PlayerId,
    cell: CellCoord,
    outcome: StepOutcome,
    out_events: &mut Vec<Event>,
) {
    if let Some(bomb) = outcome.planted {
        out_events.push(Event::BombPlaced { cell: bomb });
    }
    if let Some((from, to)) = outcome.pushed {
        debug!(?from, ?to, "box pushed");
        out_events.push(Event::BoxPushed { from, to });
    }
    if let Some((from, to)) = outcome.moved {
        debug!(player = player.get(), ?from, ?to, "hero moved");
        out_events.push(Event::HeroMoved { player, from, to });
    }
    if outcome.died {
        info!(player = player.get(), ?cell, "hero stepped on a bomb");
        out_events.push(Event::HeroDied { player, cell });
    }
}

impl Field for World {
    fn is_barrier(&self, cell: CellCoord) -> bool {
        World::is_barrier(self, cell)
    }

    fn is_box(&self, cell: CellCoord) -> bool {
        World::is_box(self, cell)
    }

    fn is_bomb(&self, cell: CellCoord) -> bool {
        World::is_bomb(self, cell)
    }

    fn move_box(&mut self, from: CellCoord, to: CellCoord) {
        World::move_box(self, from, to);
    }

    fn set_bomb(&mut self, cell: CellCoord) -> bool {
        World::set_bomb(self, cell)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NewGame { player } => world.new_game(player, out_events),
        Command::RemovePlayer { player } => world.remove(player, out_events),
        Command::SetHeroDirection { player, direction } => {
            if let Some(hero) = world.hero_mut(player) {
                hero.set_direction(direction);
            }
        }
        Command::PlantBomb { player } => {
            if let Some(hero) = world.hero_mut(player) {
                hero.request_bomb();
            }
        }
        Command::KillHero { player } => {
            if let Some(hero) = world.hero_mut(player) {
                let cell = hero.cell();
                if hero.die() {
                    out_events.push(Event::HeroDied { player, cell });
                }
            }
        }
        Command::SetBoxesBlocked { blocked } => {
            world.boxes_blocked = blocked;
        }
        Command::SetBomb { cell } => {
            if world.set_bomb(cell) {
                out_events.push(Event::BombPlaced { cell });
            }
        }
        Command::RemoveBomb { cell } => {
            if world.remove_bomb(cell) {
                out_events.push(Event::BombRemoved { cell });
            }
        }
        Command::Tick => world.tick(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use sokoban_core::{BoardElement, BoardView, CellCoord, ElementKind, HeroSnapshot, PlayerId};

    /// Side length of the board measured in cells.
    #[must_use]
    pub fn size(world: &World) -> u32 {
        world.size
    }

    /// Reports whether any win condition has been reached. Never resets.
    #[must_use]
    pub fn is_won(world: &World) -> bool {
        world.won
    }

    /// Number of marks covered by boxes at the last tick.
    #[must_use]
    pub fn filled_marks(world: &World) -> usize {
        world.filled_marks
    }

    /// Number of simultaneously filled marks the level requires to win.
    #[must_use]
    pub fn expected_filled_marks(world: &World) -> usize {
        world.expected_filled_marks
    }

    /// Reports whether the box layout was flagged as unsolvable.
    #[must_use]
    pub fn boxes_blocked(world: &World) -> bool {
        world.boxes_blocked
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Cells currently holding gold, one entry per coin.
    #[must_use]
    pub fn gold(world: &World) -> &[CellCoord] {
        &world.gold
    }

    /// Players registered with the world in join order.
    #[must_use]
    pub fn players(world: &World) -> Vec<PlayerId> {
        world.players.iter().map(|entry| entry.id).collect()
    }

    /// Captures the state of the player's hero, if it has one.
    #[must_use]
    pub fn hero(world: &World, player: PlayerId) -> Option<HeroSnapshot> {
        heroes(world).into_iter().find(|hero| hero.player == player)
    }

    /// Captures the state of every hero in join order.
    #[must_use]
    pub fn heroes(world: &World) -> Vec<HeroSnapshot> {
        world
            .heroes()
            .map(|(player, hero)| HeroSnapshot {
                player,
                cell: hero.cell(),
                alive: hero.is_alive(),
            })
            .collect()
    }

    /// Captures every entity on the board grouped by category.
    ///
    /// Categories appear in the order walls, heroes, gold, bombs, boxes, marks.
    #[must_use]
    pub fn board(world: &World) -> BoardView {
        let walls = world.walls.iter().map(|cell| (ElementKind::Wall, *cell));
        let heroes = world.heroes().map(|(_, hero)| {
            (
                ElementKind::Hero {
                    alive: hero.is_alive(),
                },
                hero.cell(),
            )
        });
        let gold = world.gold.iter().map(|cell| (ElementKind::Gold, *cell));
        let bombs = world.bombs.iter().map(|cell| (ElementKind::Bomb, *cell));
        let boxes = world.boxes.iter().map(|cell| (ElementKind::Box, cell));
        let marks = world.marks.iter().map(|mark| {
            (
                ElementKind::Mark {
                    filled: mark.is_filled(),
                },
                mark.cell(),
            )
        });

        let elements = walls
            .chain(heroes)
            .chain(gold)
            .chain(bombs)
            .chain(boxes)
            .chain(marks)
            .map(|(kind, cell)| BoardElement { kind, cell })
            .collect();
        BoardView::from_elements(world.size, elements)
    }
}
