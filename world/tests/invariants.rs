use std::collections::BTreeSet;

use proptest::prelude::*;
use sokoban_core::{CellCoord, Command, Direction, ElementKind, LevelDescriptor, PlayerId};
use sokoban_world::{self as world, query, Config, World};

const PLAYER: PlayerId = PlayerId::new(1);

#[derive(Clone, Debug)]
enum Input {
    Move(Direction),
    Bomb,
    Idle,
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        6 => prop::sample::select(Direction::ALL.to_vec()).prop_map(Input::Move),
        1 => Just(Input::Bomb),
        1 => Just(Input::Idle),
    ]
}

fn level() -> LevelDescriptor {
    LevelDescriptor {
        size: 6,
        walls: vec![
            CellCoord::new(0, 0),
            CellCoord::new(5, 5),
            CellCoord::new(3, 2),
        ],
        boxes: vec![
            CellCoord::new(2, 2),
            CellCoord::new(2, 3),
            CellCoord::new(4, 3),
        ],
        marks: vec![
            CellCoord::new(1, 2),
            CellCoord::new(2, 4),
            CellCoord::new(4, 4),
        ],
        gold: vec![CellCoord::new(1, 1), CellCoord::new(4, 0)],
        expected_filled_marks: 3,
        hero_spawn: Some(CellCoord::new(1, 3)),
    }
}

fn cells_of(world: &World, matches: impl Fn(ElementKind) -> bool) -> Vec<CellCoord> {
    query::board(world)
        .iter()
        .filter(|element| matches(element.kind))
        .map(|element| element.cell)
        .collect()
}

proptest! {
    #[test]
    fn tick_preserves_field_invariants(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input(), 1..80),
    ) {
        let mut world = World::from_level(level(), Config::new(seed)).expect("level should be valid");
        let mut events = Vec::new();
        world::apply(&mut world, Command::NewGame { player: PLAYER }, &mut events);
        let gold_count = query::gold(&world).len();
        let mut won_before = false;

        for input in inputs {
            match input {
                Input::Move(direction) => world::apply(
                    &mut world,
                    Command::SetHeroDirection { player: PLAYER, direction },
                    &mut events,
                ),
                Input::Bomb => world::apply(&mut world, Command::PlantBomb { player: PLAYER }, &mut events),
                Input::Idle => {}
            }
            world::apply(&mut world, Command::Tick, &mut events);

            let walls = cells_of(&world, |kind| kind == ElementKind::Wall);
            let boxes = cells_of(&world, |kind| kind == ElementKind::Box);
            let heroes = cells_of(&world, |kind| matches!(kind, ElementKind::Hero { .. }));
            let mut occupied = BTreeSet::new();
            for cell in walls.iter().chain(&boxes).chain(&heroes) {
                prop_assert!(occupied.insert(*cell), "cell {:?} holds two barriers", cell);
                prop_assert!(cell.column() < 6 && cell.row() < 6);
            }

            prop_assert_eq!(query::gold(&world).len(), gold_count);

            let covered = level()
                .marks
                .iter()
                .filter(|mark| world.is_box(**mark))
                .count();
            prop_assert_eq!(query::filled_marks(&world), covered);

            let won = query::is_won(&world);
            prop_assert!(won || !won_before, "win latch reset");
            won_before = won;
        }
    }

    #[test]
    fn free_random_terminates_on_any_board(
        seed in any::<u64>(),
        size in 1u32..5,
        density in 0u32..=4,
    ) {
        let walls = (0..size)
            .flat_map(|row| (0..size).map(move |column| CellCoord::new(column, row)))
            .filter(|cell| (cell.column() + cell.row()) % 4 < density)
            .collect();
        let mut world = World::from_level(
            LevelDescriptor { size, walls, ..LevelDescriptor::default() },
            Config::new(seed),
        )
        .expect("level should be valid");

        if let Some(cell) = world.try_free_random() {
            prop_assert!(world.is_free(cell));
        }
        let cell = world.free_random();
        prop_assert!(cell.column() < size && cell.row() < size);
    }
}
