use sokoban_core::{BoardView, CellCoord, Command, Direction, Event, LevelDescriptor, PlayerId};
use sokoban_world::{self as world, query, Config, World};

const PLAYER: PlayerId = PlayerId::new(3);

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    board: BoardView,
    won: bool,
}

fn level() -> LevelDescriptor {
    LevelDescriptor {
        size: 6,
        walls: vec![CellCoord::new(3, 3), CellCoord::new(4, 1)],
        boxes: vec![CellCoord::new(2, 2)],
        marks: vec![CellCoord::new(2, 4)],
        gold: vec![
            CellCoord::new(1, 0),
            CellCoord::new(2, 0),
            CellCoord::new(3, 0),
        ],
        expected_filled_marks: 1,
        hero_spawn: None,
    }
}

fn script() -> Vec<Command> {
    let mut commands = vec![Command::NewGame { player: PLAYER }];
    let moves = [
        Direction::East,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
        Direction::East,
        Direction::East,
        Direction::South,
        Direction::South,
    ];
    for direction in moves {
        commands.push(Command::SetHeroDirection {
            player: PLAYER,
            direction,
        });
        commands.push(Command::Tick);
    }
    commands
}

fn replay(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::from_level(level(), Config::new(seed)).expect("level should be valid");
    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    ReplayOutcome {
        events,
        board: query::board(&world),
        won: query::is_won(&world),
    }
}

#[test]
fn replay_with_same_seed_is_identical() {
    let first = replay(0xfeed, script());
    let second = replay(0xfeed, script());

    assert_eq!(first, second, "replay diverged");
    assert!(first
        .events
        .iter()
        .any(|event| matches!(event, Event::HeroSpawned { .. })));
}

#[test]
fn replay_keeps_gold_count() {
    let outcome = replay(0xbeef, script());
    let gold = outcome
        .board
        .iter()
        .filter(|element| element.kind == sokoban_core::ElementKind::Gold)
        .count();

    assert_eq!(gold, 3);
}
