#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a Sokoban field from a move script.

mod script;

use anyhow::{Context, Result};
use clap::Parser;
use sokoban_core::{CellCoord, Command, Event, LevelDescriptor, PlayerId};
use sokoban_world::{self as world, query, Config, World};
use tracing::info;

const PLAYER: PlayerId = PlayerId::new(1);

/// Command-line arguments accepted by the driver.
#[derive(Debug, Parser)]
#[command(name = "sokoban", about = "Runs a scripted Sokoban session")]
struct Args {
    /// Seed for free-cell sampling.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Moves applied one per tick: U, D, L, R, B (bomb) or . (wait).
    #[arg(long, default_value = "URRDDLLUR")]
    moves: String,
    /// Print the final board without indentation.
    #[arg(long)]
    compact: bool,
}

/// Entry point for the Sokoban command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let steps = script::parse(&args.moves).context("invalid move script")?;

    let mut world =
        World::from_level(demo_level(), Config::new(args.seed)).context("invalid demo level")?;
    let mut events = Vec::new();
    world::apply(&mut world, Command::NewGame { player: PLAYER }, &mut events);

    for step in steps {
        for command in step.commands(PLAYER) {
            world::apply(&mut world, command, &mut events);
        }
        world::apply(&mut world, Command::Tick, &mut events);
        for event in events.drain(..) {
            report(query::tick_index(&world), &event);
        }
    }

    let board = query::board(&world);
    let rendered = if args.compact {
        serde_json::to_string(&board)
    } else {
        serde_json::to_string_pretty(&board)
    }
    .context("failed to serialize board")?;
    println!("{rendered}");
    info!(
        won = query::is_won(&world),
        filled = query::filled_marks(&world),
        expected = query::expected_filled_marks(&world),
        "session finished"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn report(tick: u64, event: &Event) {
    match event {
        Event::Won { cause, .. } => println!("tick {tick}: WIN ({cause:?})"),
        Event::Lost { cause, .. } => println!("tick {tick}: LOSE ({cause:?})"),
        other => info!(tick, ?other, "event"),
    }
}

/// Small walled room with two boxes, two marks and one coin.
fn demo_level() -> LevelDescriptor {
    let size = 7;
    let mut walls = Vec::new();
    for index in 0..size {
        walls.extend([
            CellCoord::new(index, 0),
            CellCoord::new(index, size - 1),
            CellCoord::new(0, index),
            CellCoord::new(size - 1, index),
        ]);
    }
    walls.sort();
    walls.dedup();

    LevelDescriptor {
        size,
        walls,
        boxes: vec![CellCoord::new(2, 2), CellCoord::new(3, 3)],
        marks: vec![CellCoord::new(3, 2), CellCoord::new(3, 4)],
        gold: vec![CellCoord::new(5, 5)],
        expected_filled_marks: 2,
        hero_spawn: Some(CellCoord::new(1, 2)),
    }
}
