#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots and simulates the Maze Chase experience.
//!
//! The adapter runs a headless game: it generates a board, drives the tick
//! loop, routes the villain through the decision engine and renders the
//! final board state as ASCII. The hero stays idle, which makes the run a
//! deterministic showcase of the generator and the opponent AI.

use anyhow::{ensure, Result};
use clap::Parser;
use maze_chase_core::{Command, Difficulty, Event, Grid, GridPos, GridSize, PlayerId, Tile};
use maze_chase_system_decision::{Config, DecisionEngine};
use maze_chase_system_map_generation::{generate, GenerationConfig};
use maze_chase_world::{self as world, query, World};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Command-line options controlling the simulated game.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", about = "Headless Maze Chase simulation")]
struct Args {
    /// Side length of the square board in cells.
    #[arg(long, default_value_t = 21)]
    size: u32,

    /// Seed for board generation and the villain AI. A random seed is drawn
    /// when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Villain step cadence: the villain acts on ticks divisible by this
    /// value, so smaller is harder.
    #[arg(long, default_value_t = 15)]
    difficulty: u32,

    /// Number of ticks to simulate before reporting.
    #[arg(long, default_value_t = 1000)]
    ticks: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(args.size >= 5, "board size must be at least 5 cells");

    let seed = args
        .seed
        .unwrap_or_else(|| ChaCha8Rng::from_entropy().next_u64());

    let layout = generate(&GenerationConfig::new(GridSize::new(args.size), seed));
    let mut world = World::new(layout, Difficulty::new(args.difficulty), seed);
    let mut engine = DecisionEngine::new(Config::new(seed));

    println!("{}", query::welcome_banner(&world));
    println!("seed: {seed:#x}");

    let mut events = Vec::new();
    for _ in 0..args.ticks {
        world::apply(&mut world, Command::Tick, &mut events);
        if query::outcome(&world).is_some() {
            break;
        }
        if query::villain_acts_this_tick(&world) {
            villain_turn(&mut world, &mut engine, &mut events);
        }
    }

    report(&world, &events);
    Ok(())
}

/// Runs one villain turn: hazard first, then the move, then any terminal
/// signal, exactly as a human turn would be applied.
fn villain_turn(world: &mut World, engine: &mut DecisionEngine, events: &mut Vec<Event>) {
    let grid = query::grid(world).clone();
    let villain = query::player_position(world, PlayerId::Villain);
    let hero = query::player_position(world, PlayerId::Hero);
    let decision = engine.step(&grid, villain, hero);

    if decision.drop_hazard {
        world::apply(
            world,
            Command::DropHazard {
                player: PlayerId::Villain,
            },
            events,
        );
    }
    if let Some(direction) = decision.movement {
        world::apply(
            world,
            Command::MovePlayer {
                player: PlayerId::Villain,
                direction,
            },
            events,
        );
    }
    if decision.tokens_exhausted || decision.no_destinations {
        world::apply(world, Command::EndGame, events);
    }
}

fn report(world: &World, events: &[Event]) {
    println!("{}", render_board(query::grid(world)));
    println!(
        "ticks: {}, villain moves: {}",
        query::tick_index(world),
        events
            .iter()
            .filter(|event| matches!(
                event,
                Event::PlayerMoved {
                    player: PlayerId::Villain,
                    ..
                }
            ))
            .count()
    );
    println!(
        "Player: {}, Computer: {}",
        query::player_score(world, PlayerId::Hero),
        query::player_score(world, PlayerId::Villain)
    );
    match query::outcome(world) {
        Some(outcome) => println!("game over: {outcome:?}"),
        None => println!("game still running"),
    }
}

/// Renders the board as one character pair per cell.
fn render_board(grid: &Grid) -> String {
    let mut board = String::new();
    for row in 0..grid.size() {
        for col in 0..grid.size() {
            board.push_str(match grid.tile_at(GridPos::new(row, col)) {
                Tile::Open => "  ",
                Tile::Wall => "X ",
                Tile::Token => "o ",
                Tile::PowerUp(_) => "p ",
                Tile::Hazard => "M ",
                Tile::Villain => "v ",
                Tile::Hero => "h ",
            });
        }
        board.push('\n');
    }
    board
}
