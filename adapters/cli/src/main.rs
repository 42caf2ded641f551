#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Pellet Rush against the referee over
//! stdin and stdout.

mod config;
mod protocol;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info, trace, warn};
use pellet_rush_core::{Command, Event};
use pellet_rush_system_pathfinding::PathFinder;
use pellet_rush_system_turn_planner::TurnPlanner;
use pellet_rush_world::{self as world, query, World};

use crate::{
    config::AgentConfig,
    protocol::{format_orders, LineReader},
};

/// Pellet-chasing agent speaking the referee line protocol.
#[derive(Debug, Parser)]
#[command(name = "pellet-rush", version, about, long_about = None)]
struct Args {
    /// Optional TOML file with planner tiers and the turn budget.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter for stderr output, overridden by `RUST_LOG`.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_level: String,
}

/// Entry point for the Pellet Rush command-line agent.
fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level.as_str()),
    )
    .target(env_logger::Target::Stderr)
    .init();

    let config = match &args.config {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    };
    debug!("configuration: {config:?}");

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(stdin.lock(), stdout.lock(), &config)
}

/// Plays turns until the referee closes the input stream.
fn run<R: BufRead, W: Write>(input: R, mut output: W, config: &AgentConfig) -> Result<()> {
    let mut reader = LineReader::new(input);
    let mut world = World::new();
    let mut events = Vec::new();

    let header = reader
        .read_maze_header()
        .context("failed to read maze header")?;
    apply_all(&mut world, [header.into_command()], &mut events);
    match query::maze(&world) {
        Some(maze) => info!(
            "maze ready: {}x{}, {} open cells",
            maze.width(),
            maze.height(),
            maze.open_cell_count()
        ),
        None => bail!("referee sent a maze that could not be built"),
    }

    let mut planner = TurnPlanner::new(config.planner());
    let mut pathfinder = PathFinder::new();
    let mut planned = Vec::new();
    let mut orders = Vec::new();
    let budget = config.turn_budget();

    while let Some(turn) = reader.read_turn().context("failed to read turn input")? {
        let started = Instant::now();
        apply_all(&mut world, turn.into_commands(), &mut events);

        let maze = query::maze(&world).context("maze vanished after configuration")?;
        planner.handle(
            maze,
            &query::unit_view(&world),
            query::pellets(&world),
            &mut pathfinder,
            &mut planned,
            &mut orders,
        );
        apply_all(&mut world, planned.drain(..), &mut events);

        let turn = query::turn(&world);
        if orders.is_empty() {
            warn!("turn {turn}: no owned units reported, sending an empty line");
        }
        writeln!(output, "{}", format_orders(&orders)).context("failed to write orders")?;
        output.flush().context("failed to flush orders")?;

        let elapsed = started.elapsed();
        let visible = query::visible_counts(&world);
        debug!(
            "turn {turn} took {elapsed:?} with {} units and {} pellets visible",
            visible.units, visible.pellets
        );
        if elapsed > budget {
            warn!("turn {turn} took {elapsed:?}, over the {budget:?} budget");
        }
    }

    info!("referee closed input after {} turns", query::turn(&world));
    Ok(())
}

fn apply_all(
    world: &mut World,
    commands: impl IntoIterator<Item = Command>,
    events: &mut Vec<Event>,
) {
    events.clear();
    for command in commands {
        world::apply(world, command, events);
    }
    for event in events.iter() {
        trace!("{event:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(input: &str) -> Result<String> {
        let mut output = Vec::new();
        run(input.as_bytes(), &mut output, &AgentConfig::default())?;
        Ok(String::from_utf8(output).expect("orders are utf-8"))
    }

    #[test]
    fn plays_until_input_closes() {
        let input = "3 3\n   \n   \n   \n\
                     0 0\n1\n0 1 0 0 ROCK 0 0\n2\n2 2 10\n1 0 1\n\
                     0 0\n1\n0 1 1 0 ROCK 0 0\n1\n2 2 10\n";

        let output = play(input).expect("game runs to completion");

        assert_eq!(output, "MOVE 0 2 2\nMOVE 0 2 2\n");
    }

    #[test]
    fn stranded_unit_holds_position() {
        let input = "3 1\n # \n0 0\n1\n0 1 0 0 ROCK 0 0\n1\n2 0 10\n";

        let output = play(input).expect("game runs to completion");

        assert_eq!(output, "MOVE 0 0 0\n");
    }

    #[test]
    fn malformed_maze_aborts() {
        let error = play("3 1\n #\n").expect_err("row is too short");

        assert!(error.to_string().contains("could not be built"), "{error}");
    }

    #[test]
    fn truncated_turn_aborts_with_context() {
        let error = play("1 1\n \n0 0\n2\n0 1 0 0 ROCK 0 0\n").expect_err("second unit missing");

        assert_eq!(error.to_string(), "failed to read turn input");
        assert!(format!("{error:#}").contains("unit line"));
    }
}
