#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Pellet Rush.

mod maze;
mod pellets;
mod units;

pub use maze::{Maze, MazeError};
pub use pellets::{PelletCandidate, PelletTracker};

use log::{debug, trace, warn};
use pellet_rush_core::{CellCoord, Command, Event, RejectionReason, Scores, UnitId};

use self::units::{Sighting, UnitTracker};

/// Number of units and pellets reported during the current turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibleCounts {
    /// Units reported this turn, both sides.
    pub units: u32,
    /// Pellets reported this turn.
    pub pellets: u32,
}

/// Represents the authoritative game state.
///
/// The maze is fixed once configured. Units are only ever added or updated,
/// while pellets are re-derived from visibility at the start of each turn.
#[derive(Debug, Default)]
pub struct World {
    maze: Option<Maze>,
    units: UnitTracker,
    pellets: PelletTracker,
    scores: Scores,
    turn: u32,
    visible: VisibleCounts,
}

impl World {
    /// Creates an empty world awaiting its maze.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn require_cell(&self, cell: CellCoord) -> Result<(), RejectionReason> {
        let maze = self
            .maze
            .as_ref()
            .ok_or(RejectionReason::MazeNotConfigured)?;
        if maze.contains(cell) {
            Ok(())
        } else {
            Err(RejectionReason::CellOutOfBounds)
        }
    }

    fn release_claim(&mut self, previous: CellCoord) {
        if self.pellets.clear_targeted(previous) {
            trace!("released claim on pellet at {previous}");
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if let Err(reason) = apply_inner(world, command, out_events) {
        warn!("command rejected: {reason:?}");
        out_events.push(Event::CommandRejected { reason });
    }
}

fn apply_inner(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), RejectionReason> {
    match command {
        Command::ConfigureMaze {
            width,
            height,
            rows,
        } => {
            if world.maze.is_some() {
                return Err(RejectionReason::MazeAlreadyConfigured);
            }

            let maze = Maze::from_rows(width, height, rows.as_slice()).map_err(|error| {
                warn!("invalid maze: {error}");
                RejectionReason::InvalidMaze
            })?;
            debug!(
                "maze configured: {width}x{height}, {} open cells",
                maze.open_cell_count()
            );
            world.maze = Some(maze);
            out_events.push(Event::MazeConfigured { width, height });
        }
        Command::BeginTurn { scores } => {
            world.turn = world.turn.saturating_add(1);
            world.scores = scores;
            world.visible = VisibleCounts::default();
            world.pellets.reset_visibility();
            out_events.push(Event::TurnBegan {
                turn: world.turn,
                scores,
            });
        }
        Command::ReportUnit {
            id,
            side,
            cell,
            attributes,
        } => {
            world.require_cell(cell)?;
            world.visible.units = world.visible.units.saturating_add(1);
            let event = match world.units.upsert_or_create(id, side, cell, attributes) {
                Sighting::New => Event::UnitSighted {
                    unit: id,
                    side,
                    cell,
                },
                Sighting::Updated => Event::UnitUpdated {
                    unit: id,
                    side,
                    cell,
                },
            };
            out_events.push(event);
        }
        Command::ReportPellet { cell, value } => {
            world.require_cell(cell)?;
            world.visible.pellets = world.visible.pellets.saturating_add(1);
            if world.pellets.upsert(cell, value) {
                out_events.push(Event::PelletSighted { cell, value });
            } else {
                out_events.push(Event::PelletRefreshed { cell, value });
            }
        }
        Command::ConsumePelletAt { cell } => {
            world.require_cell(cell)?;
            if world.pellets.mark_consumed_at(cell) {
                out_events.push(Event::PelletConsumed { cell });
            }
        }
        Command::ClearTarget { unit } => {
            let previous = world
                .units
                .clear_target(unit)
                .ok_or(RejectionReason::UnknownUnit)?;
            world.release_claim(previous);
            out_events.push(Event::TargetCleared { unit, previous });
        }
        Command::AssignTarget {
            unit,
            target,
            distance,
        } => {
            world.require_cell(target)?;
            let previous = world
                .units
                .assign_target(unit, target, distance)
                .ok_or(RejectionReason::UnknownUnit)?;
            if previous != target {
                world.release_claim(previous);
            }
            let _ = world.pellets.mark_targeted(target);
            out_events.push(Event::TargetAssigned {
                unit,
                target,
                distance,
            });
        }
        Command::HoldPosition { unit } => {
            let previous = world
                .units
                .hold_position(unit)
                .ok_or(RejectionReason::UnknownUnit)?;
            let cell = owned_cell(world, unit)?;
            world.release_claim(previous);
            out_events.push(Event::PositionHeld { unit, cell });
        }
    }

    Ok(())
}

fn owned_cell(world: &World, unit: UnitId) -> Result<CellCoord, RejectionReason> {
    world
        .units
        .mine(unit)
        .map(|tracked| tracked.cell())
        .ok_or(RejectionReason::UnknownUnit)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use pellet_rush_core::{CellCoord, Scores, UnitId, UnitView};

    use super::{Maze, PelletTracker, VisibleCounts, World};

    /// Provides read-only access to the maze, once configured.
    #[must_use]
    pub fn maze(world: &World) -> Option<&Maze> {
        world.maze.as_ref()
    }

    /// Provides read-only access to the pellet registry.
    #[must_use]
    pub fn pellets(world: &World) -> &PelletTracker {
        &world.pellets
    }

    /// Captures a read-only view of every tracked unit.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(world.units.iter().map(|unit| unit.snapshot()).collect())
    }

    /// Target currently committed by the owned unit, if the unit is known.
    #[must_use]
    pub fn unit_target(world: &World, unit: UnitId) -> Option<CellCoord> {
        world.units.mine(unit).map(|tracked| tracked.target())
    }

    /// Scores reported at the start of the current turn.
    #[must_use]
    pub fn scores(world: &World) -> Scores {
        world.scores
    }

    /// One-based index of the current turn, zero before the first turn.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turn
    }

    /// Units and pellets reported during the current turn.
    #[must_use]
    pub fn visible_counts(world: &World) -> VisibleCounts {
        world.visible
    }
}
