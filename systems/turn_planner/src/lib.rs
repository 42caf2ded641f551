#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that reconciles pellet state and assigns pellet targets to
//! owned units once per turn.
//!
//! The planner never mutates the world. It replays every decision against a
//! private copy of the pellet registry, so later units observe the claims of
//! earlier ones, and reports those decisions as a [`Command`] batch for the
//! caller to apply after planning finishes.

use log::debug;
use pellet_rush_core::{CellCoord, Command, MoveOrder, PelletValue, UnitSnapshot, UnitView};
use pellet_rush_system_pathfinding::PathFinder;
use pellet_rush_world::{Maze, PelletCandidate, PelletTracker};

/// Pellet values the planner treats as its two priority tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Value of the pellets chased first.
    pub super_value: PelletValue,
    /// Value of the pellets chased when no super pellet is available.
    pub regular_value: PelletValue,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            super_value: PelletValue::SUPER,
            regular_value: PelletValue::REGULAR,
        }
    }
}

/// Turn planner that reuses its pellet ledger between turns.
#[derive(Debug, Default)]
pub struct TurnPlanner {
    config: PlannerConfig,
    ledger: PelletTracker,
}

impl TurnPlanner {
    /// Creates a planner using the provided pellet tiers.
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            ledger: PelletTracker::default(),
        }
    }

    /// Pellet tiers used by the planner.
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans the current turn.
    ///
    /// `commands` receives the state transitions to apply to the world, in
    /// order. `orders` receives exactly one move order per owned unit. Both
    /// buffers are cleared first.
    pub fn handle(
        &mut self,
        maze: &Maze,
        units: &UnitView,
        pellets: &PelletTracker,
        pathfinder: &mut PathFinder,
        commands: &mut Vec<Command>,
        orders: &mut Vec<MoveOrder>,
    ) {
        commands.clear();
        orders.clear();
        self.ledger.clone_from(pellets);

        self.reconcile_consumption(units.iter(), commands);

        for unit in units.mine() {
            let destination = self.plan_unit(maze, unit, pathfinder, commands);
            orders.push(MoveOrder {
                unit: unit.id,
                destination,
            });
        }
    }

    /// Every unit, owned or not, eats the pellet it stands on.
    fn reconcile_consumption<'a>(
        &mut self,
        units: impl Iterator<Item = &'a UnitSnapshot>,
        commands: &mut Vec<Command>,
    ) {
        for unit in units {
            if self.ledger.mark_consumed_at(unit.cell) {
                debug!("pellet at {} eaten by {:?} unit {}", unit.cell, unit.side, unit.id);
                commands.push(Command::ConsumePelletAt { cell: unit.cell });
            }
        }
    }

    fn plan_unit(
        &mut self,
        maze: &Maze,
        unit: &UnitSnapshot,
        pathfinder: &mut PathFinder,
        commands: &mut Vec<Command>,
    ) -> CellCoord {
        let mut target = unit.target;

        if self.ledger.live_at(target).is_none() {
            let _ = self.ledger.clear_targeted(target);
            if target != unit.cell {
                debug!("unit {} drops stale target {target}", unit.id);
                commands.push(Command::ClearTarget { unit: unit.id });
            }
            target = unit.cell;
        }

        if target != unit.cell {
            return target;
        }

        match self.select_pellet(maze, unit.cell, pathfinder) {
            Some(candidate) => {
                if unit.target != candidate.cell {
                    let _ = self.ledger.clear_targeted(unit.target);
                }
                let _ = self.ledger.mark_targeted(candidate.cell);
                debug!(
                    "unit {} commits to pellet {} worth {} at {} hops",
                    unit.id,
                    candidate.cell,
                    candidate.value.get(),
                    candidate.distance
                );
                commands.push(Command::AssignTarget {
                    unit: unit.id,
                    target: candidate.cell,
                    distance: candidate.distance,
                });
                candidate.cell
            }
            None => {
                let _ = self.ledger.clear_targeted(unit.target);
                debug!("unit {} holds {}: no pellet available", unit.id, unit.cell);
                commands.push(Command::HoldPosition { unit: unit.id });
                unit.cell
            }
        }
    }

    fn select_pellet(
        &self,
        maze: &Maze,
        from: CellCoord,
        pathfinder: &mut PathFinder,
    ) -> Option<PelletCandidate> {
        let PlannerConfig {
            super_value,
            regular_value,
        } = self.config;

        self.ledger
            .closest_available(
                from,
                |value| value == super_value,
                |start, goal| pathfinder.distance(maze, start, goal),
            )
            .or_else(|| {
                self.ledger.closest_available(
                    from,
                    |value| value == regular_value,
                    |start, goal| pathfinder.distance(maze, start, goal),
                )
            })
    }
}
