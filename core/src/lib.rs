#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pellet Rush agent.
//!
//! This crate defines the message surface that connects the transport
//! adapter, the authoritative world, and pure systems. Adapters submit
//! [`Command`] values describing observed facts, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! confirming what changed. Systems query immutable snapshots and respond
//! exclusively with new command batches and [`MoveOrder`] values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker character that denotes a wall in the maze rows sent at startup.
pub const WALL_MARKER: char = '#';

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Configures the static maze from the startup rows.
    ConfigureMaze {
        /// Number of columns in the maze.
        width: u32,
        /// Number of rows in the maze.
        height: u32,
        /// Row markers, one string per row, `#` for walls.
        rows: Vec<String>,
    },
    /// Opens a new turn and records the current scores.
    BeginTurn {
        /// Scores reported by the referee for this turn.
        scores: Scores,
    },
    /// Reports a unit visible this turn.
    ReportUnit {
        /// Identifier of the unit, unique within its side.
        id: UnitId,
        /// Side that controls the unit.
        side: Side,
        /// Cell the unit currently occupies.
        cell: CellCoord,
        /// Attributes carried through from the referee.
        attributes: UnitAttributes,
    },
    /// Reports a pellet visible this turn.
    ReportPellet {
        /// Cell holding the pellet.
        cell: CellCoord,
        /// Point value of the pellet.
        value: PelletValue,
    },
    /// Marks the pellet at the provided cell as eaten.
    ConsumePelletAt {
        /// Cell whose pellet was eaten.
        cell: CellCoord,
    },
    /// Drops the current commitment of an owned unit.
    ClearTarget {
        /// Owned unit whose target became stale.
        unit: UnitId,
    },
    /// Commits an owned unit to a pellet.
    AssignTarget {
        /// Owned unit receiving the assignment.
        unit: UnitId,
        /// Cell of the pellet the unit commits to.
        target: CellCoord,
        /// Path length, in hops, from the unit to the pellet.
        distance: u32,
    },
    /// Parks an owned unit on its current cell because nothing is left to chase.
    HoldPosition {
        /// Owned unit that holds its position.
        unit: UnitId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the maze topology was built.
    MazeConfigured {
        /// Number of columns in the maze.
        width: u32,
        /// Number of rows in the maze.
        height: u32,
    },
    /// Announces the start of a new turn.
    TurnBegan {
        /// One-based index of the turn.
        turn: u32,
        /// Scores reported for the turn.
        scores: Scores,
    },
    /// Reports that a unit was seen for the first time.
    UnitSighted {
        /// Identifier of the unit.
        unit: UnitId,
        /// Side controlling the unit.
        side: Side,
        /// Cell the unit occupies.
        cell: CellCoord,
    },
    /// Reports that a known unit was updated in place.
    UnitUpdated {
        /// Identifier of the unit.
        unit: UnitId,
        /// Side controlling the unit.
        side: Side,
        /// Cell the unit occupies.
        cell: CellCoord,
    },
    /// Reports that a pellet was seen at a previously unknown cell.
    PelletSighted {
        /// Cell holding the pellet.
        cell: CellCoord,
        /// Point value of the pellet.
        value: PelletValue,
    },
    /// Reports that a known pellet was seen again this turn.
    PelletRefreshed {
        /// Cell holding the pellet.
        cell: CellCoord,
        /// Point value of the pellet.
        value: PelletValue,
    },
    /// Confirms that a live pellet was eaten.
    PelletConsumed {
        /// Cell of the eaten pellet.
        cell: CellCoord,
    },
    /// Confirms that an owned unit dropped its target.
    TargetCleared {
        /// Unit whose target was cleared.
        unit: UnitId,
        /// Target the unit was committed to before clearing.
        previous: CellCoord,
    },
    /// Confirms that an owned unit committed to a pellet.
    TargetAssigned {
        /// Unit receiving the assignment.
        unit: UnitId,
        /// Cell of the pellet.
        target: CellCoord,
        /// Path length, in hops, recorded with the assignment.
        distance: u32,
    },
    /// Confirms that an owned unit holds its current cell.
    PositionHeld {
        /// Unit holding position.
        unit: UnitId,
        /// Cell the unit holds.
        cell: CellCoord,
    },
    /// Reports that a command could not be applied.
    CommandRejected {
        /// Specific reason the command failed.
        reason: RejectionReason,
    },
}

/// Reasons the world refuses to apply a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The command requires a maze but none was configured yet.
    MazeNotConfigured,
    /// The maze rows did not describe a valid rectangular grid.
    InvalidMaze,
    /// The maze was already configured and is immutable for the run.
    MazeAlreadyConfigured,
    /// The command referenced a cell outside the maze.
    CellOutOfBounds,
    /// The command referenced an owned unit that was never reported.
    UnknownUnit,
}

/// Side controlling a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Units steered by this agent.
    Mine,
    /// Units steered by the opponent.
    Opponent,
}

impl Side {
    /// Maps the protocol ownership flag (`1` = mine) onto a side.
    #[must_use]
    pub const fn from_flag(mine: bool) -> Self {
        if mine {
            Self::Mine
        } else {
            Self::Opponent
        }
    }
}

/// Identifier assigned to a unit by the referee, unique within its side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point value carried by a pellet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PelletValue(u32);

impl PelletValue {
    /// Value of an ordinary pellet.
    pub const REGULAR: Self = Self(1);
    /// Value of a super pellet.
    pub const SUPER: Self = Self(10);

    /// Creates a pellet value from the raw point count.
    #[must_use]
    pub const fn new(points: u32) -> Self {
        Self(points)
    }

    /// Raw number of points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Whether the pellet is a super pellet.
    #[must_use]
    pub const fn is_super(&self) -> bool {
        self.0 == Self::SUPER.0
    }
}

/// Scores reported at the start of each turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scores {
    /// Points collected by this agent.
    pub mine: u32,
    /// Points collected by the opponent.
    pub opponent: u32,
}

/// Unit attributes carried through from the referee. Targeting ignores them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitAttributes {
    /// Type tag reported for the unit.
    pub kind: String,
    /// Remaining turns of the speed boost.
    pub speed_turns_left: u32,
    /// Turns until the unit may use an ability again.
    pub ability_cooldown: u32,
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// The protocol calls the column `x` and the row `y`; `(0, 0)` is the top
/// left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// State of a single tracked pellet.
///
/// Pellets have no stable identifier: two entries describe the same pellet
/// exactly when their cells match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PelletState {
    /// Cell holding the pellet.
    pub cell: CellCoord,
    /// Point value of the pellet.
    pub value: PelletValue,
    /// Whether the pellet is considered eaten this turn.
    pub consumed: bool,
    /// Whether an owned unit is committed to the pellet.
    pub targeted: bool,
}

impl PelletState {
    /// Whether the pellet can still be eaten.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !self.consumed
    }

    /// Whether the pellet is live and unclaimed.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !self.consumed && !self.targeted
    }
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Identifier of the unit.
    pub id: UnitId,
    /// Side controlling the unit.
    pub side: Side,
    /// Cell currently occupied by the unit.
    pub cell: CellCoord,
    /// Attributes carried through from the referee.
    pub attributes: UnitAttributes,
    /// Cell the unit is committed to. Equals `cell` when idle.
    pub target: CellCoord,
    /// Cached path length to `target`, if a commitment was recorded.
    pub target_distance: Option<u32>,
}

impl UnitSnapshot {
    /// Whether the unit stands on its target.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.cell == self.target
    }
}

/// Read-only snapshot describing all tracked units.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view, ordering owned units first and by id within a side.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| (snapshot.side, snapshot.id));
        Self { snapshots }
    }

    /// Iterator over all units in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the units controlled by this agent.
    pub fn mine(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.side == Side::Mine)
    }

    /// Iterator over the opposing units.
    pub fn opponents(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.side == Side::Opponent)
    }

    /// Looks up a unit by side and identifier.
    #[must_use]
    pub fn get(&self, side: Side, id: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.side == side && snapshot.id == id)
    }
}

/// Movement request for a single owned unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveOrder {
    /// Unit that should move.
    pub unit: UnitId,
    /// Cell the unit should head toward.
    pub destination: CellCoord,
}

impl fmt::Display for MoveOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MOVE {} {} {}",
            self.unit,
            self.destination.column(),
            self.destination.row()
        )
    }
}
