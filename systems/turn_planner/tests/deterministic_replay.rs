use pellet_rush_core::{
    CellCoord, Command, Event, MoveOrder, PelletValue, Scores, Side, UnitAttributes, UnitId,
};
use pellet_rush_system_pathfinding::PathFinder;
use pellet_rush_system_turn_planner::TurnPlanner;
use pellet_rush_world::{self as world, query, World};

const ROWS: [&str; 3] = ["     ", " # # ", "     "];
const TURNS: u32 = 20;

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first.remaining.is_empty(), "pellets left: {:?}", first.remaining);
    assert_eq!(first.orders.len(), TURNS as usize);

    let last = first.orders.last().expect("at least one turn");
    assert!(
        last.iter()
            .zip(&first.final_cells)
            .all(|(order, cell)| order.destination == *cell),
        "units should hold once the board is empty: {last:?}"
    );
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    events: Vec<Event>,
    orders: Vec<Vec<MoveOrder>>,
    remaining: Vec<(CellCoord, PelletValue)>,
    final_cells: Vec<CellCoord>,
}

/// Plays a scripted match in which the test acts as referee: owned units step
/// one cell along a shortest path toward their order and eat what they land on.
fn replay() -> ReplayOutcome {
    let mut world = World::new();
    let mut planner = TurnPlanner::default();
    let mut finder = PathFinder::new();
    let mut referee_finder = PathFinder::new();
    let mut log = Vec::new();
    let mut history = Vec::new();

    world::apply(
        &mut world,
        Command::ConfigureMaze {
            width: 5,
            height: 3,
            rows: ROWS.iter().map(|row| (*row).to_owned()).collect(),
        },
        &mut log,
    );

    let mut pellets = vec![
        (CellCoord::new(4, 0), PelletValue::SUPER),
        (CellCoord::new(0, 2), PelletValue::REGULAR),
        (CellCoord::new(2, 2), PelletValue::REGULAR),
        (CellCoord::new(4, 2), PelletValue::REGULAR),
        (CellCoord::new(2, 0), PelletValue::REGULAR),
    ];
    let mut cells = vec![CellCoord::new(0, 0), CellCoord::new(2, 1)];
    let opponent_cell = CellCoord::new(4, 1);
    let mut score = 0;

    for _ in 0..TURNS {
        let mut commands = vec![Command::BeginTurn {
            scores: Scores {
                mine: score,
                opponent: 0,
            },
        }];
        for (id, cell) in (0_u32..).zip(&cells) {
            commands.push(Command::ReportUnit {
                id: UnitId::new(id),
                side: Side::Mine,
                cell: *cell,
                attributes: UnitAttributes::default(),
            });
        }
        commands.push(Command::ReportUnit {
            id: UnitId::new(0),
            side: Side::Opponent,
            cell: opponent_cell,
            attributes: UnitAttributes::default(),
        });
        commands.extend(
            pellets
                .iter()
                .map(|&(cell, value)| Command::ReportPellet { cell, value }),
        );
        for command in commands {
            world::apply(&mut world, command, &mut log);
        }

        let mut planned = Vec::new();
        let mut orders = Vec::new();
        let maze = query::maze(&world).expect("maze configured").clone();
        planner.handle(
            &maze,
            &query::unit_view(&world),
            query::pellets(&world),
            &mut finder,
            &mut planned,
            &mut orders,
        );
        for command in planned {
            world::apply(&mut world, command, &mut log);
        }

        for (cell, order) in cells.iter_mut().zip(&orders) {
            if let Some(path) = referee_finder.find_path(&maze, *cell, order.destination) {
                if let Some(next) = path.cells().get(1) {
                    *cell = *next;
                }
            }
        }
        pellets.retain(|(pellet, value)| {
            let eaten = cells.contains(pellet);
            if eaten {
                score += value.get();
            }
            !eaten
        });

        history.push(orders);
    }

    ReplayOutcome {
        events: log,
        orders: history,
        remaining: pellets,
        final_cells: cells,
    }
}
