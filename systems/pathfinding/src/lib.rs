#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! A* shortest-path search over the static maze.
//!
//! The maze is never mutated by a search. All per-search bookkeeping (cost
//! from start, predecessor, closed flag) lives in a scratch array owned by
//! the [`PathFinder`] and indexed by the maze's row-major cell offset. The
//! scratch is invalidated between searches by bumping a generation stamp, so
//! no state leaks from one search into the next.

use std::{cmp::Ordering, collections::BinaryHeap};

use log::trace;
use pellet_rush_core::CellCoord;
use pellet_rush_world::Maze;

/// Ordered cells from start to goal, both inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Cells visited along the path, starting with the start cell.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of moves needed to walk the path.
    #[must_use]
    pub fn hops(&self) -> u32 {
        u32::try_from(self.cells.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// First cell of the path.
    #[must_use]
    pub fn start(&self) -> Option<CellCoord> {
        self.cells.first().copied()
    }

    /// Last cell of the path.
    #[must_use]
    pub fn goal(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Consumes the path, yielding its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<CellCoord> {
        self.cells
    }
}

/// Reusable A* search engine.
///
/// Uses Manhattan distance as the heuristic, which is admissible and
/// consistent on a 4-connected grid with unit edge costs. Among open entries
/// with equal `f`, the deeper entry (higher `g`) is expanded first, then the
/// lower row-major cell offset.
#[derive(Debug, Default)]
pub struct PathFinder {
    nodes: Vec<SearchNode>,
    generation: u32,
    open: BinaryHeap<OpenEntry>,
}

impl PathFinder {
    /// Creates a path finder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes a shortest path between two open cells.
    ///
    /// Returns `None` when either endpoint is a wall or outside the maze, or
    /// when the goal lies in a region disconnected from the start.
    pub fn find_path(&mut self, maze: &Maze, start: CellCoord, goal: CellCoord) -> Option<Path> {
        let goal_index = self.search(maze, start, goal)?;

        let mut cells = Vec::with_capacity(self.nodes[goal_index].g as usize + 1);
        let mut cursor = Some(goal_index);
        while let Some(index) = cursor {
            cells.push(maze.cell_at(index)?);
            cursor = self.nodes[index].parent;
        }
        cells.reverse();

        Some(Path { cells })
    }

    /// Length in hops of a shortest path between two open cells.
    ///
    /// Shares the failure cases of [`PathFinder::find_path`] without
    /// materialising the path.
    pub fn distance(&mut self, maze: &Maze, start: CellCoord, goal: CellCoord) -> Option<u32> {
        let goal_index = self.search(maze, start, goal)?;
        Some(self.nodes[goal_index].g)
    }

    fn search(&mut self, maze: &Maze, start: CellCoord, goal: CellCoord) -> Option<usize> {
        if maze.is_wall(start) || maze.is_wall(goal) {
            trace!("no search from {start} to {goal}: endpoint blocked");
            return None;
        }

        let start_index = maze.index(start)?;
        let goal_index = maze.index(goal)?;

        self.begin_search(maze.cell_count());
        {
            let node = self.node_mut(start_index);
            node.g = 0;
            node.parent = None;
        }
        self.open.push(OpenEntry {
            f: start.manhattan_distance(goal),
            g: 0,
            index: start_index,
        });

        let mut expanded = 0_usize;
        while let Some(entry) = self.open.pop() {
            let node = self.node_mut(entry.index);
            if node.closed || entry.g != node.g {
                continue;
            }

            if entry.index == goal_index {
                trace!("path {start} -> {goal}: {} hops, {expanded} expanded", entry.g);
                return Some(goal_index);
            }

            node.closed = true;
            expanded += 1;

            let Some(current) = maze.cell_at(entry.index) else {
                continue;
            };
            let next_g = entry.g + 1;

            for &neighbor in maze.neighbors(current) {
                if maze.is_wall(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = maze.index(neighbor) else {
                    continue;
                };

                let node = self.node_mut(neighbor_index);
                if node.closed || node.g <= next_g {
                    continue;
                }

                node.g = next_g;
                node.parent = Some(entry.index);
                self.open.push(OpenEntry {
                    f: next_g + neighbor.manhattan_distance(goal),
                    g: next_g,
                    index: neighbor_index,
                });
            }
        }

        trace!("no path {start} -> {goal} after expanding {expanded} cells");
        None
    }

    fn begin_search(&mut self, cell_count: usize) {
        self.open.clear();

        if self.nodes.len() != cell_count {
            self.nodes.clear();
            self.nodes.resize(cell_count, SearchNode::default());
        }

        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.nodes.fill(SearchNode::default());
            self.generation = 1;
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut SearchNode {
        let generation = self.generation;
        let node = &mut self.nodes[index];
        if node.generation != generation {
            *node = SearchNode {
                generation,
                ..SearchNode::default()
            };
        }
        node
    }
}

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    generation: u32,
    g: u32,
    parent: Option<usize>,
    closed: bool,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            generation: 0,
            g: u32::MAX,
            parent: None,
            closed: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    g: u32,
    index: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(width: u32, height: u32) -> Maze {
        let rows: Vec<String> = (0..height).map(|_| " ".repeat(width as usize)).collect();
        Maze::from_rows(width, height, rows.as_slice()).expect("valid maze")
    }

    #[test]
    fn open_grid_distance_is_manhattan() {
        let maze = open_grid(6, 5);
        let mut finder = PathFinder::new();

        for row in 0..5 {
            for column in 0..6 {
                let goal = CellCoord::new(column, row);
                assert_eq!(
                    finder.distance(&maze, CellCoord::new(0, 0), goal),
                    Some(column + row),
                    "distance to {goal}"
                );
            }
        }
    }

    #[test]
    fn path_includes_both_endpoints_and_steps_orthogonally() {
        let maze = open_grid(4, 4);
        let mut finder = PathFinder::new();

        let path = finder
            .find_path(&maze, CellCoord::new(0, 0), CellCoord::new(3, 2))
            .expect("open grid is connected");

        assert_eq!(path.start(), Some(CellCoord::new(0, 0)));
        assert_eq!(path.goal(), Some(CellCoord::new(3, 2)));
        assert_eq!(path.hops(), 5);
        assert_eq!(path.cells().len(), 6);
        for pair in path.cells().windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
    }

    #[test]
    fn start_equal_to_goal_yields_single_cell() {
        let maze = open_grid(3, 3);
        let mut finder = PathFinder::new();
        let cell = CellCoord::new(1, 1);

        let path = finder.find_path(&maze, cell, cell).expect("trivial path");

        assert_eq!(path.into_cells(), vec![cell]);
    }

    #[test]
    fn walled_endpoints_have_no_path() {
        let maze = Maze::from_rows(3, 1, &[" # "]).expect("valid maze");
        let mut finder = PathFinder::new();

        assert_eq!(
            finder.distance(&maze, CellCoord::new(0, 0), CellCoord::new(1, 0)),
            None
        );
        assert_eq!(
            finder.distance(&maze, CellCoord::new(1, 0), CellCoord::new(2, 0)),
            None
        );
        assert_eq!(
            finder.distance(&maze, CellCoord::new(0, 0), CellCoord::new(7, 0)),
            None
        );
    }

    #[test]
    fn enclosing_wall_ring_blocks_search() {
        let maze = Maze::from_rows(
            5,
            5,
            &["     ", " ### ", " # # ", " ### ", "     "],
        )
        .expect("valid maze");
        let mut finder = PathFinder::new();

        assert!(finder
            .find_path(&maze, CellCoord::new(0, 0), CellCoord::new(2, 2))
            .is_none());
        assert!(finder
            .find_path(&maze, CellCoord::new(2, 2), CellCoord::new(4, 4))
            .is_none());
        assert_eq!(
            finder.distance(&maze, CellCoord::new(0, 0), CellCoord::new(4, 4)),
            Some(8)
        );
    }

    #[test]
    fn path_routes_around_walls() {
        let maze = Maze::from_rows(5, 3, &["     ", "#### ", "     "]).expect("valid maze");
        let mut finder = PathFinder::new();

        let path = finder
            .find_path(&maze, CellCoord::new(0, 0), CellCoord::new(0, 2))
            .expect("corridor connects both rows");

        assert_eq!(path.hops(), 10);
        assert!(path.cells().iter().all(|cell| maze.is_open(*cell)));
    }

    #[test]
    fn scratch_state_does_not_leak_between_searches() {
        let blocked = Maze::from_rows(3, 3, &["   ", "###", "   "]).expect("valid maze");
        let open = open_grid(3, 3);
        let larger = open_grid(7, 2);
        let mut finder = PathFinder::new();

        assert_eq!(
            finder.distance(&open, CellCoord::new(0, 0), CellCoord::new(2, 2)),
            Some(4)
        );
        assert_eq!(
            finder.distance(&blocked, CellCoord::new(0, 0), CellCoord::new(2, 2)),
            None
        );
        assert_eq!(
            finder.distance(&open, CellCoord::new(0, 0), CellCoord::new(2, 2)),
            Some(4)
        );
        assert_eq!(
            finder.distance(&larger, CellCoord::new(6, 1), CellCoord::new(0, 0)),
            Some(7)
        );
    }

    #[test]
    fn open_entries_prefer_low_f_then_deep_g() {
        let shallow = OpenEntry {
            f: 4,
            g: 1,
            index: 0,
        };
        let deep = OpenEntry {
            f: 4,
            g: 3,
            index: 9,
        };
        let cheap = OpenEntry {
            f: 2,
            g: 0,
            index: 5,
        };

        let mut heap = BinaryHeap::from(vec![shallow, deep, cheap]);

        assert_eq!(heap.pop(), Some(cheap));
        assert_eq!(heap.pop(), Some(deep));
        assert_eq!(heap.pop(), Some(shallow));
    }
}
