//! Static maze topology built once from the startup rows.

use pellet_rush_core::{CellCoord, WALL_MARKER};
use thiserror::Error;

/// Errors raised while building a [`Maze`] from row markers.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// Width or height was zero.
    #[error("maze dimensions {width}x{height} are empty")]
    EmptyDimensions {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// The number of rows did not match the declared height.
    #[error("expected {expected} maze rows, got {actual}")]
    RowCount {
        /// Declared height.
        expected: u32,
        /// Rows actually supplied.
        actual: usize,
    },
    /// A row did not match the declared width.
    #[error("maze row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        /// Index of the offending row.
        row: usize,
        /// Declared width.
        expected: u32,
        /// Cells actually supplied in the row.
        actual: usize,
    },
}

/// Dense, row-major maze with cached orthogonal adjacency.
///
/// Every cell stores up to four in-bounds neighbors, walls included, so
/// callers decide whether a wall blocks them. Adjacency never wraps around
/// the edges and is symmetric.
#[derive(Clone, Debug)]
pub struct Maze {
    width: u32,
    height: u32,
    walls: Vec<bool>,
    adjacency: Vec<Adjacency>,
}

#[derive(Clone, Copy, Debug)]
struct Adjacency {
    cells: [CellCoord; 4],
    count: u8,
}

impl Adjacency {
    fn as_slice(&self) -> &[CellCoord] {
        &self.cells[..usize::from(self.count)]
    }
}

impl Default for Adjacency {
    fn default() -> Self {
        Self {
            cells: [CellCoord::new(0, 0); 4],
            count: 0,
        }
    }
}

impl Maze {
    /// Builds a maze from row markers where `#` denotes a wall.
    pub fn from_rows<S>(width: u32, height: u32, rows: &[S]) -> Result<Self, MazeError>
    where
        S: AsRef<str>,
    {
        if width == 0 || height == 0 {
            return Err(MazeError::EmptyDimensions { width, height });
        }

        if rows.len() != height as usize {
            return Err(MazeError::RowCount {
                expected: height,
                actual: rows.len(),
            });
        }

        let mut walls = Vec::with_capacity(width as usize * height as usize);
        for (index, row) in rows.iter().enumerate() {
            let before = walls.len();
            walls.extend(row.as_ref().chars().map(|marker| marker == WALL_MARKER));
            let actual = walls.len() - before;
            if actual != width as usize {
                return Err(MazeError::RowWidth {
                    row: index,
                    expected: width,
                    actual,
                });
            }
        }

        let mut maze = Self {
            width,
            height,
            walls,
            adjacency: Vec::new(),
        };
        let adjacency: Vec<_> = maze
            .cells()
            .map(|cell| maze.collect_neighbors(cell))
            .collect();
        maze.adjacency = adjacency;
        Ok(maze)
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells, walls included.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.walls.len()
    }

    /// Whether the cell lies inside the maze bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Row-major offset of the cell, if it lies inside the maze.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        index(self.width as usize, cell)
    }

    /// Cell stored at the provided row-major offset.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.walls.len() {
            return None;
        }

        let width = self.width as usize;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Whether the cell is a wall. Out-of-bounds cells count as walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|offset| self.walls.get(offset).copied())
            .unwrap_or(true)
    }

    /// Whether the cell is inside the maze and not a wall.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        !self.is_wall(cell)
    }

    /// Cached orthogonal neighbors of the cell, walls included.
    ///
    /// Returns an empty slice for cells outside the maze.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> &[CellCoord] {
        match self.index(cell).and_then(|offset| self.adjacency.get(offset)) {
            Some(adjacency) => adjacency.as_slice(),
            None => &[],
        }
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.width;
        (0..self.height)
            .flat_map(move |row| (0..width).map(move |column| CellCoord::new(column, row)))
    }

    /// Number of open cells.
    #[must_use]
    pub fn open_cell_count(&self) -> usize {
        self.walls.iter().filter(|wall| !**wall).count()
    }

    fn collect_neighbors(&self, cell: CellCoord) -> Adjacency {
        let mut adjacency = Adjacency::default();

        let mut push = |candidate: CellCoord| {
            adjacency.cells[usize::from(adjacency.count)] = candidate;
            adjacency.count += 1;
        };

        if let Some(column) = cell.column().checked_sub(1) {
            push(CellCoord::new(column, cell.row()));
        }

        if let Some(column) = cell.column().checked_add(1) {
            if column < self.width {
                push(CellCoord::new(column, cell.row()));
            }
        }

        if let Some(row) = cell.row().checked_sub(1) {
            push(CellCoord::new(cell.column(), row));
        }

        if let Some(row) = cell.row().checked_add(1) {
            if row < self.height {
                push(CellCoord::new(cell.column(), row));
            }
        }

        adjacency
    }
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Maze {
        Maze::from_rows(5, 3, &["#####", "#   #", "#####"]).expect("valid maze")
    }

    #[test]
    fn from_rows_marks_walls() {
        let maze = corridor();

        assert!(maze.is_wall(CellCoord::new(0, 0)));
        assert!(maze.is_open(CellCoord::new(1, 1)));
        assert!(maze.is_open(CellCoord::new(3, 1)));
        assert!(maze.is_wall(CellCoord::new(4, 1)));
        assert_eq!(maze.open_cell_count(), 3);
        assert_eq!(maze.cell_count(), 15);
    }

    #[test]
    fn out_of_bounds_cells_are_walls_without_neighbors() {
        let maze = corridor();
        let outside = CellCoord::new(5, 1);

        assert!(maze.is_wall(outside));
        assert!(maze.neighbors(outside).is_empty());
        assert_eq!(maze.index(outside), None);
    }

    #[test]
    fn corner_cells_have_two_neighbors() {
        let maze = corridor();

        let neighbors = maze.neighbors(CellCoord::new(0, 0));
        assert_eq!(neighbors, &[CellCoord::new(1, 0), CellCoord::new(0, 1)]);
    }

    #[test]
    fn interior_cells_list_walls_as_neighbors() {
        let maze = corridor();

        let neighbors = maze.neighbors(CellCoord::new(1, 1));
        assert_eq!(neighbors.len(), 4);
        assert!(neighbors.contains(&CellCoord::new(0, 1)));
        assert!(neighbors.contains(&CellCoord::new(1, 0)));
    }

    #[test]
    fn adjacency_is_symmetric_and_in_bounds() {
        let maze = Maze::from_rows(4, 4, &["# # ", "    ", " ## ", "#  #"]).expect("valid maze");

        for cell in maze.cells() {
            for neighbor in maze.neighbors(cell) {
                assert!(maze.contains(*neighbor));
                assert_eq!(cell.manhattan_distance(*neighbor), 1);
                assert!(
                    maze.neighbors(*neighbor).contains(&cell),
                    "{neighbor} does not list {cell} back"
                );
            }
        }
    }

    #[test]
    fn index_round_trips_through_cell_at() {
        let maze = corridor();

        for cell in maze.cells() {
            let offset = maze.index(cell).expect("cell inside maze");
            assert_eq!(maze.cell_at(offset), Some(cell));
        }
        assert_eq!(maze.cell_at(maze.cell_count()), None);
    }

    #[test]
    fn rejects_mismatched_rows() {
        assert_eq!(
            Maze::from_rows(3, 2, &["   "]).unwrap_err(),
            MazeError::RowCount {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(
            Maze::from_rows(3, 2, &["   ", "  "]).unwrap_err(),
            MazeError::RowWidth {
                row: 1,
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(
            Maze::from_rows::<&str>(0, 0, &[]).unwrap_err(),
            MazeError::EmptyDimensions {
                width: 0,
                height: 0
            }
        );
    }
}
