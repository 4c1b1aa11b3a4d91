use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::error::{ConsistencyError, MoveError};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Ascending list of playable columns.
pub type LegalMoves = Vec<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    One,
    Two,
}

impl Cell {
    /// Snapshot value: 0 for empty, otherwise the player id
    pub fn value(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::One => 1,
            Cell::Two => 2,
        }
    }
}

/// Connect Four grid with explicit per-column fill heights.
///
/// Row 0 is the bottom row. A cell `(row, col)` is occupied iff
/// `row < heights[col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    heights: [usize; COLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
            heights: [0; COLS],
        }
    }

    /// Build a board from a numeric grid (row 0 is the bottom).
    pub fn from_grid(grid: [[u8; COLS]; ROWS]) -> Result<Self, ConsistencyError> {
        let mut board = Board::new();
        for col in 0..COLS {
            for row in 0..ROWS {
                let cell = match grid[row][col] {
                    0 => Cell::Empty,
                    1 => Cell::One,
                    2 => Cell::Two,
                    value => return Err(ConsistencyError::UnknownCell { row, col, value }),
                };
                if cell == Cell::Empty {
                    continue;
                }
                if row != board.heights[col] {
                    return Err(ConsistencyError::FloatingPiece { row, col });
                }
                board.cells[row][col] = cell;
                board.heights[col] += 1;
            }
        }
        Ok(board)
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Number of pieces currently stacked in a column
    pub fn height(&self, col: usize) -> usize {
        self.heights[col]
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        col >= COLS || self.heights[col] >= ROWS
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&h| h >= ROWS)
    }

    pub fn piece_count(&self) -> usize {
        self.heights.iter().sum()
    }

    /// Columns that can still take a piece, in ascending order
    pub fn legal_moves(&self) -> LegalMoves {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn apply_move(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }
        let row = self.heights[col];
        if row >= ROWS {
            return Err(MoveError::ColumnFull(col));
        }
        self.cells[row][col] = player.to_cell();
        self.heights[col] += 1;
        Ok(row)
    }

    /// Remove the most recently placed piece of a column
    pub fn undo_move(&mut self, col: usize) -> Result<(), MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }
        if self.heights[col] == 0 {
            return Err(MoveError::ColumnEmpty(col));
        }
        self.heights[col] -= 1;
        self.cells[self.heights[col]][col] = Cell::Empty;
        Ok(())
    }

    /// Would dropping `player` into `col` connect four through the landing cell?
    /// Returns false for full or out-of-range columns.
    pub fn completes_four(&self, col: usize, player: Player) -> bool {
        if self.is_column_full(col) {
            return false;
        }
        let row = self.heights[col];
        let cell = player.to_cell();
        const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

        DIRECTIONS.iter().any(|&(dr, dc)| {
            let count = 1
                + self.run_length(row, col, dr, dc, cell)
                + self.run_length(row, col, -dr, -dc, cell);
            count >= 4
        })
    }

    /// Count consecutive `cell`s starting next to `(row, col)` along a direction
    fn run_length(&self, row: usize, col: usize, dr: i32, dc: i32, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as i32 + dr;
        let mut c = col as i32 + dc;
        while (0..ROWS as i32).contains(&r)
            && (0..COLS as i32).contains(&c)
            && self.cells[r as usize][c as usize] == cell
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    /// Immutable copy of the grid for the game record
    pub fn snapshot(&self) -> Snapshot {
        let mut grid = [[0u8; COLS]; ROWS];
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                grid[row][col] = cell.value();
            }
        }
        Snapshot { grid }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// A frozen 6x7 grid of `{0, 1, 2}` values, row 0 at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    grid: [[u8; COLS]; ROWS],
}

impl Snapshot {
    pub fn grid(&self) -> &[[u8; COLS]; ROWS] {
        &self.grid
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.grid[row][col]
    }

    pub fn piece_count(&self) -> usize {
        self.grid.iter().flatten().filter(|&&v| v != 0).count()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.iter().rev() {
            for &value in row {
                let symbol = match value {
                    1 => Player::One.symbol(),
                    2 => Player::Two.symbol(),
                    _ => '.',
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "0123456")
    }
}
