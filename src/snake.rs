use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use Direction::*;

/// A tile on the board, addressed by row and column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: i32,
    pub col: i32,
}

impl GridCell {
    pub const fn new(row: i32, col: i32) -> Self {
        GridCell { row, col }
    }

    /// The neighbouring cell one step away in `direction`.
    /// May lie outside the board; the caller checks bounds.
    pub fn neighbour(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        GridCell::new(self.row + d_row, self.col + d_col)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit (row, col) step. Rows grow downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }
}

/// The snake's segments, head first.
///
/// Never empty, and no cell appears twice. Both hold for every body built
/// through [`Body::new`] or [`Body::from_cells`] and are preserved by the
/// simulation step, which is the only code that moves a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    cells: VecDeque<GridCell>,
}

impl Body {
    pub fn new(head: GridCell) -> Self {
        Body { cells: VecDeque::from(vec![head]) }
    }

    /// Builds a body from cells listed head to tail.
    pub fn from_cells(cells: impl IntoIterator<Item = GridCell>) -> Result<Self> {
        let mut body = VecDeque::new();

        for cell in cells {
            if body.contains(&cell) {
                return Err(Error::OverlappingBody(cell));
            }
            body.push_back(cell);
        }

        if body.is_empty() {
            return Err(Error::EmptyBody);
        }

        Ok(Body { cells: body })
    }

    pub fn head(&self) -> GridCell {
        // `cells` is never empty
        self.cells[0]
    }

    pub fn tail(&self) -> GridCell {
        self.cells[self.cells.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, cell: &GridCell) -> bool {
        self.cells.contains(cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCell> + '_ {
        self.cells.iter()
    }

    pub(crate) fn push_head(&mut self, cell: GridCell) {
        self.cells.push_front(cell);
    }

    pub(crate) fn pop_tail(&mut self) -> Option<GridCell> {
        if self.cells.len() > 1 {
            self.cells.pop_back()
        } else {
            None
        }
    }
}
