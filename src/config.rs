use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::snake::GridCell;
use crate::TermInt;

pub const BOARD_WIDTH_TILES: TermInt = 30;
pub const BOARD_HEIGHT_TILES: TermInt = 30;

/// Two terminal columns per tile keep tiles roughly square, since
/// terminal cells are about twice as tall as they are wide.
pub const SCREEN_COLS: TermInt = 60;
pub const SCREEN_ROWS: TermInt = 30;

pub const TICK_INTERVAL_MS: u64 = 1000 / 5;

/// Longest single idle wait, so quit and turn keys are picked up promptly
/// while the driver waits for the next tick.
pub const POLL_INTERVAL_MS: u64 = 10;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub width: TermInt,
    pub height: TermInt,
}

impl Board {
    pub const fn new(width: TermInt, height: TermInt) -> Self {
        Board { width, height }
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.row >= 0
            && cell.row < self.height as i32
            && cell.col >= 0
            && cell.col < self.width as i32
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn center(&self) -> GridCell {
        GridCell::new(self.height as i32 / 2, self.width as i32 / 2)
    }

    /// Every cell of the board, row by row.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..height).flat_map(move |row| (0..width).map(move |col| GridCell::new(row, col)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new(BOARD_WIDTH_TILES, BOARD_HEIGHT_TILES)
    }
}

/// The play area on the terminal, in character cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub cols: TermInt,
    pub rows: TermInt,
}

impl Screen {
    pub const fn new(cols: TermInt, rows: TermInt) -> Self {
        Screen { cols, rows }
    }

    /// Default screen for a board: two columns and one row per tile.
    pub fn for_board(board: Board) -> Self {
        Screen::new(board.width.saturating_mul(2), board.height)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::new(SCREEN_COLS, SCREEN_ROWS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub board: Board,
    pub screen: Screen,
    pub tick_interval: Duration,
    pub poll_interval: Duration,
    /// Seed for target placement; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Config {
    pub fn with_board(board: Board) -> Self {
        Config { board, screen: Screen::for_board(board), ..Config::default() }
    }

    /// Tile size in terminal cells, (columns, rows).
    pub fn tile_size(&self) -> (TermInt, TermInt) {
        (self.screen.cols / self.board.width.max(1), self.screen.rows / self.board.height.max(1))
    }

    pub fn validate(&self) -> Result<()> {
        let Board { width, height } = self.board;
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig(format!("board must not be empty, got {}x{}", width, height)));
        }

        if self.tick_interval.is_zero() {
            return Err(Error::InvalidConfig("tick interval must be positive".into()));
        }

        let Screen { cols, rows } = self.screen;
        if cols < width || rows < height || cols % width != 0 || rows % height != 0 {
            return Err(Error::InvalidConfig(format!(
                "screen {}x{} cannot be split evenly into {}x{} tiles",
                cols, rows, width, height
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            board: Board::default(),
            screen: Screen::default(),
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            seed: None,
        }
    }
}
