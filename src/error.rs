use std::io;

use thiserror::Error;

use crate::snake::GridCell;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("a snake body needs at least one cell")]
    EmptyBody,

    #[error("snake body visits {0} more than once")]
    OverlappingBody(GridCell),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("terminal is {cols}x{rows} cells, the game needs at least {needed_cols}x{needed_rows}")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        needed_cols: u16,
        needed_rows: u16,
    },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
