pub mod config;
pub mod error;
pub mod game;
pub mod sim;
pub mod snake;
pub mod term;

pub use error::{Error, Result};

pub type TermInt = u16;
pub type Coords = (u16, u16);
