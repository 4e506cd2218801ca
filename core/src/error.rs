use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum GameError {
    #[error("Coordinates ({row}, {col}) are outside the board")]
    OutOfBounds { row: Coord, col: Coord },
    #[error("Board must have at least one row and one column")]
    InvalidDimensions,
    #[error("Mine density {0} is outside (0, 1)")]
    InvalidDensity(f64),
    #[error("Too many mines, requested {requested} but room for only {capacity}")]
    TooManyMines {
        requested: CellCount,
        capacity: CellCount,
    },
    #[error("Unknown {0} preset")]
    UnknownPreset(&'static str),
}

impl GameError {
    /// Whether the error describes a rejected configuration rather than a bad command.
    pub const fn is_configuration(&self) -> bool {
        !matches!(self, Self::OutOfBounds { .. })
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
