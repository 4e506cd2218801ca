use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

/// One grid position.
///
/// The mine flag and adjacent count are fixed once mines are placed; only `state`
/// and the end-of-round `disclosed` marker change during play.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) has_mine: bool,
    pub(crate) state: CellState,
    pub(crate) adjacent_mines: u8,
    pub(crate) disclosed: bool,
}

impl Cell {
    pub const fn has_mine(&self) -> bool {
        self.has_mine
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn adjacent_mine_count(&self) -> u8 {
        self.adjacent_mines
    }

    /// Set by [`Board::reveal_all_mines`](crate::Board::reveal_all_mines) on mine cells.
    pub const fn is_disclosed(&self) -> bool {
        self.disclosed
    }
}

/// What a shell may show for a cell; never leaks a hidden mine during normal play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    /// Mine shown after the round ended, or at any time in debug mode.
    Mine,
    /// The mine that ended the round.
    Exploded,
    /// Flag placed on a safe cell, shown after a loss.
    MisFlagged,
}
