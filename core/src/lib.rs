//! Game engine for a single-player mine-clearing puzzle.
//!
//! [`Board`] holds the grid and its static mine layout. [`GameSession`] owns one board
//! for one round and drives reveals, flags and the round timer. Rendering and input
//! routing are left to the caller, who feeds coordinates in and draws the
//! [`CellView`]s that come back.
#![no_std]

extern crate alloc;

pub use board::*;
pub use config::*;
pub use error::*;
pub use session::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod board;
mod config;
mod error;
mod session;
mod tile;
mod timer;
mod types;
