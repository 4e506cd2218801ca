use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Upper bound on the number of mines in any round.
pub const MAX_MINES: CellCount = 99;

/// How mines are scattered over the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MinePlacement {
    /// Draws only among cells without a mine, always placing exactly the requested count.
    #[default]
    Exact,
    /// Draws a random cell per mine; a draw landing on a mine is wasted, so fewer mines
    /// may be placed than requested.
    Redraw,
}

impl FromStr for MinePlacement {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exact" => Ok(Self::Exact),
            "redraw" => Ok(Self::Redraw),
            _ => Err(GameError::UnknownPreset("placement")),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizePreset {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizePreset {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// `(rows, cols)`
    pub const fn dimensions(self) -> Coord2 {
        match self {
            Self::Small => (10, 10),
            Self::Medium => (20, 30),
            Self::Large => (30, 50),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl FromStr for SizePreset {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or(GameError::UnknownPreset("size"))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Fraction of cells holding a mine, before the [`MAX_MINES`] cap.
    pub const fn density(self) -> f64 {
        match self {
            Self::Easy => 0.1,
            Self::Medium => 0.2,
            Self::Hard => 0.3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(s))
            .ok_or(GameError::UnknownPreset("difficulty"))
    }
}

/// Everything needed to set up a round.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub density: f64,
    /// Explicit mine count, used instead of `density` when set.
    pub mines: Option<CellCount>,
    /// Ticks allowed after the first move before the round is lost.
    pub time_budget: Option<u32>,
    pub placement: MinePlacement,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_presets(SizePreset::default(), Difficulty::default())
    }
}

impl GameConfig {
    pub const fn new(rows: Coord, cols: Coord, density: f64) -> Self {
        Self {
            rows,
            cols,
            density,
            mines: None,
            time_budget: None,
            placement: MinePlacement::Exact,
        }
    }

    pub const fn from_presets(size: SizePreset, difficulty: Difficulty) -> Self {
        let (rows, cols) = size.dimensions();
        Self::new(rows, cols, difficulty.density())
    }

    pub const fn with_mines(mut self, mines: CellCount) -> Self {
        self.mines = Some(mines);
        self
    }

    pub const fn with_time_budget(mut self, ticks: u32) -> Self {
        self.time_budget = Some(ticks);
        self
    }

    pub const fn with_placement(mut self, placement: MinePlacement) -> Self {
        self.placement = placement;
        self
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    /// `min(99, floor(rows * cols * density))`, or the explicit count capped the same way.
    pub fn mine_count(&self) -> CellCount {
        let requested = match self.mines {
            Some(mines) => mines,
            // truncation is floor for non-negative values
            None => (f64::from(self.total_cells()) * self.density) as CellCount,
        };
        requested.min(MAX_MINES)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if self.mines.is_none() && !(self.density > 0.0 && self.density < 1.0) {
            return Err(GameError::InvalidDensity(self.density));
        }
        // at least one safe cell, otherwise the round cannot be won
        let capacity = self.total_cells() - 1;
        if let Some(requested) = self.mines {
            if requested > capacity {
                return Err(GameError::TooManyMines {
                    requested,
                    capacity,
                });
            }
        }
        Ok(())
    }
}
