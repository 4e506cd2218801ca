use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// What [`Board::reveal_cell`] did to a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellReveal {
    /// Cell was flagged or already revealed.
    Unchanged,
    Safe,
    Mine,
}

/// What [`Board::toggle_flag`] did to a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    /// Cell was already revealed.
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Flagged => true,
            Self::Unflagged => true,
        }
    }
}

/// Grid of cells with a static mine layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// All cells hidden, no mines.
    pub fn generate(rows: Coord, cols: Coord) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidDimensions);
        }
        Ok(Self {
            cells: Array2::default((rows, cols).to_nd_index()),
            mine_count: 0,
        })
    }

    /// Fixed layout, mostly useful for tests and replays.
    pub fn from_mine_coords(rows: Coord, cols: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut board = Self::generate(rows, cols)?;
        for &coords in mine_coords {
            let coords = board.validate_coords(coords)?;
            board[coords].has_mine = true;
        }
        board.finish_layout();
        Ok(board)
    }

    /// Scatters `count` more mines over mine-free cells and computes adjacent counts.
    ///
    /// With [`MinePlacement::Redraw`] the board may end up with fewer mines than asked
    /// for, [`Board::mine_count`] reports what was actually placed.
    pub fn place_mines<R: Rng + ?Sized>(
        &mut self,
        count: CellCount,
        placement: MinePlacement,
        rng: &mut R,
    ) -> Result<()> {
        let existing = self.count_mines();
        let capacity = self.total_cells() - existing;
        if count > capacity {
            return Err(GameError::TooManyMines {
                requested: count,
                capacity,
            });
        }

        match placement {
            MinePlacement::Exact => self.place_exact(count, rng),
            MinePlacement::Redraw => self.place_redraw(count, rng),
        }
        self.finish_layout();

        let added = self.mine_count - existing;
        if added != count {
            log::warn!(
                "Placed fewer mines than requested, actual: {}, requested: {}",
                added,
                count
            );
        }
        Ok(())
    }

    /// Partial shuffle of the mine-free cells, the first `count` of them get a mine.
    fn place_exact<R: Rng + ?Sized>(&mut self, count: CellCount, rng: &mut R) {
        let mut free: Vec<(usize, usize)> = self
            .cells
            .indexed_iter()
            .filter(|(_, cell)| !cell.has_mine)
            .map(|(pos, _)| pos)
            .collect();
        let count = usize::from(count).min(free.len());

        for placed in 0..count {
            let pick = rng.random_range(placed..free.len());
            free.swap(placed, pick);
            self.cells[free[placed]].has_mine = true;
        }
    }

    /// Number of cells currently carrying a flag.
    pub fn flagged_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.state == CellState::Flagged)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    fn place_redraw<R: Rng + ?Sized>(&mut self, count: CellCount, rng: &mut R) {
        let (rows, cols) = self.size();
        for _ in 0..count {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            self[coords].has_mine = true;
        }
    }

    /// Recounts mines and refreshes every cell's adjacent count.
    fn finish_layout(&mut self) {
        self.mine_count = self.count_mines();
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let count = self.count_adjacent_mines((row, col));
                self[(row, col)].adjacent_mines = count;
            }
        }
    }

    fn count_mines(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.has_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds {
                row: coords.0,
                col: coords.1,
            })
        }
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // dimensions always come from a `Coord2`
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn cell(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self[coords])
    }

    /// The clipped 3x3 block around `coords`, the cell itself included.
    pub fn adjacent_cells(&self, coords: Coord2) -> Neighborhood {
        Neighborhood::new(coords, self.size())
    }

    /// Mines in [`Board::adjacent_cells`]; a mine cell counts itself.
    pub fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        self.adjacent_cells(coords)
            .filter(|&pos| self[pos].has_mine)
            .count() as u8
    }

    /// Turns a hidden cell into a revealed one, without cascading.
    pub fn reveal_cell(&mut self, coords: Coord2) -> Result<CellReveal> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self[coords];
        Ok(match cell.state {
            CellState::Hidden => {
                cell.state = CellState::Revealed;
                if cell.has_mine {
                    CellReveal::Mine
                } else {
                    CellReveal::Safe
                }
            }
            CellState::Revealed | CellState::Flagged => CellReveal::Unchanged,
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self[coords];
        Ok(match cell.state {
            CellState::Hidden => {
                cell.state = CellState::Flagged;
                FlagOutcome::Flagged
            }
            CellState::Flagged => {
                cell.state = CellState::Hidden;
                FlagOutcome::Unflagged
            }
            CellState::Revealed => FlagOutcome::NoChange,
        })
    }

    pub fn all_non_mine_cells_revealed(&self) -> bool {
        self.cells
            .iter()
            .filter(|cell| !cell.has_mine)
            .all(|cell| cell.state == CellState::Revealed)
    }

    /// Marks every mine as disclosed; safe cells are left alone.
    pub fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.has_mine) {
            cell.disclosed = true;
        }
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.has_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn generate_starts_empty_and_hidden() {
        let board = Board::generate(3, 4).unwrap();
        assert_eq!(board.size(), (3, 4));
        assert_eq!(board.mine_count(), 0);
        assert!(
            board
                .cells
                .iter()
                .all(|cell| *cell == Cell::default())
        );
    }

    #[test]
    fn generate_rejects_empty_board() {
        assert_eq!(Board::generate(0, 3), Err(GameError::InvalidDimensions));
    }

    #[test]
    fn exact_placement_places_requested_count() {
        let mut rng = SmallRng::seed_from_u64(7);
        for count in [0, 1, 12, 24, 25] {
            let mut board = Board::generate(5, 5).unwrap();
            board
                .place_mines(count, MinePlacement::Exact, &mut rng)
                .unwrap();
            assert_eq!(board.mine_count(), count);
            assert_eq!(board.mine_coords().count(), usize::from(count));
        }
    }

    #[test]
    fn redraw_placement_never_exceeds_request() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut board = Board::generate(3, 3).unwrap();
        board
            .place_mines(9, MinePlacement::Redraw, &mut rng)
            .unwrap();
        assert!(board.mine_count() <= 9);
        assert!(board.mine_count() >= 1);
    }

    #[test]
    fn placement_rejects_overfull_request() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut board = Board::generate(2, 2).unwrap();
        assert_eq!(
            board.place_mines(5, MinePlacement::Exact, &mut rng),
            Err(GameError::TooManyMines {
                requested: 5,
                capacity: 4
            })
        );
        assert_eq!(board.mine_count(), 0);
    }

    #[test]
    fn placement_counts_only_free_cells() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut board = Board::from_mine_coords(2, 2, &[(0, 0), (1, 1)]).unwrap();
        assert_eq!(
            board.place_mines(3, MinePlacement::Exact, &mut rng),
            Err(GameError::TooManyMines {
                requested: 3,
                capacity: 2
            })
        );
        assert_eq!(board.mine_count(), 2);

        board
            .place_mines(2, MinePlacement::Exact, &mut rng)
            .unwrap();
        assert_eq!(board.mine_count(), 4);
    }

    #[test]
    fn exact_placement_adds_to_existing_mines() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut board = Board::from_mine_coords(6, 6, &[(0, 0), (5, 5), (2, 3)]).unwrap();
        board
            .place_mines(20, MinePlacement::Exact, &mut rng)
            .unwrap();
        assert_eq!(board.mine_count(), 23);
        assert!(board[(0, 0)].has_mine());
        assert!(board[(5, 5)].has_mine());
        assert!(board[(2, 3)].has_mine());
    }

    #[test]
    fn flagged_cells_are_counted() {
        let mut board = Board::generate(3, 3).unwrap();
        assert_eq!(board.flagged_count(), 0);
        board.toggle_flag((0, 1)).unwrap();
        board.toggle_flag((2, 2)).unwrap();
        assert_eq!(board.flagged_count(), 2);
    }

    #[test]
    fn placement_leaves_state_untouched() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut board = Board::generate(4, 4).unwrap();
        board.toggle_flag((0, 0)).unwrap();
        board
            .place_mines(6, MinePlacement::Exact, &mut rng)
            .unwrap();
        assert_eq!(board[(0, 0)].state(), CellState::Flagged);
    }

    #[test]
    fn adjacent_counts_from_layout() {
        let board = Board::from_mine_coords(3, 3, &[(0, 0), (2, 2)]).unwrap();
        assert_eq!(board.count_adjacent_mines((1, 1)), 2);
        assert_eq!(board.count_adjacent_mines((0, 2)), 0);
        assert_eq!(board.count_adjacent_mines((0, 1)), 1);
        // self-inclusive on mine cells
        assert_eq!(board.count_adjacent_mines((0, 0)), 1);
        assert_eq!(board[(1, 2)].adjacent_mine_count(), 1);
    }

    #[test]
    fn adjacent_cells_are_symmetric() {
        let board = Board::generate(4, 3).unwrap();
        for a in board.adjacent_cells((0, 0)).chain(board.adjacent_cells((3, 2))) {
            for b in board.adjacent_cells(a) {
                assert!(board.adjacent_cells(b).any(|pos| pos == a));
            }
        }
    }

    #[test]
    fn reveal_cell_reports_mine_and_does_not_cascade() {
        let mut board = Board::from_mine_coords(3, 3, &[(2, 2)]).unwrap();
        assert_eq!(board.reveal_cell((0, 0)), Ok(CellReveal::Safe));
        assert_eq!(board[(0, 1)].state(), CellState::Hidden);
        assert_eq!(board.reveal_cell((0, 0)), Ok(CellReveal::Unchanged));
        assert_eq!(board.reveal_cell((2, 2)), Ok(CellReveal::Mine));
    }

    #[test]
    fn flagged_cell_cannot_be_revealed() {
        let mut board = Board::from_mine_coords(2, 2, &[]).unwrap();
        assert_eq!(board.toggle_flag((1, 1)), Ok(FlagOutcome::Flagged));
        assert_eq!(board.reveal_cell((1, 1)), Ok(CellReveal::Unchanged));
        assert_eq!(board[(1, 1)].state(), CellState::Flagged);
    }

    #[test]
    fn revealed_cell_cannot_be_flagged() {
        let mut board = Board::from_mine_coords(2, 2, &[]).unwrap();
        board.reveal_cell((0, 1)).unwrap();
        assert_eq!(board.toggle_flag((0, 1)), Ok(FlagOutcome::NoChange));
        assert_eq!(board[(0, 1)].state(), CellState::Revealed);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut board = Board::generate(2, 2).unwrap();
        assert_eq!(
            board.reveal_cell((2, 0)),
            Err(GameError::OutOfBounds { row: 2, col: 0 })
        );
        assert_eq!(
            board.toggle_flag((0, 5)),
            Err(GameError::OutOfBounds { row: 0, col: 5 })
        );
    }

    #[test]
    fn win_scan_ignores_mines() {
        let mut board = Board::from_mine_coords(1, 3, &[(0, 0)]).unwrap();
        assert!(!board.all_non_mine_cells_revealed());
        board.reveal_cell((0, 1)).unwrap();
        board.reveal_cell((0, 2)).unwrap();
        assert!(board.all_non_mine_cells_revealed());
    }

    #[test]
    fn reveal_all_mines_only_marks_mines() {
        let mut board = Board::from_mine_coords(2, 2, &[(0, 0), (1, 1)]).unwrap();
        board.toggle_flag((0, 1)).unwrap();
        board.reveal_all_mines();
        let disclosed: Vec<_> = board
            .cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_disclosed())
            .map(|(pos, _)| pos)
            .collect();
        assert_eq!(disclosed, [(0, 0), (1, 1)]);
        assert_eq!(board[(0, 1)].state(), CellState::Flagged);
        assert_eq!(board[(0, 0)].state(), CellState::Hidden);
    }
}
