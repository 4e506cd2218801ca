use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::num::Saturating;
use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Result of [`GameSession::reveal`]: every cell whose view changed, in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    pub changed: Vec<(Coord2, CellView)>,
    pub status: GameStatus,
}

/// Result of [`GameSession::toggle_flag`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlagReport {
    pub outcome: FlagOutcome,
    /// Whether the cell carries a flag after the call.
    pub flagged: bool,
    /// May go negative when more flags than mines are placed.
    pub mines_remaining: isize,
}

/// Everything a shell needs to draw the round, safe to hand out at any time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: GameStatus,
    pub mine_count: CellCount,
    pub flagged_count: CellCount,
    pub elapsed_seconds: u32,
    pub time_left: Option<u32>,
    pub cells: Array2<CellView>,
}

/// One round, from a fresh board to a terminal status.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    mine_count: CellCount,
    status: GameStatus,
    flagged_count: Saturating<CellCount>,
    timer: RoundTimer,
    triggered_mine: Option<Coord2>,
    debug: bool,
    rng: SmallRng,
}

impl GameSession {
    /// Builds a round from `config`; all later resets draw their layouts from `seed` too.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = Self::build_board(&config, &mut rng)?;
        Ok(Self::assemble(config, board, config.mine_count(), rng))
    }

    /// Round on a prepared board, the mine and flag counts are whatever the board holds.
    pub fn with_board(board: Board, time_budget: Option<u32>) -> Self {
        let (rows, cols) = board.size();
        let mine_count = board.mine_count();
        let mut config = GameConfig::new(rows, cols, 0.0).with_mines(mine_count);
        config.time_budget = time_budget;
        Self::assemble(config, board, mine_count, SmallRng::seed_from_u64(0))
    }

    /// Throws the round away and starts a new one; nothing changes if `config` is rejected.
    pub fn reset(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        let seed = self.rng.random();
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = Self::build_board(&config, &mut rng)?;
        let debug = self.debug;
        *self = Self::assemble(config, board, config.mine_count(), rng);
        self.set_debug(debug);
        log::info!(
            "new round {}x{} with {} mines",
            config.rows,
            config.cols,
            self.mine_count
        );
        Ok(())
    }

    fn build_board(config: &GameConfig, rng: &mut SmallRng) -> Result<Board> {
        config.validate()?;
        let mut board = Board::generate(config.rows, config.cols)?;
        board.place_mines(config.mine_count(), config.placement, rng)?;
        Ok(board)
    }

    fn assemble(config: GameConfig, board: Board, mine_count: CellCount, rng: SmallRng) -> Self {
        Self {
            flagged_count: Saturating(board.flagged_count()),
            timer: RoundTimer::new(config.time_budget),
            config,
            board,
            mine_count,
            status: GameStatus::Playing,
            triggered_mine: None,
            debug: false,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// How many mines have not been flagged yet
    pub fn mines_remaining(&self) -> isize {
        (self.mine_count as isize) - (self.flagged_count.0 as isize)
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.timer.elapsed()
    }

    pub fn time_left(&self) -> Option<u32> {
        self.timer.remaining()
    }

    pub fn is_started(&self) -> bool {
        self.timer.is_started()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Inspection mode: mines become visible in views, gameplay is unaffected.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
        if debug {
            for (row, col) in self.board.mine_coords() {
                log::debug!("mine at ({}, {})", row, col);
            }
        }
    }

    /// Mine locations, only once the round is over or in debug mode.
    pub fn mine_positions(&self) -> Option<Vec<Coord2>> {
        (self.debug || self.is_finished()).then(|| self.board.mine_coords().collect())
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let cell = self.board.cell(coords)?;
        let mine_visible = cell.is_disclosed() || self.debug;
        Ok(match cell.state() {
            CellState::Revealed if cell.has_mine() => CellView::Exploded,
            CellState::Revealed => CellView::Revealed(cell.adjacent_mine_count()),
            CellState::Flagged if self.status == GameStatus::Lost && !cell.has_mine() => {
                CellView::MisFlagged
            }
            CellState::Flagged => CellView::Flagged,
            CellState::Hidden if cell.has_mine() && mine_visible => CellView::Mine,
            CellState::Hidden => CellView::Hidden,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (rows, cols) = self.size();
        let cells = Array2::from_shape_fn((rows, cols).to_nd_index(), |(row, col)| {
            self.view_unchecked((row as Coord, col as Coord))
        });
        SessionSnapshot {
            status: self.status,
            mine_count: self.mine_count,
            flagged_count: self.flagged_count.0,
            elapsed_seconds: self.elapsed_seconds(),
            time_left: self.time_left(),
            cells,
        }
    }

    fn view_unchecked(&self, coords: Coord2) -> CellView {
        self.cell_view(coords).unwrap_or(CellView::Hidden)
    }

    /// Reveals a cell, flooding through zero-count cells and checking for the end of the round.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.board.validate_coords(coords)?;

        if self.is_finished() {
            return Ok(self.report(RevealOutcome::NoChange, BTreeSet::new()));
        }
        self.timer.start();

        let mut changed = BTreeSet::new();
        let outcome = match self.board.reveal_cell(coords)? {
            CellReveal::Unchanged => RevealOutcome::NoChange,
            CellReveal::Mine => {
                log::debug!("hit mine at {:?}", coords);
                self.triggered_mine = Some(coords);
                changed.insert(coords);
                self.end_round(GameStatus::Lost, &mut changed);
                RevealOutcome::HitMine
            }
            CellReveal::Safe => {
                changed.insert(coords);
                let count = self.board[coords].adjacent_mine_count();
                log::debug!("revealed {:?}, mine count: {}", coords, count);

                if count == 0 {
                    self.flood_fill(coords, &mut changed)?;
                }

                if self.board.all_non_mine_cells_revealed() {
                    self.end_round(GameStatus::Won, &mut changed);
                    RevealOutcome::Won
                } else {
                    RevealOutcome::Revealed
                }
            }
        };

        Ok(self.report(outcome, changed))
    }

    /// Breadth-first reveal of everything reachable from `start` through zero-count cells.
    fn flood_fill(&mut self, start: Coord2, changed: &mut BTreeSet<Coord2>) -> Result<()> {
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<_> = self.hidden_neighbors(start, &visited).collect();
        log::trace!("starting flood-fill from {:?}, initial neighbors: {:?}", start, to_visit);

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            // flagged cells stay closed, a zero-count cell never borders a mine
            if self.board.reveal_cell(visit_coords)? != CellReveal::Safe {
                log::trace!("skipping cell at {:?}", visit_coords);
                continue;
            }
            changed.insert(visit_coords);

            let visit_count = self.board[visit_coords].adjacent_mine_count();
            log::trace!("flood revealed {:?}, mine count: {}", visit_coords, visit_count);

            if visit_count == 0 {
                to_visit.extend(self.hidden_neighbors(visit_coords, &visited));
            }
        }
        Ok(())
    }

    fn hidden_neighbors<'a>(
        &'a self,
        coords: Coord2,
        visited: &'a BTreeSet<Coord2>,
    ) -> impl Iterator<Item = Coord2> + 'a {
        self.board
            .adjacent_cells(coords)
            .filter(|&pos| self.board[pos].state() == CellState::Hidden)
            .filter(|pos| !visited.contains(pos))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagReport> {
        let coords = self.board.validate_coords(coords)?;

        let outcome = if self.is_finished() {
            FlagOutcome::NoChange
        } else {
            self.timer.start();
            self.board.toggle_flag(coords)?
        };

        match outcome {
            FlagOutcome::Flagged => self.flagged_count += 1,
            FlagOutcome::Unflagged => self.flagged_count -= 1,
            FlagOutcome::NoChange => {}
        }

        Ok(FlagReport {
            outcome,
            flagged: self.board[coords].state() == CellState::Flagged,
            mines_remaining: self.mines_remaining(),
        })
    }

    /// Advances the clock by one unit; a spent time budget loses the round.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_finished() {
            return TickOutcome::Idle;
        }

        let outcome = self.timer.tick();
        if outcome == TickOutcome::Expired {
            log::debug!("time budget exhausted after {}", self.timer.elapsed());
            self.end_round(GameStatus::Lost, &mut BTreeSet::new());
        }
        outcome
    }

    fn end_round(&mut self, status: GameStatus, changed: &mut BTreeSet<Coord2>) {
        if self.is_finished() {
            return;
        }

        self.status = status;
        self.timer.stop();
        self.board.reveal_all_mines();
        log::debug!("round ended: {:?} after {}", status, self.timer.elapsed());

        changed.extend(self.board.mine_coords());
        if status == GameStatus::Lost {
            let (rows, cols) = self.size();
            for row in 0..rows {
                for col in 0..cols {
                    let cell = self.board[(row, col)];
                    if cell.state() == CellState::Flagged && !cell.has_mine() {
                        changed.insert((row, col));
                    }
                }
            }
        }
    }

    fn report(&self, outcome: RevealOutcome, changed: BTreeSet<Coord2>) -> RevealReport {
        RevealReport {
            outcome,
            changed: changed
                .into_iter()
                .map(|coords| (coords, self.view_unchecked(coords)))
                .collect(),
            status: self.status,
        }
    }
}
