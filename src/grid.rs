use crate::{Cell, GameError, Position};
use rand::rngs::StdRng;
use rand::{seq::index, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// Result of a reveal request. A request that cannot apply (off-grid, flagged,
/// already revealed, game over) is `Ignored` rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The cell was uncovered; carries its adjacent mine count (0..=8).
    Opened(u8),
    /// The cell held a mine. The game is lost.
    Exploded,
    /// The request did not apply; no state changed.
    Ignored,
}

/// The playing field: a flat arena of cells addressed by `y * width + x`,
/// with mine placement deferred until the first reveal so the opening click
/// never detonates.
#[derive(Debug)]
pub struct Grid {
    cells: Vec<Cell>,
    width: u32,
    height: u32,
    mine_count: u32,
    initialized: bool,
    flags_placed: u32,
    covered_safe_count: u32,
    state: GameState,
    rng: StdRng,
}

impl Grid {
    pub fn new(width: u32, height: u32, mine_count: u32) -> Result<Self, GameError> {
        Self::with_rng(width, height, mine_count, StdRng::from_entropy())
    }

    /// Deterministic mine layout for tests and replays.
    pub fn with_seed(
        width: u32,
        height: u32,
        mine_count: u32,
        seed: u64,
    ) -> Result<Self, GameError> {
        Self::with_rng(width, height, mine_count, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        width: u32,
        height: u32,
        mine_count: u32,
        rng: StdRng,
    ) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }
        if mine_count >= width * height {
            return Err(GameError::TooManyMines {
                width,
                height,
                mines: mine_count,
            });
        }

        let cells = (0..width * height)
            .map(|i| Cell::new(Position::new((i % width) as i32, (i / width) as i32)))
            .collect();

        Ok(Self {
            cells,
            width,
            height,
            mine_count,
            initialized: false,
            flags_placed: 0,
            covered_safe_count: width * height - mine_count,
            state: GameState::Playing,
            rng,
        })
    }

    /// Fully prescribed layout: mines go exactly at `mines` and deferred
    /// placement is skipped, so even the first reveal can hit one.
    pub fn with_mines(width: u32, height: u32, mines: &[Position]) -> Result<Self, GameError> {
        let mut grid = Self::with_rng(width, height, 0, StdRng::seed_from_u64(0))?;
        for &pos in mines {
            let index = grid.index_of(pos).ok_or(GameError::MineOutOfBounds(pos))?;
            grid.cells[index].set_mine();
        }

        let mine_count = grid.cells.iter().filter(|c| c.is_mine()).count() as u32;
        if mine_count >= width * height {
            return Err(GameError::TooManyMines {
                width,
                height,
                mines: mine_count,
            });
        }
        grid.mine_count = mine_count;
        grid.covered_safe_count = width * height - mine_count;
        grid.initialized = true;
        Ok(grid)
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width as i32 || pos.y >= self.height as i32 {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Bounds-checked lookup. Off-grid coordinates (negative included) are
    /// "no cell here", never an error; neighbor scans rely on this to skip
    /// past the grid edge.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index_of(pos).map(|i| &self.cells[i])
    }

    /// The cells that exist among the 8 surrounding positions.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = &Cell> + '_ {
        pos.neighbors().filter_map(move |p| self.cell(p))
    }

    pub fn adjacent_mines(&self, pos: Position) -> u8 {
        self.neighbors(pos).filter(|c| c.is_mine()).count() as u8
    }

    /// Strict placement: `mine_count` distinct cells sampled uniformly from
    /// the arena minus `excluded`.
    fn place_mines(&mut self, excluded: &[usize]) -> Result<(), GameError> {
        let open: Vec<usize> = (0..self.cells.len())
            .filter(|i| !excluded.contains(i))
            .collect();
        if open.len() < self.mine_count as usize {
            return Err(GameError::InsufficientSafeArea {
                available: open.len(),
                mines: self.mine_count,
            });
        }

        for chosen in index::sample(&mut self.rng, open.len(), self.mine_count as usize) {
            self.cells[open[chosen]].set_mine();
        }
        Ok(())
    }

    /// First-reveal placement: exclude the clicked cell and its neighbors so
    /// the opening move lands in a clearing. When the board is too small for
    /// that exclusion zone, shrink it to the clicked cell alone; the
    /// construction bound `mine_count < width * height` makes that succeed.
    fn initialize_mines(&mut self, first: usize) {
        let first_pos = self.cells[first].position();
        let excluded: Vec<usize> = std::iter::once(first)
            .chain(first_pos.neighbors().filter_map(|p| self.index_of(p)))
            .collect();

        if self.place_mines(&excluded).is_err() {
            let fallback = self.place_mines(&[first]);
            debug_assert!(fallback.is_ok(), "single-cell exclusion cannot fail");
        }
        self.initialized = true;
    }

    pub fn reveal(&mut self, pos: Position) -> RevealOutcome {
        if self.state != GameState::Playing {
            return RevealOutcome::Ignored;
        }
        let Some(index) = self.index_of(pos) else {
            return RevealOutcome::Ignored;
        };
        if !self.cells[index].is_covered() || self.cells[index].is_flagged() {
            return RevealOutcome::Ignored;
        }

        if !self.initialized {
            self.initialize_mines(index);
        }

        self.cells[index].uncover();
        if self.cells[index].is_mine() {
            self.cells[index].mark_exploded();
            self.state = GameState::Lost;
            self.uncover_all_mines();
            return RevealOutcome::Exploded;
        }

        let adjacent = self.adjacent_mines(pos);
        self.covered_safe_count -= 1;
        if adjacent == 0 {
            self.cascade_from(pos);
        }
        if self.covered_safe_count == 0 {
            self.state = GameState::Won;
        }
        RevealOutcome::Opened(adjacent)
    }

    // Flood fill outward from a zero-adjacency cell. `covered` flips before a
    // cell's neighbors are enqueued, so no cell is visited twice and the
    // worklist drains on any finite grid. Neighbors of a zero cell are never
    // mines, so nothing here can explode.
    fn cascade_from(&mut self, start: Position) {
        let mut worklist = vec![start];
        while let Some(current) = worklist.pop() {
            for neighbor in current.neighbors() {
                let Some(index) = self.index_of(neighbor) else {
                    continue;
                };
                if !self.cells[index].is_covered() || self.cells[index].is_flagged() {
                    continue;
                }
                self.cells[index].uncover();
                self.covered_safe_count -= 1;
                if self.adjacent_mines(neighbor) == 0 {
                    worklist.push(neighbor);
                }
            }
        }
    }

    // End-of-game display: show every mine. Flags stay set so a renderer can
    // tell correctly flagged mines from missed ones.
    fn uncover_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.is_mine()) {
            cell.uncover();
        }
    }

    /// Flip the flag on a covered cell. Returns the new flag state, or `None`
    /// when the request did not apply.
    pub fn toggle_flag(&mut self, pos: Position) -> Option<bool> {
        if self.state != GameState::Playing {
            return None;
        }
        let index = self.index_of(pos)?;
        if !self.cells[index].is_covered() {
            return None;
        }

        let flagged = !self.cells[index].is_flagged();
        self.cells[index].set_flag(flagged);
        if flagged {
            self.flags_placed += 1;
        } else {
            self.flags_placed -= 1;
        }
        Some(flagged)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn mine_count(&self) -> u32 {
        self.mine_count
    }

    pub fn flags_placed(&self) -> u32 {
        self.flags_placed
    }

    /// Counter readout for the UI; negative when over-flagged.
    pub fn mines_remaining(&self) -> i32 {
        self.mine_count as i32 - self.flags_placed as i32
    }

    /// Non-mine cells still covered; 0 exactly when the game is won.
    pub fn covered_safe_count(&self) -> u32 {
        self.covered_safe_count
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state != GameState::Playing
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mine_positions(grid: &Grid) -> Vec<Position> {
        grid.cells()
            .filter(|c| c.is_mine())
            .map(|c| c.position())
            .collect()
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            Grid::new(0, 5, 0),
            Err(GameError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Grid::new(5, 0, 0),
            Err(GameError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_rejects_too_many_mines() {
        assert!(matches!(
            Grid::new(3, 3, 9),
            Err(GameError::TooManyMines { .. })
        ));
        // One short of full is still playable
        assert!(Grid::new(3, 3, 8).is_ok());
    }

    #[test]
    fn test_lookup_bounds() {
        let grid = Grid::with_seed(4, 3, 2, 1).unwrap();

        assert!(grid.cell(Position::new(0, 0)).is_some());
        assert!(grid.cell(Position::new(3, 2)).is_some());
        assert!(grid.cell(Position::new(4, 0)).is_none());
        assert!(grid.cell(Position::new(0, 3)).is_none());
        assert!(grid.cell(Position::new(-1, 0)).is_none());
        assert!(grid.cell(Position::new(0, -1)).is_none());
    }

    #[test]
    fn test_no_mines_before_first_reveal() {
        let grid = Grid::with_seed(8, 8, 10, 42).unwrap();
        assert!(mine_positions(&grid).is_empty());
    }

    #[test]
    fn test_exact_mine_count_after_first_reveal() {
        let mut grid = Grid::with_seed(8, 8, 10, 42).unwrap();
        grid.reveal(Position::new(4, 4));
        assert_eq!(mine_positions(&grid).len(), 10);
    }

    #[test]
    fn test_first_reveal_clears_neighborhood() {
        // Dense enough that an unconstrained sample would almost surely hit
        // the neighborhood of the click
        for seed in 0..50 {
            let mut grid = Grid::with_seed(9, 9, 60, seed).unwrap();
            let click = Position::new(4, 4);
            assert_ne!(grid.reveal(click), RevealOutcome::Exploded);

            let mines = mine_positions(&grid);
            assert!(!mines.contains(&click));
            for neighbor in click.neighbors() {
                assert!(!mines.contains(&neighbor), "seed {} mined {:?}", seed, neighbor);
            }
        }
    }

    #[test]
    fn test_first_reveal_fallback_excludes_clicked_cell_only() {
        // 2x2 with 3 mines: the 3x3 exclusion zone covers the whole board,
        // so placement falls back to sparing just the clicked cell.
        for seed in 0..50 {
            let mut grid = Grid::with_seed(2, 2, 3, seed).unwrap();
            let click = Position::new(0, 0);
            let outcome = grid.reveal(click);

            assert_eq!(mine_positions(&grid).len(), 3);
            assert!(!grid.cell(click).unwrap().is_mine());
            assert_eq!(outcome, RevealOutcome::Opened(3));
            assert_eq!(grid.state(), GameState::Won);
        }
    }

    #[test]
    fn test_flag_parity() {
        let mut grid = Grid::with_seed(5, 5, 4, 7).unwrap();
        let pos = Position::new(2, 2);

        assert_eq!(grid.toggle_flag(pos), Some(true));
        assert_eq!(grid.flags_placed(), 1);
        assert_eq!(grid.mines_remaining(), 3);

        assert_eq!(grid.toggle_flag(pos), Some(false));
        assert_eq!(grid.flags_placed(), 0);
        assert!(!grid.cell(pos).unwrap().is_flagged());
    }

    #[test]
    fn test_flag_ignored_on_revealed_cell() {
        let mut grid = Grid::with_mines(3, 3, &[Position::new(2, 2)]).unwrap();
        let pos = Position::new(1, 1);
        grid.reveal(pos);

        assert_eq!(grid.toggle_flag(pos), None);
        assert_eq!(grid.flags_placed(), 0);
    }

    #[test]
    fn test_flag_ignored_off_grid() {
        let mut grid = Grid::with_seed(3, 3, 1, 0).unwrap();
        assert_eq!(grid.toggle_flag(Position::new(-1, 5)), None);
        assert_eq!(grid.flags_placed(), 0);
    }

    #[test]
    fn test_over_flagging_goes_negative() {
        let mut grid = Grid::with_seed(3, 3, 1, 0).unwrap();
        grid.toggle_flag(Position::new(0, 0));
        grid.toggle_flag(Position::new(1, 0));
        assert_eq!(grid.mines_remaining(), -1);
    }
}
