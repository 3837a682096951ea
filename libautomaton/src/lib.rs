//! Cellular automata on a toroidal square grid.
//!
//! Two rule sets share one engine: [`GameOfLife`], the classical binary automaton, and
//! [`DormantLife`], which adds a dormant state whose reawakening probability decays while a cell
//! stays dormant. Both read the grid as it stood at the start of a step and write the next
//! generation into a separate buffer.

use std::fmt;

use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use board::Grid;
use cell::CellState;
use error::AutomatonError;

pub mod board;
pub mod cell;
pub mod dormant;
pub mod error;
pub mod life;
pub mod lifetime;
pub mod neighbors;
pub mod pos;
pub mod rule;
pub mod transitions;

pub use cell::{DormantCell, LifeCell};
pub use dormant::{DecayFactor, DormantDensities, DormantLife};
pub use life::GameOfLife;

/// Smallest side a periodic grid may have for a Moore neighbourhood to make sense.
pub const MIN_SIDE: usize = 3;

/// State shared by every rule set: the grid, the time counter, the random source and the
/// neighbour counts of the latest step.
#[derive(Debug, Clone)]
pub struct AutomatonCore<S> {
    grid: Grid<S>,
    t: u64,
    rng: StdRng,
    alive_neighbor_counts: Option<Grid<u8>>,
}

impl<S> AutomatonCore<S>
where
    S: CellState,
{
    /// Takes ownership of a typed grid. `Some(seed)` makes the random source reproducible,
    /// `None` seeds it from the operating system.
    pub fn new(grid: Grid<S>, seed: Option<u64>) -> Result<Self, AutomatonError> {
        if grid.side() < MIN_SIDE {
            return Err(AutomatonError::TooSmall { side: grid.side() });
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        debug!(side = grid.side(), ?seed, "automaton created");

        Ok(Self {
            grid,
            t: 0,
            rng,
            alive_neighbor_counts: None,
        })
    }

    /// Decodes raw rows through the stable encoding of [`cell`], checking shape, size and the
    /// state set, in that order.
    pub fn from_codes(rows: Vec<Vec<u8>>, seed: Option<u64>) -> Result<Self, AutomatonError> {
        let codes = Grid::from_rows(rows)?;

        if codes.side() < MIN_SIDE {
            return Err(AutomatonError::TooSmall { side: codes.side() });
        }

        let grid = codes.try_map(|pos, &value| {
            S::from_code(value).ok_or(AutomatonError::InvalidCell {
                row: pos.row,
                col: pos.col,
                value,
            })
        })?;

        Self::new(grid, seed)
    }

    pub fn grid(&self) -> &Grid<S> {
        &self.grid
    }

    pub fn t(&self) -> u64 {
        self.t
    }

    pub fn side(&self) -> usize {
        self.grid.side()
    }

    pub fn alive_count(&self) -> usize {
        self.grid.count(|cell| *cell == S::ALIVE)
    }

    pub fn alive_neighbor_counts(&self) -> Option<&Grid<u8>> {
        self.alive_neighbor_counts.as_ref()
    }

    pub fn compute_neighbor_counts_for(&self, state: S) -> Grid<u8> {
        neighbors::count_neighbors(&self.grid, state)
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub(crate) fn replace_grid(&mut self, grid: Grid<S>) {
        debug_assert_eq!(grid.side(), self.grid.side());
        self.grid = grid;
    }

    /// Makes `next` the current generation and advances the clock.
    pub(crate) fn commit(&mut self, next: Grid<S>, alive_neighbor_counts: Grid<u8>) {
        self.grid = next;
        self.alive_neighbor_counts = Some(alive_neighbor_counts);
        self.t += 1;
    }
}

/// A rule set driving an [`AutomatonCore`].
///
/// Steps are synchronous: every cell's next state depends only on the grid (and any per-cell
/// rule state) observed when the step began. Parameters are validated before anything is
/// mutated, so a failed call leaves the automaton untouched.
pub trait Automaton {
    type Cell: CellState;

    /// Per-step rule parameters; [`Automaton::step`] uses their default.
    type StepParams: Copy + Default + fmt::Debug;

    /// Probabilities used to draw a fresh grid.
    type InitParams: Copy + fmt::Debug;

    fn core(&self) -> &AutomatonCore<Self::Cell>;

    /// Advances one generation and returns the new grid.
    fn step_with(&mut self, params: Self::StepParams) -> Result<&Grid<Self::Cell>, AutomatonError>;

    /// Replaces the grid with one drawn cell by cell from the automaton's random source.
    fn reinitialize(&mut self, params: Self::InitParams) -> Result<(), AutomatonError>;

    fn step(&mut self) -> Result<&Grid<Self::Cell>, AutomatonError> {
        self.step_with(Self::StepParams::default())
    }

    fn grid(&self) -> &Grid<Self::Cell> {
        self.core().grid()
    }

    fn t(&self) -> u64 {
        self.core().t()
    }

    fn alive_count(&self) -> usize {
        self.core().alive_count()
    }

    /// ALIVE-neighbour counts computed by the latest step, `None` before the first step.
    fn alive_neighbor_counts(&self) -> Option<&Grid<u8>> {
        self.core().alive_neighbor_counts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_checks_shape_then_size_then_values() {
        let ragged = AutomatonCore::<LifeCell>::from_codes(vec![vec![0, 0], vec![0]], None);
        assert!(matches!(ragged, Err(AutomatonError::NotSquare { .. })));

        let tiny = AutomatonCore::<LifeCell>::from_codes(vec![vec![0, 0], vec![0, 7]], None);
        assert_eq!(tiny.unwrap_err(), AutomatonError::TooSmall { side: 2 });

        let foreign = AutomatonCore::<LifeCell>::from_codes(
            vec![vec![0, 0, 0], vec![0, 2, 0], vec![0, 0, 0]],
            None,
        );
        assert_eq!(
            foreign.unwrap_err(),
            AutomatonError::InvalidCell {
                row: 1,
                col: 1,
                value: 2
            }
        );
    }

    #[test]
    fn empty_and_single_cell_grids_are_rejected() {
        let empty = AutomatonCore::<DormantCell>::from_codes(Vec::new(), Some(1));
        assert_eq!(empty.unwrap_err(), AutomatonError::TooSmall { side: 0 });

        let single = AutomatonCore::<DormantCell>::from_codes(vec![vec![1]], Some(1));
        assert_eq!(single.unwrap_err(), AutomatonError::TooSmall { side: 1 });
    }

    #[test]
    fn fresh_core_has_no_history() {
        let core =
            AutomatonCore::<DormantCell>::from_codes(vec![vec![1, 2, 0]; 3], Some(0)).unwrap();

        assert_eq!(core.t(), 0);
        assert_eq!(core.alive_count(), 3);
        assert!(core.alive_neighbor_counts().is_none());
        assert_eq!(core.compute_neighbor_counts_for(DormantCell::Dormant)[(0, 0)], 3);
    }
}
