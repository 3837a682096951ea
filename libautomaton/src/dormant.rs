//! The three-state "dormant life" automaton.
//!
//! Alive cells with a single alive neighbour go dormant instead of dying. A dormant cell with
//! three alive neighbours always wakes up; with two it wakes up with a per-cell probability that
//! starts at 1 when the cell goes dormant and is multiplied by the decay factor on every step.
//! A decay factor of 1 gives the deterministic variant, 0 never wakes cells on two neighbours.

use rand::Rng;
use tracing::{debug, trace};

use crate::{
    Automaton, AutomatonCore,
    board::Grid,
    cell::DormantCell,
    error::{AutomatonError, check_probability},
};

/// Per-step multiplicative shrinkage of the reawakening probabilities, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayFactor(pub f64);

impl Default for DecayFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f64> for DecayFactor {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// Cell probabilities for a freshly drawn grid; whatever is left over is the dead probability
/// and must stay positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DormantDensities {
    pub p_alive: f64,
    pub p_dorm: f64,
}

#[derive(Debug, Clone)]
pub struct DormantLife {
    core: AutomatonCore<DormantCell>,

    /// Probability that a dormant cell with exactly two alive neighbours wakes up this step.
    p_grid: Grid<f64>,
}

impl DormantLife {
    /// Builds the automaton from raw rows encoded as `0` (dead), `1` (alive) and `2` (dormant).
    pub fn new(rows: Vec<Vec<u8>>, seed: Option<u64>) -> Result<Self, AutomatonError> {
        Ok(Self::with_core(AutomatonCore::from_codes(rows, seed)?))
    }

    pub fn from_grid(grid: Grid<DormantCell>, seed: Option<u64>) -> Result<Self, AutomatonError> {
        Ok(Self::with_core(AutomatonCore::new(grid, seed)?))
    }

    pub fn p_grid(&self) -> &Grid<f64> {
        &self.p_grid
    }

    /// Shorthand for [`Automaton::step_with`] with a bare decay factor.
    pub fn step_decay(&mut self, decay_factor: f64) -> Result<&Grid<DormantCell>, AutomatonError> {
        self.step_with(DecayFactor(decay_factor))
    }

    fn with_core(core: AutomatonCore<DormantCell>) -> Self {
        let p_grid = Grid::filled(core.side(), 1.0);
        Self { core, p_grid }
    }
}

impl Automaton for DormantLife {
    type Cell = DormantCell;
    type StepParams = DecayFactor;
    type InitParams = DormantDensities;

    fn core(&self) -> &AutomatonCore<DormantCell> {
        &self.core
    }

    fn step_with(
        &mut self,
        DecayFactor(alpha): DecayFactor,
    ) -> Result<&Grid<DormantCell>, AutomatonError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(AutomatonError::DecayFactorOutOfRange(alpha));
        }

        for p in self.p_grid.cells_mut() {
            *p *= alpha;
        }

        // One draw per cell, row-major, whether or not the cell ends up consulting it. This
        // keeps seeded runs reproducible regardless of the grid contents.
        let side = self.core.side();
        let rng = self.core.rng_mut();
        let decisions = Grid::from_fn(side, |_| rng.random::<f64>());

        let grid = self.core.grid();
        let counts = self.core.compute_neighbor_counts_for(DormantCell::Alive);

        let next = Grid::from_fn(side, |pos| match (grid[pos], counts[pos]) {
            (DormantCell::Dead, 3) => DormantCell::Alive,
            (DormantCell::Dormant, 2) if decisions[pos] < self.p_grid[pos] => DormantCell::Alive,
            (DormantCell::Dormant, 3) => DormantCell::Alive,
            (DormantCell::Alive, 0 | 4..) => DormantCell::Dead,
            (DormantCell::Alive, 1) => DormantCell::Dormant,
            (cell, _) => cell,
        });

        // Cells going dormant this step start from full strength, after the decay above.
        for (pos, p) in self.p_grid.enumerate_mut() {
            if grid[pos] == DormantCell::Alive && counts[pos] == 1 {
                *p = 1.0;
            }
        }

        self.core.commit(next, counts);
        trace!(
            t = self.core.t(),
            alpha,
            alive = self.core.alive_count(),
            "dormant step"
        );
        Ok(self.core.grid())
    }

    fn reinitialize(
        &mut self,
        DormantDensities { p_alive, p_dorm }: DormantDensities,
    ) -> Result<(), AutomatonError> {
        let p_alive = check_probability("p_alive", p_alive)?;
        let p_dorm = check_probability("p_dorm", p_dorm)?;
        if p_alive + p_dorm >= 1.0 {
            return Err(AutomatonError::ProbabilitiesTooLarge { p_alive, p_dorm });
        }

        let side = self.core.side();
        let rng = self.core.rng_mut();
        let grid = Grid::from_fn(side, |_| {
            let roll = rng.random::<f64>();

            if roll < p_alive {
                DormantCell::Alive
            } else if roll < p_alive + p_dorm {
                DormantCell::Dormant
            } else {
                DormantCell::Dead
            }
        });

        self.core.replace_grid(grid);
        debug!(p_alive, p_dorm, alive = self.core.alive_count(), "dormant grid reinitialized");
        Ok(())
    }
}
