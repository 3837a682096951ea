use rand::Rng;
use tracing::{debug, trace};

use crate::{
    Automaton, AutomatonCore,
    board::Grid,
    cell::LifeCell,
    error::{AutomatonError, check_probability},
    rule::LifeRule,
};

/// The classical two-state automaton. Deterministic, so stepping never touches the random
/// source.
#[derive(Debug, Clone)]
pub struct GameOfLife {
    core: AutomatonCore<LifeCell>,
    rule: LifeRule,
}

impl GameOfLife {
    /// Builds the automaton from raw rows encoded as `0` (dead) and `1` (alive).
    pub fn new(rows: Vec<Vec<u8>>, seed: Option<u64>) -> Result<Self, AutomatonError> {
        Ok(Self::with_core(AutomatonCore::from_codes(rows, seed)?))
    }

    pub fn from_grid(grid: Grid<LifeCell>, seed: Option<u64>) -> Result<Self, AutomatonError> {
        Ok(Self::with_core(AutomatonCore::new(grid, seed)?))
    }

    /// Swaps Conway's B3/S23 for another Life-like rule.
    pub fn with_rule(mut self, rule: LifeRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn rule(&self) -> &LifeRule {
        &self.rule
    }

    fn with_core(core: AutomatonCore<LifeCell>) -> Self {
        Self {
            core,
            rule: LifeRule::default(),
        }
    }
}

impl Automaton for GameOfLife {
    type Cell = LifeCell;
    type StepParams = ();

    /// Probability of each cell being alive.
    type InitParams = f64;

    fn core(&self) -> &AutomatonCore<LifeCell> {
        &self.core
    }

    fn step_with(&mut self, _params: ()) -> Result<&Grid<LifeCell>, AutomatonError> {
        let grid = self.core.grid();
        let counts = self.core.compute_neighbor_counts_for(LifeCell::Alive);

        let next = Grid::from_fn(grid.side(), |pos| {
            let count = counts[pos] as usize;

            match grid[pos] {
                LifeCell::Alive if !self.rule.survive.contains(&count) => LifeCell::Dead,
                LifeCell::Dead if self.rule.birth.contains(&count) => LifeCell::Alive,
                cell => cell,
            }
        });

        self.core.commit(next, counts);
        trace!(t = self.core.t(), alive = self.core.alive_count(), "life step");
        Ok(self.core.grid())
    }

    fn reinitialize(&mut self, p_alive: f64) -> Result<(), AutomatonError> {
        let p_alive = check_probability("p_alive", p_alive)?;

        let side = self.core.side();
        let rng = self.core.rng_mut();
        let grid = Grid::from_fn(side, |_| {
            if rng.random::<f64>() < p_alive {
                LifeCell::Alive
            } else {
                LifeCell::Dead
            }
        });

        self.core.replace_grid(grid);
        debug!(p_alive, alive = self.core.alive_count(), "life grid reinitialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use LifeCell::{Alive as A, Dead as D};

    fn life(rows: Vec<Vec<LifeCell>>) -> GameOfLife {
        GameOfLife::from_grid(Grid::from_rows(rows).unwrap(), Some(7)).unwrap()
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = vec![
            vec![D, D, D, D, D],
            vec![D, D, D, D, D],
            vec![D, A, A, A, D],
            vec![D, D, D, D, D],
            vec![D, D, D, D, D],
        ];
        let vertical = vec![
            vec![D, D, D, D, D],
            vec![D, D, A, D, D],
            vec![D, D, A, D, D],
            vec![D, D, A, D, D],
            vec![D, D, D, D, D],
        ];

        let mut gol = life(horizontal.clone());

        assert_eq!(gol.step().unwrap().clone().into_rows(), vertical);
        assert_eq!(gol.step().unwrap().clone().into_rows(), horizontal);
        assert_eq!(gol.t(), 2);
    }

    #[test]
    fn isolated_and_crowded_cells_die() {
        let mut gol = life(vec![
            vec![A, D, D, D, D, D],
            vec![D, D, D, D, D, D],
            vec![D, D, D, A, A, A],
            vec![D, D, D, A, A, A],
            vec![D, D, D, A, A, A],
            vec![D, D, D, D, D, D],
        ]);

        let next = gol.step().unwrap().clone();

        assert_eq!(next[(0, 0)], D);
        // Centre of the 3x3 block has eight alive neighbours, its edge midpoints five.
        assert_eq!(next[(3, 4)], D);
        assert_eq!(next[(2, 4)], D);
        // Corners of the block keep three.
        assert_eq!(next[(2, 3)], A);
        assert_eq!(next[(4, 5)], A);
    }

    #[test]
    fn neighbor_counts_are_kept_after_step() {
        let rows = vec![vec![0, 1, 0], vec![0, 1, 0], vec![0, 1, 0]];
        let mut gol = GameOfLife::new(rows, None).unwrap();
        assert!(gol.alive_neighbor_counts().is_none());

        gol.step().unwrap();

        let counts = gol.alive_neighbor_counts().unwrap();
        assert_eq!(counts[(0, 0)], 3);
        assert_eq!(counts[(1, 1)], 2);
    }

    #[test]
    fn custom_rule_is_applied() {
        let rows = vec![
            vec![1, 1, 1, 0, 0],
            vec![1, 0, 1, 0, 0],
            vec![1, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0],
        ];

        let mut conway = GameOfLife::new(rows.clone(), None).unwrap();
        // HighLife births on six as well as three.
        let mut highlife = GameOfLife::new(rows, None)
            .unwrap()
            .with_rule(LifeRule::new(vec![3, 6], vec![2, 3]));

        assert_eq!(highlife.core().compute_neighbor_counts_for(A)[(1, 1)], 6);

        assert_eq!(conway.step().unwrap()[(1, 1)], D);
        assert_eq!(highlife.step().unwrap()[(1, 1)], A);
    }

    #[test]
    fn reinitialize_validates_before_mutating() {
        let rows = vec![vec![0, 1, 0], vec![1, 1, 1], vec![0, 1, 0]];
        let mut gol = GameOfLife::new(rows, Some(3)).unwrap();
        let before = gol.grid().clone();

        for p_alive in [-0.1, 1.5, f64::NAN] {
            let err = gol.reinitialize(p_alive).unwrap_err();
            assert!(matches!(err, AutomatonError::ProbabilityOutOfRange { name: "p_alive", .. }));
            assert_eq!(gol.grid(), &before);
        }
    }

    #[test]
    fn reinitialize_extremes() {
        let mut gol = GameOfLife::new(vec![vec![1; 8]; 8], Some(11)).unwrap();

        gol.reinitialize(0.0).unwrap();
        assert_eq!(gol.alive_count(), 0);

        gol.reinitialize(1.0).unwrap();
        assert_eq!(gol.alive_count(), 64);
        assert_eq!(gol.t(), 0);
    }
}
