//! Run-length statistics of a cell state over a sequence of observed grids.

use std::collections::BTreeMap;

use crate::{Automaton, board::Grid, cell::CellState, error::AutomatonError};

/// Lifetime (steps survived after entering the state) to number of observed runs.
pub type LifetimeDistribution = BTreeMap<usize, usize>;

/// Tracks, per cell, when the current run of `state` began and buckets every run that ends.
///
/// A run is recorded as `run_length - 1`. Runs that began before observation `transient` are
/// dropped because their entry happened before the window of interest, and runs still open
/// when [`LifetimeTracker::finish`] is called are dropped as censored.
#[derive(Debug, Clone)]
pub struct LifetimeTracker<S> {
    state: S,
    transient: usize,
    observations: usize,
    run_starts: Option<Grid<Option<usize>>>,
    distribution: LifetimeDistribution,
}

impl<S> LifetimeTracker<S>
where
    S: CellState,
{
    pub fn new(state: S, transient: usize) -> Self {
        Self {
            state,
            transient,
            observations: 0,
            run_starts: None,
            distribution: LifetimeDistribution::new(),
        }
    }

    /// Feeds the next grid of the sequence. Every grid must have the side of the first one.
    pub fn observe(&mut self, grid: &Grid<S>) -> Result<(), AutomatonError> {
        let index = self.observations;
        let run_starts = self
            .run_starts
            .get_or_insert_with(|| Grid::filled(grid.side(), None));

        if run_starts.side() != grid.side() {
            return Err(AutomatonError::SideMismatch {
                expected: run_starts.side(),
                actual: grid.side(),
            });
        }

        for (pos, run_start) in run_starts.enumerate_mut() {
            let in_state = grid[pos] == self.state;

            match (*run_start, in_state) {
                (None, true) => *run_start = Some(index),
                (Some(start), false) => {
                    if start >= self.transient {
                        *self.distribution.entry(index - start - 1).or_default() += 1;
                    }
                    *run_start = None;
                }
                _ => {}
            }
        }

        self.observations += 1;
        Ok(())
    }

    pub fn finish(self) -> LifetimeDistribution {
        self.distribution
    }
}

/// Observes `automaton` from its current grid through `steps` further steps and returns the
/// lifetime distribution of `state`.
pub fn lifetime_distribution<A>(
    automaton: &mut A,
    state: A::Cell,
    steps: usize,
    params: A::StepParams,
    transient: usize,
) -> Result<LifetimeDistribution, AutomatonError>
where
    A: Automaton,
{
    let mut tracker = LifetimeTracker::new(state, transient);
    tracker.observe(automaton.grid())?;

    for _ in 0..steps {
        let grid = automaton.step_with(params)?;
        tracker.observe(grid)?;
    }

    Ok(tracker.finish())
}

/// Adds every bucket of `other` into `into`.
pub fn merge_distributions(into: &mut LifetimeDistribution, other: &LifetimeDistribution) {
    for (&lifetime, &count) in other {
        *into.entry(lifetime).or_default() += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecayFactor, DormantLife, cell::DormantCell};

    fn l_tromino() -> DormantLife {
        DormantLife::new(vec![vec![0, 1, 0], vec![0, 1, 1], vec![0, 0, 0]], None).unwrap()
    }

    #[test]
    fn measures_lifetimes() {
        let mut dl = l_tromino();

        let distribution =
            lifetime_distribution(&mut dl, DormantCell::Alive, 3, DecayFactor(0.0), 0).unwrap();

        assert_eq!(distribution, LifetimeDistribution::from([(0, 6), (1, 3)]));
    }

    #[test]
    fn excludes_runs_started_before_transient() {
        let mut dl = l_tromino();

        let distribution =
            lifetime_distribution(&mut dl, DormantCell::Alive, 3, DecayFactor(0.0), 1).unwrap();

        assert_eq!(distribution, LifetimeDistribution::from([(0, 6)]));
    }

    #[test]
    fn open_runs_are_censored() {
        let mut tracker = LifetimeTracker::new(DormantCell::Dormant, 0);
        let dormant = Grid::filled(3, DormantCell::Dormant);

        for _ in 0..4 {
            tracker.observe(&dormant).unwrap();
        }

        assert!(tracker.finish().is_empty());
    }

    #[test]
    fn rejects_grids_of_another_side() {
        let mut tracker = LifetimeTracker::new(DormantCell::Alive, 0);
        tracker.observe(&Grid::filled(3, DormantCell::Dead)).unwrap();

        let err = tracker.observe(&Grid::filled(4, DormantCell::Dead)).unwrap_err();
        assert_eq!(
            err,
            AutomatonError::SideMismatch {
                expected: 3,
                actual: 4
            }
        );
    }

    #[test]
    fn merges_buckets() {
        let mut total = LifetimeDistribution::from([(0, 2), (3, 1)]);
        merge_distributions(&mut total, &LifetimeDistribution::from([(0, 1), (5, 4)]));

        assert_eq!(total, LifetimeDistribution::from([(0, 3), (3, 1), (5, 4)]));
    }
}
