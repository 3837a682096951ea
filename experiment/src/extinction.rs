use itertools::Itertools;
use libautomaton::{Automaton, error::AutomatonError};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

#[derive(Debug, Clone, Copy)]
pub struct CurveSettings {
    pub runs: usize,
    pub t_max: usize,
    pub side: usize,
    pub base_seed: u64,
    pub initial_alive: f64,
}

/// A named sequence of values, one per time step.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

impl Series {
    /// First time step at which the value drops below `threshold`.
    pub fn crossing_below(&self, threshold: f64) -> Option<usize> {
        self.values.iter().position(|&value| value < threshold)
    }

    pub fn last(&self) -> f64 {
        self.values.last().copied().unwrap_or_default()
    }
}

/// Draws a binary grid, each cell alive with probability `p_alive`.
pub fn random_rows(side: usize, p_alive: f64, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..side)
        .map(|_| {
            (0..side)
                .map(|_| u8::from(rng.random::<f64>() < p_alive))
                .collect_vec()
        })
        .collect_vec()
}

/// Averages `alive_count / initial_alive_count` over independent runs, for `t = 0..=t_max`.
///
/// Run `i` uses seed `base_seed + i` both for its initial grid and for the automaton the
/// factory builds from it. Runs share nothing and are spread across the rayon pool.
pub fn alive_fraction_curve<A, F>(
    settings: &CurveSettings,
    params: A::StepParams,
    factory: F,
) -> Result<Vec<f64>, AutomatonError>
where
    A: Automaton,
    A::StepParams: Send + Sync,
    F: Fn(Vec<Vec<u8>>, u64) -> Result<A, AutomatonError> + Sync,
{
    let curves = (0..settings.runs as u64)
        .into_par_iter()
        .map(|run| {
            let seed = settings.base_seed.wrapping_add(run);
            let rows = random_rows(settings.side, settings.initial_alive, seed);
            let automaton = factory(rows, seed)?;
            alive_fractions(automaton, settings.t_max, params)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut mean = vec![0.0; settings.t_max + 1];
    for curve in &curves {
        for (total, value) in mean.iter_mut().zip_eq(curve) {
            *total += value;
        }
    }

    let run_count = curves.len().max(1) as f64;
    mean.iter_mut().for_each(|total| *total /= run_count);

    Ok(mean)
}

/// Records the alive fraction before each step. A grid that starts without alive cells
/// yields zeros throughout.
fn alive_fractions<A>(
    mut automaton: A,
    t_max: usize,
    params: A::StepParams,
) -> Result<Vec<f64>, AutomatonError>
where
    A: Automaton,
{
    let initial_alive = automaton.alive_count();
    let mut fractions = Vec::with_capacity(t_max + 1);

    for t in 0..=t_max {
        let fraction = if initial_alive == 0 {
            0.0
        } else {
            automaton.alive_count() as f64 / initial_alive as f64
        };
        fractions.push(fraction);

        if t < t_max {
            automaton.step_with(params)?;
        }
    }

    Ok(fractions)
}
