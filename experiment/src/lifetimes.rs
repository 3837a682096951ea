use libautomaton::{
    Automaton, DecayFactor, DormantDensities, DormantLife,
    error::AutomatonError,
    lifetime::{LifetimeDistribution, lifetime_distribution, merge_distributions},
};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::debug;

use crate::config::LifetimeConfig;

/// Pools the lifetime distributions of independent dormant-life runs.
///
/// Each run starts from an empty grid seeded with `base_seed + i` and redraws it with the
/// configured densities before observation begins.
pub fn pooled_lifetimes(config: &LifetimeConfig) -> Result<LifetimeDistribution, AutomatonError> {
    (0..config.runs as u64)
        .into_par_iter()
        .map(|run| {
            let seed = config.base_seed.wrapping_add(run);
            let empty = vec![vec![0; config.side]; config.side];
            let mut automaton = DormantLife::new(empty, Some(seed))?;

            automaton.reinitialize(DormantDensities {
                p_alive: config.p_alive,
                p_dorm: config.p_dorm,
            })?;

            let distribution = lifetime_distribution(
                &mut automaton,
                config.state.into(),
                config.steps,
                DecayFactor(config.decay_factor),
                config.transient,
            )?;

            debug!(run, samples = distribution.values().sum::<usize>(), "lifetime run finished");
            Ok::<_, AutomatonError>(distribution)
        })
        .try_reduce(LifetimeDistribution::new, |mut total, distribution| {
            merge_distributions(&mut total, &distribution);
            Ok(total)
        })
}

/// Mean lifetime over all samples, `None` for an empty distribution.
pub fn mean_lifetime(distribution: &LifetimeDistribution) -> Option<f64> {
    let samples: usize = distribution.values().sum();
    let total: usize = distribution
        .iter()
        .map(|(lifetime, count)| lifetime * count)
        .sum();

    (samples > 0).then(|| total as f64 / samples as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackedState;

    fn config() -> LifetimeConfig {
        LifetimeConfig {
            runs: 3,
            side: 10,
            base_seed: 1,
            steps: 40,
            transient: 5,
            decay_factor: 0.8,
            p_alive: 0.3,
            p_dorm: 0.1,
            state: TrackedState::Alive,
        }
    }

    #[test]
    fn pooled_runs_are_reproducible() {
        let first = pooled_lifetimes(&config()).unwrap();
        let second = pooled_lifetimes(&config()).unwrap();

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn pooled_equals_sum_of_single_runs() {
        let pooled = pooled_lifetimes(&config()).unwrap();

        let mut summed = LifetimeDistribution::new();
        for run in 0..3 {
            let single = LifetimeConfig {
                runs: 1,
                base_seed: 1 + run,
                ..config()
            };
            merge_distributions(&mut summed, &pooled_lifetimes(&single).unwrap());
        }

        assert_eq!(pooled, summed);
    }

    #[test]
    fn invalid_densities_are_reported() {
        let config = LifetimeConfig {
            p_alive: 0.6,
            p_dorm: 0.6,
            ..config()
        };

        assert!(matches!(
            pooled_lifetimes(&config),
            Err(AutomatonError::ProbabilitiesTooLarge { .. })
        ));
    }

    #[test]
    fn mean_weights_by_count() {
        let distribution = LifetimeDistribution::from([(0, 6), (3, 2)]);

        assert_eq!(mean_lifetime(&distribution), Some(0.75));
        assert_eq!(mean_lifetime(&LifetimeDistribution::new()), None);
    }
}
