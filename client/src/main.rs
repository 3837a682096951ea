use std::{
    env,
    sync::{Arc, RwLock},
};

use anyhow::{Context, ensure};
use libautomaton::{
    Automaton, DormantLife, GameOfLife,
    cell::{CellState, DormantCell},
    rule::LifeRule,
    transitions::count_transitions,
};
use ticker::TickerHost;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod renderer;
mod ticker;

const DEFAULT_SIDE: usize = 30;
const DEFAULT_DECAY_FACTOR: f64 = 0.1;
const INITIAL_ALIVE: f64 = 0.2;

pub struct State {
    life: GameOfLife,
    dormant: DormantLife,
    decay_factor: f64,
    flows: Flows,
    ticker: Option<TickerHost>,
}

/// Dormant-automaton cells that changed between ALIVE and DORMANT during the last step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flows {
    pub went_dormant: usize,
    pub woke: usize,
}

impl State {
    /// Both automatons start from the same random binary grid.
    pub fn new(
        side: usize,
        rule: LifeRule,
        decay_factor: f64,
        p_alive: f64,
    ) -> anyhow::Result<Self> {
        ensure_decay_factor(decay_factor)?;

        let mut life = GameOfLife::new(vec![vec![0; side]; side], None)?.with_rule(rule);
        life.reinitialize(p_alive)?;

        let codes = life.grid().map(|cell| cell.code()).into_rows();
        let dormant = DormantLife::new(codes, None)?;

        Ok(Self {
            life,
            dormant,
            decay_factor,
            flows: Flows::default(),
            ticker: None,
        })
    }

    /// Advances both automatons by one step.
    pub fn step(&mut self) -> anyhow::Result<()> {
        use DormantCell::{Alive, Dormant};

        self.life.step()?;

        let before = self.dormant.grid().clone();
        let after = self.dormant.step_decay(self.decay_factor)?;

        self.flows = Flows {
            went_dormant: count_transitions(&before, after, Alive, Dormant)?,
            woke: count_transitions(&before, after, Dormant, Alive)?,
        };

        Ok(())
    }
}

/// Checked up front so that a bad value never leaves the automatons a step apart.
pub fn ensure_decay_factor(decay_factor: f64) -> anyhow::Result<()> {
    ensure!(
        (0.0..=1.0).contains(&decay_factor),
        "Decay factor must lie in [0, 1], got {decay_factor}"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let side = args
        .next()
        .map(|side| side.parse::<usize>())
        .transpose()
        .context("Invalid grid side")?
        .unwrap_or(DEFAULT_SIDE);
    let decay_factor = args
        .next()
        .map(|decay_factor| decay_factor.parse::<f64>())
        .transpose()
        .context("Invalid decay factor")?
        .unwrap_or(DEFAULT_DECAY_FACTOR);
    let rule = args
        .next()
        .map(|rule| rule.parse::<LifeRule>())
        .transpose()?
        .unwrap_or_default();

    info!(side, decay_factor, %rule, "starting viewer");
    let state = State::new(side, rule, decay_factor, INITIAL_ALIVE)?;
    println!("{}", renderer::render(&state));

    cli::run_cli(Arc::new(RwLock::new(state)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn automatons_share_the_initial_grid() {
        let state = State::new(12, LifeRule::default(), 0.5, 0.4).unwrap();

        let life_codes = state.life.grid().map(|cell| cell.code());
        let dormant_codes = state.dormant.grid().map(|cell| cell.code());

        assert_eq!(life_codes, dormant_codes);
        assert_eq!(state.life.alive_count(), state.dormant.alive_count());
    }

    #[test]
    fn step_advances_both() {
        let mut state = State::new(8, LifeRule::default(), 1.0, 0.3).unwrap();
        state.step().unwrap();
        state.step().unwrap();

        assert_eq!(state.life.t(), 2);
        assert_eq!(state.dormant.t(), 2);
    }

    #[test]
    fn flows_follow_the_last_dormant_step() {
        let mut state = State::new(6, LifeRule::default(), 1.0, 0.0).unwrap();
        state.dormant = DormantLife::new(
            vec![
                vec![0, 0, 0, 0, 0, 0],
                vec![0, 0, 1, 0, 0, 0],
                vec![0, 0, 1, 0, 0, 0],
                vec![0, 0, 0, 0, 0, 0],
                vec![0, 0, 0, 0, 0, 0],
                vec![0, 0, 0, 0, 0, 0],
            ],
            Some(3),
        )
        .unwrap();

        state.step().unwrap();
        assert_eq!(
            state.flows,
            Flows {
                went_dormant: 2,
                woke: 0
            }
        );
    }

    #[test]
    fn custom_rule_reaches_the_binary_automaton() {
        let rule: LifeRule = "B36/S23".parse().unwrap();
        let state = State::new(6, rule.clone(), 0.5, 0.2).unwrap();

        assert_eq!(state.life.rule(), &rule);
    }

    #[test]
    fn bad_decay_factor_is_rejected() {
        assert!(State::new(8, LifeRule::default(), 1.5, 0.3).is_err());
        assert!(State::new(8, LifeRule::default(), f64::NAN, 0.3).is_err());
        assert!(ensure_decay_factor(0.0).is_ok());
    }
}
