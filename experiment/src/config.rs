use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, ensure};
use clap::ValueEnum;
use libautomaton::cell::DormantCell;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Extinction curve averaging.
    pub curve: CurveConfig,

    /// Lifetime distribution sampling.
    pub lifetimes: LifetimeConfig,

    /// Directory that receives every output file.
    pub output_dir: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            curve: CurveConfig::default(),
            lifetimes: LifetimeConfig::default(),
            output_dir: PathBuf::from("results"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CurveConfig {
    /// The number of independent runs averaged into each curve.
    pub runs: usize,

    /// The last time step recorded, curves hold `t_max + 1` points.
    pub t_max: usize,

    /// Run `i` seeds both its initial grid and its automaton with `base_seed + i`.
    pub base_seed: u64,

    /// Grid sides to simulate, one curve (or pair of curves) per side.
    pub sizes: Vec<usize>,

    pub decay_factor: f64,

    /// Probability of a cell being alive in the initial grid.
    pub initial_alive: f64,

    /// Whether to also run the classical automaton from the same initial grids.
    pub include_life: bool,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            t_max: 2000,
            base_seed: 100,
            sizes: vec![30],
            decay_factor: 1.0,
            initial_alive: 0.2,
            include_life: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LifetimeConfig {
    pub runs: usize,
    pub side: usize,
    pub base_seed: u64,

    /// Number of steps observed after the initial grid.
    pub steps: usize,

    /// Runs that began before this observation index are left out.
    pub transient: usize,

    pub decay_factor: f64,
    pub p_alive: f64,
    pub p_dorm: f64,
    pub state: TrackedState,
}

impl Default for LifetimeConfig {
    fn default() -> Self {
        Self {
            runs: 50,
            side: 30,
            base_seed: 100,
            steps: 500,
            transient: 50,
            decay_factor: 0.9,
            p_alive: 0.2,
            p_dorm: 0.0,
            state: TrackedState::Alive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrackedState {
    Dead,
    Alive,
    Dormant,
}

impl From<TrackedState> for DormantCell {
    fn from(value: TrackedState) -> Self {
        match value {
            TrackedState::Dead => DormantCell::Dead,
            TrackedState::Alive => DormantCell::Alive,
            TrackedState::Dormant => DormantCell::Dormant,
        }
    }
}

impl ExperimentConfig {
    pub fn load<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let config_serialized = fs::read(path).context("Couldn't read config")?;
        let config =
            serde_json::from_slice(&config_serialized).context("Couldn't deserialize config")?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let curve = &self.curve;
        ensure!(curve.runs > 0, "curve.runs must be positive");
        ensure!(!curve.sizes.is_empty(), "curve.sizes must name at least one grid side");
        ensure!(
            (0.0..=1.0).contains(&curve.initial_alive),
            "curve.initial_alive must lie in [0, 1]"
        );

        let lifetimes = &self.lifetimes;
        ensure!(lifetimes.runs > 0, "lifetimes.runs must be positive");
        ensure!(
            lifetimes.transient <= lifetimes.steps,
            "lifetimes.transient must not exceed lifetimes.steps"
        );

        // Sides, decay factors and densities are checked by the automaton itself.
        Ok(())
    }
}
