use std::{path::PathBuf, time::Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use config::{ExperimentConfig, TrackedState};
use extinction::{CurveSettings, Series, alive_fraction_curve};
use libautomaton::{DecayFactor, DormantCell, DormantLife, GameOfLife};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod extinction;
mod lifetimes;
mod output;

/// Batch experiments over the binary and dormant automatons.
#[derive(Debug, Parser)]
struct Cli {
    /// Prefix of every output file, defaults to today's date.
    #[arg(long)]
    run_id: Option<String>,

    /// JSON file holding an experiment config; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Average alive fraction over time, per grid size.
    Extinction {
        #[arg(long)]
        runs: Option<usize>,

        #[arg(long)]
        t_max: Option<usize>,

        #[arg(long)]
        decay_factor: Option<f64>,
    },

    /// Pooled distribution of how long cells stay in one state.
    Lifetimes {
        #[arg(long, value_enum)]
        state: Option<TrackedState>,

        #[arg(long)]
        runs: Option<usize>,

        #[arg(long)]
        decay_factor: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let run_id = cli
        .run_id
        .unwrap_or_else(|| chrono::Local::now().format("%Y%m%d").to_string());

    let mut config = match &cli.config {
        Some(config_path) => ExperimentConfig::load(config_path)?,
        None => ExperimentConfig::default(),
    };

    match cli.command {
        Command::Extinction {
            runs,
            t_max,
            decay_factor,
        } => {
            let curve = &mut config.curve;
            curve.runs = runs.unwrap_or(curve.runs);
            curve.t_max = t_max.unwrap_or(curve.t_max);
            curve.decay_factor = decay_factor.unwrap_or(curve.decay_factor);

            config.validate()?;
            run_extinction(&run_id, &config)
        }

        Command::Lifetimes {
            state,
            runs,
            decay_factor,
        } => {
            let lifetimes = &mut config.lifetimes;
            lifetimes.state = state.unwrap_or(lifetimes.state);
            lifetimes.runs = runs.unwrap_or(lifetimes.runs);
            lifetimes.decay_factor = decay_factor.unwrap_or(lifetimes.decay_factor);

            config.validate()?;
            run_lifetimes(&run_id, &config)
        }
    }
}

fn run_extinction(run_id: &str, config: &ExperimentConfig) -> anyhow::Result<()> {
    let curve_config = &config.curve;
    let mut series = Vec::new();

    for &side in &curve_config.sizes {
        let settings = CurveSettings {
            runs: curve_config.runs,
            t_max: curve_config.t_max,
            side,
            base_seed: curve_config.base_seed,
            initial_alive: curve_config.initial_alive,
        };

        let started = Instant::now();
        let values = alive_fraction_curve(
            &settings,
            DecayFactor(curve_config.decay_factor),
            |rows, seed| DormantLife::new(rows, Some(seed)),
        )
        .with_context(|| format!("Dormant life runs failed for side {side}"))?;
        let dormant_series = Series {
            label: format!("dl_{side}"),
            values,
        };
        report_series(&settings, started, dormant_series, &mut series);

        if curve_config.include_life {
            let started = Instant::now();
            let values = alive_fraction_curve(&settings, (), |rows, seed| {
                GameOfLife::new(rows, Some(seed))
            })
            .with_context(|| format!("Game of life runs failed for side {side}"))?;
            let life_series = Series {
                label: format!("gol_{side}"),
                values,
            };
            report_series(&settings, started, life_series, &mut series);
        }
    }

    let path = config.output_dir.join(format!("{run_id}_extinction.csv"));
    output::save_curves(&path, &series)?;
    info!(path = %path.display(), "curves saved");

    Ok(())
}

fn report_series(
    settings: &CurveSettings,
    started: Instant,
    series: Series,
    all: &mut Vec<Series>,
) {
    let runs_per_second = settings.runs as f32 / started.elapsed().as_secs_f32();

    let half_life = series
        .crossing_below(0.5)
        .map(|t| format!("{t:6}"))
        .unwrap_or_else(|| "     -".to_owned());

    println!(
        "{:>8}: final {} | half-life {} | {:6.2} runs/s",
        series.label.bold(),
        fraction_colored(series.last()),
        half_life,
        runs_per_second,
    );

    all.push(series);
}

fn run_lifetimes(run_id: &str, config: &ExperimentConfig) -> anyhow::Result<()> {
    let lifetime_config = &config.lifetimes;

    let started = Instant::now();
    let distribution =
        lifetimes::pooled_lifetimes(lifetime_config).context("Lifetime runs failed")?;

    let samples: usize = distribution.values().sum();
    let mean = lifetimes::mean_lifetime(&distribution)
        .map(|mean| format!("{mean:.2}").green())
        .unwrap_or_else(|| "-".red());

    println!(
        "{} lifetimes: {} samples | mean {} | {:.2}s",
        DormantCell::from(lifetime_config.state),
        samples,
        mean,
        started.elapsed().as_secs_f32(),
    );

    let path = config.output_dir.join(format!("{run_id}_lifetimes.json"));
    output::save_json(&path, &distribution)?;
    info!(path = %path.display(), "lifetime distribution saved");

    Ok(())
}

fn fraction_colored(fraction: f64) -> ColoredString {
    let formatted = format!("{fraction:6.4}");

    match fraction {
        0.5.. => formatted.bright_green(),
        0.1.. => formatted.yellow(),
        _ => formatted.bright_red(),
    }
}
