use std::{
    io,
    process::exit,
    sync::{Arc, RwLock, RwLockWriteGuard},
    time::Duration,
};

use anyhow::{Context, anyhow, bail};
use libautomaton::{Automaton, DormantDensities};

use crate::{Flows, State, ensure_decay_factor, renderer, ticker::TickerHost};

pub fn run_cli(state_arc: Arc<RwLock<State>>) -> anyhow::Result<()> {
    for line_res in io::stdin().lines() {
        let line = line_res.context("Couldn't read stdin")?;
        let args = line.split_whitespace();

        if let Err(e) = handle_cmd(state_arc.clone(), args) {
            eprintln!("! {e:?}");
        }
    }

    Ok(())
}

fn write_state(state_arc: &RwLock<State>) -> anyhow::Result<RwLockWriteGuard<'_, State>> {
    state_arc.write().map_err(|_| anyhow!("State lock poisoned"))
}

fn print_frame(state: &State) {
    println!("{}", renderer::render(state));
}

fn handle_cmd<'a, I>(state_arc: Arc<RwLock<State>>, mut args: I) -> anyhow::Result<()>
where
    I: Iterator<Item = &'a str>,
{
    match args.next().context("No command")? {
        "step" => {
            let times = args.next().unwrap_or("1").parse::<usize>()?;

            let mut state = write_state(&state_arc)?;
            for _ in 0..times {
                state.step()?;
            }
            println!("{}", renderer::render(&state));
        }

        "run" => {
            let rate = args.next().unwrap_or("100").parse::<u64>()?;

            let mut state = write_state(&state_arc)?;
            let rate_applied = state
                .ticker
                .as_mut()
                .is_some_and(|ticker| ticker.set_rate(rate).is_ok());

            // Either nothing is running or the previous ticker exited after a failed step.
            if !rate_applied {
                let interval = Duration::from_millis(rate);
                state.ticker = Some(TickerHost::start(state_arc.clone(), interval, print_frame));
            }
        }

        "stop" => {
            let ticker = write_state(&state_arc)?.ticker.take();
            ticker.context("Not running")?.stop()?;
        }

        "alpha" => {
            let decay_factor = args
                .next()
                .context("missing decay factor")?
                .parse::<f64>()?;
            ensure_decay_factor(decay_factor)?;

            write_state(&state_arc)?.decay_factor = decay_factor;
        }

        "random" => {
            let p_alive = args.next().context("missing p_alive")?.parse::<f64>()?;
            let p_dorm = args.next().unwrap_or("0").parse::<f64>()?;

            let mut state = write_state(&state_arc)?;
            state.dormant.reinitialize(DormantDensities { p_alive, p_dorm })?;
            state.life.reinitialize(p_alive)?;
            state.flows = Flows::default();
            println!("{}", renderer::render(&state));
        }

        "show" => {
            let state = state_arc.read().map_err(|_| anyhow!("State lock poisoned"))?;
            println!("{}", renderer::render(&state));
        }

        "exit" => {
            exit(0);
        }

        _ => bail!("Unknown command"),
    }

    println!("OK");
    Ok(())
}
