use std::{
    sync::{
        Arc, RwLock,
        mpsc::{self, Sender},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{Context, anyhow};
use tracing::{debug, warn};

use crate::State;

/// Steps the shared state on a background thread until stopped or until a step fails.
pub struct TickerHost {
    stop_sender: Sender<()>,
    rate_sender: Sender<u64>,
    handle: JoinHandle<()>,
}

impl TickerHost {
    /// `on_tick` sees the state after every successful step, still under the write lock.
    pub fn start<F>(state_arc: Arc<RwLock<State>>, mut interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(&State) + Send + 'static,
    {
        let (stop_sender, stop_receiver) = mpsc::channel();
        let (rate_sender, rate_receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            while stop_receiver.try_recv().is_err() {
                let Ok(mut state) = state_arc.write() else {
                    warn!("state lock poisoned, ticker exiting");
                    break;
                };

                if let Err(e) = state.step() {
                    eprintln!("! {e:?}");
                    break;
                }
                on_tick(&state);
                drop(state);

                if let Ok(rate) = rate_receiver.try_recv() {
                    interval = Duration::from_millis(rate);
                }

                thread::sleep(interval);
            }

            debug!("ticker stopped");
        });

        Self {
            stop_sender,
            rate_sender,
            handle,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Fails once the thread has exited, since nobody is left to pick the rate up.
    pub fn set_rate(&mut self, rate_millis: u64) -> anyhow::Result<()> {
        self.rate_sender
            .send(rate_millis)
            .context("Ticker is no longer running")
    }

    /// Signals the thread and waits for it, so no step happens after this returns.
    pub fn stop(self) -> anyhow::Result<()> {
        // A ticker that exited on its own has dropped its receiver; joining still reaps it.
        let _ = self.stop_sender.send(());
        self.handle
            .join()
            .map_err(|_| anyhow!("Ticker thread panicked"))
    }
}

/// Polls `condition` for up to five seconds.
#[cfg(test)]
pub(crate) fn wait_until<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..1000 {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}
