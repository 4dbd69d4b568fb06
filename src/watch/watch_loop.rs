// src/watch/watch_loop.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::compose::Step;
use crate::watch::state::{WatchCommand, WatchEvent, WatcherState};

/// Drives a [`WatcherState`] from a channel of [`WatchEvent`]s and runs the
/// trigger step when the state machine asks for it.
///
/// The triggered step runs in its own task; its completion is fed back into
/// the same channel as `WatchEvent::RunCompleted`.
pub struct WatchLoop {
    state: WatcherState,
    event_tx: mpsc::Sender<WatchEvent>,
    event_rx: mpsc::Receiver<WatchEvent>,
    on_trigger: Arc<dyn Step>,
}

impl fmt::Debug for WatchLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchLoop")
            .field("state", &self.state)
            .field("on_trigger", &self.on_trigger.name())
            .finish_non_exhaustive()
    }
}

impl WatchLoop {
    /// `event_tx` must feed `event_rx`; the loop uses it to report run
    /// completion.
    pub fn new(
        state: WatcherState,
        event_tx: mpsc::Sender<WatchEvent>,
        event_rx: mpsc::Receiver<WatchEvent>,
        on_trigger: Arc<dyn Step>,
    ) -> Self {
        Self {
            state,
            event_tx,
            event_rx,
            on_trigger,
        }
    }

    /// Run until a `Shutdown` event arrives. Returns the final state.
    pub async fn run(mut self) -> WatcherState {
        debug!(window = ?self.state.window(), "watch loop started");

        loop {
            let deadline = self.state.deadline();

            let event = tokio::select! {
                received = self.event_rx.recv() => match received {
                    Some(event) => event,
                    None => {
                        info!("watch event channel closed; exiting");
                        break;
                    }
                },
                _ = sleep_until_armed(deadline) => WatchEvent::DebounceElapsed,
            };

            match &event {
                WatchEvent::Changed(path) => debug!(?path, "change detected"),
                WatchEvent::RunCompleted(report) => {
                    info!(
                        failed = report.failed_count(),
                        files = report.files_processed(),
                        "rebuild finished; waiting for changes"
                    );
                }
                _ => {}
            }

            for command in self.state.handle(event, Instant::now()) {
                match command {
                    WatchCommand::StartRun => self.start_run(),
                    WatchCommand::Exit => {
                        info!("shutdown requested; stopping watcher");
                        return self.state;
                    }
                }
            }
        }

        self.state
    }

    fn start_run(&self) {
        let step = Arc::clone(&self.on_trigger);
        let tx = self.event_tx.clone();

        info!(step = %step.name(), "rebuilding");
        tokio::spawn(async move {
            let report = step.run().await;
            if tx.send(WatchEvent::RunCompleted(report)).await.is_err() {
                debug!("watch loop gone before run completed");
            }
        });
    }
}

async fn sleep_until_armed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
