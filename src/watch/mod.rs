// src/watch/mod.rs

//! File watching and rebuild triggering.
//!
//! - [`state`]: the pure debounce state machine (`WatcherState`).
//! - [`watch_loop`]: the async shell that drives the state machine and runs
//!   the trigger step.
//! - [`watcher`]: the `notify` bridge that turns filesystem events on the
//!   source patterns into `WatchEvent::Changed`.
//!
//! [`WatchStep`] wires all three together as a [`Step`] that runs until
//! Ctrl-C, which is how watch mode slots into a `Sequence`.

pub mod state;
pub mod watch_loop;
pub mod watcher;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::compose::{RunReport, Step, StepFuture};
use crate::transform::SourcePattern;
use crate::types::TaskResult;

pub use state::{WatchCommand, WatchEvent, WatchPhase, WatcherState};
pub use watch_loop::WatchLoop;
pub use watcher::{spawn_watcher, WatcherHandle};

/// Watch the given source patterns and run `on_trigger` after every settled
/// burst of changes, until Ctrl-C.
pub struct WatchStep {
    name: String,
    root: PathBuf,
    patterns: Vec<SourcePattern>,
    window: Duration,
    on_trigger: Arc<dyn Step>,
}

impl fmt::Debug for WatchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchStep")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("patterns", &self.patterns)
            .field("window", &self.window)
            .field("on_trigger", &self.on_trigger.name())
            .finish()
    }
}

impl WatchStep {
    pub fn new(
        root: impl Into<PathBuf>,
        patterns: Vec<SourcePattern>,
        window: Duration,
        on_trigger: Arc<dyn Step>,
    ) -> Self {
        Self {
            name: "watch".to_string(),
            root: root.into(),
            patterns,
            window,
            on_trigger,
        }
    }

    async fn watch_until_shutdown(&self) -> Result<()> {
        let (tx, rx) = mpsc::channel::<WatchEvent>(64);

        let _watcher = spawn_watcher(self.root.clone(), self.patterns.clone(), tx.clone())?;

        // Ctrl-C -> graceful shutdown.
        {
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    eprintln!("failed to listen for Ctrl+C: {e}");
                    return;
                }
                let _ = tx.send(WatchEvent::Shutdown).await;
            });
        }

        let patterns: Vec<&str> = self.patterns.iter().map(|p| p.as_str()).collect();
        info!(?patterns, "watching for changes (Ctrl+C to stop)");

        let state = WatcherState::new(self.window);
        let state = WatchLoop::new(state, tx, rx, Arc::clone(&self.on_trigger))
            .run()
            .await;

        info!(rebuilds = state.runs_started(), "watcher stopped");
        Ok(())
    }
}

impl Step for WatchStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> StepFuture<'_> {
        Box::pin(async move {
            let result = match self.watch_until_shutdown().await {
                Ok(()) => TaskResult::success(&self.name, 0),
                Err(err) => {
                    error!(error = %err, "watcher failed");
                    TaskResult::failed(&self.name, 0, format!("{err:#}"))
                }
            };
            RunReport::single(result)
        })
    }
}
