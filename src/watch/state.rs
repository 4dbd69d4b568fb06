// src/watch/state.rs

//! Pure watcher state machine.
//!
//! ```text
//!   Idle --change--> Debouncing --window elapsed--> Running --completed--> Idle
//!                     ^    |                          |
//!                     +----+ change (restart window)  | change: remember rerun
//!                                                     v
//!                                  completed with rerun pending -> Debouncing
//! ```
//!
//! No channels, no timers, no IO: the caller passes the current instant in
//! and executes the returned [`WatchCommand`]s. The async shell lives in
//! [`crate::watch::watch_loop`].

use std::path::PathBuf;

use tokio::time::{Duration, Instant};

use crate::compose::RunReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchPhase {
    Idle,
    /// Waiting for the burst to settle; fires at `deadline`.
    Debouncing { deadline: Instant },
    /// The triggered step is executing.
    Running { rerun_pending: bool },
}

/// Inputs to the watcher.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A watched path changed (relative to the project root).
    Changed(PathBuf),
    /// The debounce timer fired.
    DebounceElapsed,
    /// The triggered step finished.
    RunCompleted(RunReport),
    Shutdown,
}

/// What the shell should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchCommand {
    StartRun,
    Exit,
}

/// Explicitly owned watcher state; one per watch loop.
#[derive(Debug, Clone)]
pub struct WatcherState {
    window: Duration,
    phase: WatchPhase,
    runs_started: u64,
}

impl WatcherState {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            phase: WatchPhase::Idle,
            runs_started: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn phase(&self) -> WatchPhase {
        self.phase
    }

    /// When the debounce timer should fire, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            WatchPhase::Debouncing { deadline } => Some(deadline),
            _ => None,
        }
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    pub fn handle(&mut self, event: WatchEvent, now: Instant) -> Vec<WatchCommand> {
        match event {
            WatchEvent::Changed(_) => {
                self.on_change(now);
                Vec::new()
            }
            WatchEvent::DebounceElapsed => self.on_elapsed(now),
            WatchEvent::RunCompleted(_) => {
                self.on_completed(now);
                Vec::new()
            }
            WatchEvent::Shutdown => vec![WatchCommand::Exit],
        }
    }

    fn on_change(&mut self, now: Instant) {
        self.phase = match self.phase {
            WatchPhase::Idle | WatchPhase::Debouncing { .. } => WatchPhase::Debouncing {
                deadline: now + self.window,
            },
            WatchPhase::Running { .. } => WatchPhase::Running {
                rerun_pending: true,
            },
        };
    }

    fn on_elapsed(&mut self, now: Instant) -> Vec<WatchCommand> {
        match self.phase {
            WatchPhase::Debouncing { deadline } if now >= deadline => {
                self.phase = WatchPhase::Running {
                    rerun_pending: false,
                };
                self.runs_started += 1;
                vec![WatchCommand::StartRun]
            }
            // Stale timer (window was restarted) or nothing armed.
            _ => Vec::new(),
        }
    }

    fn on_completed(&mut self, now: Instant) {
        if let WatchPhase::Running { rerun_pending } = self.phase {
            self.phase = if rerun_pending {
                WatchPhase::Debouncing {
                    deadline: now + self.window,
                }
            } else {
                WatchPhase::Idle
            };
        }
    }
}
