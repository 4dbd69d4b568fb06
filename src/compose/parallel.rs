// src/compose/parallel.rs

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::compose::{RunReport, Step, StepFuture};
use crate::types::TaskResult;

/// Runs all members concurrently.
///
/// The group completes once every member has completed, successfully or not.
/// Completion order between members is unspecified.
pub struct Parallel {
    name: String,
    steps: Vec<Arc<dyn Step>>,
}

impl fmt::Debug for Parallel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<&str> = self.steps.iter().map(|s| s.name()).collect();
        f.debug_struct("Parallel")
            .field("name", &self.name)
            .field("members", &members)
            .finish()
    }
}

impl Parallel {
    pub fn new(name: impl Into<String>, steps: Vec<Arc<dyn Step>>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }
}

impl Step for Parallel {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> StepFuture<'_> {
        Box::pin(async move {
            debug!(group = %self.name, members = self.steps.len(), "starting parallel group");

            let handles: Vec<(String, JoinHandle<RunReport>)> = self
                .steps
                .iter()
                .map(|step| {
                    let step = Arc::clone(step);
                    let name = step.name().to_string();
                    (name, tokio::spawn(async move { step.run().await }))
                })
                .collect();

            let mut report = RunReport::default();
            for (name, handle) in handles {
                match handle.await {
                    Ok(member) => report.extend(member),
                    Err(err) => {
                        warn!(group = %self.name, step = %name, error = %err, "member aborted");
                        report
                            .results
                            .push(TaskResult::failed(name, 0, format!("step aborted: {err}")));
                    }
                }
            }

            debug!(
                group = %self.name,
                failed = report.failed_count(),
                "parallel group completed"
            );
            report.log();
            report
        })
    }
}
