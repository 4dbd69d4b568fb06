// src/compose/sequence.rs

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::compose::{RunReport, Step, StepFuture};
use crate::types::SequencePolicy;

/// Runs members one at a time, in order.
///
/// A member starts only after the previous member has completed. With
/// `SequencePolicy::FailFast` the sequence stops at the first failing member.
pub struct Sequence {
    name: String,
    policy: SequencePolicy,
    steps: Vec<Arc<dyn Step>>,
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<&str> = self.steps.iter().map(|s| s.name()).collect();
        f.debug_struct("Sequence")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("members", &members)
            .finish()
    }
}

impl Sequence {
    pub fn new(
        name: impl Into<String>,
        policy: SequencePolicy,
        steps: Vec<Arc<dyn Step>>,
    ) -> Self {
        Self {
            name: name.into(),
            policy,
            steps,
        }
    }
}

impl Step for Sequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> StepFuture<'_> {
        Box::pin(async move {
            let mut report = RunReport::default();

            for step in &self.steps {
                debug!(sequence = %self.name, step = %step.name(), "starting step");
                let member = step.run().await;
                let failed = !member.is_success();
                report.extend(member);

                if failed && self.policy == SequencePolicy::FailFast {
                    warn!(
                        sequence = %self.name,
                        step = %step.name(),
                        "step failed; skipping remaining steps"
                    );
                    break;
                }
            }

            report
        })
    }
}
