use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::bail;
use tokio::time::Instant;

use sitepipe::compose::{RunReport, Step, StepFuture};
use sitepipe::transform::{FnProcessor, Processor};
use sitepipe::types::TaskResult;

/// Start and end of one execution.
#[derive(Debug, Clone, Copy)]
pub struct Span {
    pub start: Instant,
    pub end: Instant,
}

/// A step that:
/// - records when each execution started and ended
/// - sleeps for a fixed delay
/// - reports success, or failure if built with `failing()`.
pub struct FakeStep {
    name: String,
    delay: Duration,
    fail: bool,
    spans: Mutex<Vec<Span>>,
    runs: AtomicUsize,
}

impl FakeStep {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            delay: Duration::ZERO,
            fail: false,
            spans: Mutex::new(Vec::new()),
            runs: AtomicUsize::new(0),
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn spans(&self) -> Vec<Span> {
        self.spans.lock().unwrap().clone()
    }

    /// Number of executions started so far.
    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl Step for FakeStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> StepFuture<'_> {
        Box::pin(async move {
            self.runs.fetch_add(1, Ordering::SeqCst);
            let start = Instant::now();
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let end = Instant::now();
            self.spans.lock().unwrap().push(Span { start, end });

            let result = if self.fail {
                TaskResult::failed(&self.name, 0, "fake failure")
            } else {
                TaskResult::success(&self.name, 1)
            };
            RunReport::single(result)
        })
    }
}

/// Upcast helper so tests can keep a typed handle to a fake.
pub fn as_step(step: &Arc<FakeStep>) -> Arc<dyn Step> {
    Arc::clone(step) as Arc<dyn Step>
}

/// Processor that upper-cases UTF-8 input.
pub fn upper_case_processor() -> Arc<dyn Processor> {
    Arc::new(FnProcessor::new(|src| Ok(src.text()?.to_uppercase().into_bytes())))
}

/// Processor that copies input, failing for any file whose contents contain
/// `marker`.
pub fn failing_on(marker: &'static str) -> Arc<dyn Processor> {
    Arc::new(FnProcessor::new(move |src| {
        let text = src.text()?;
        if text.contains(marker) {
            bail!("rejected input containing {marker:?}");
        }
        Ok(src.contents.clone())
    }))
}
