// src/compose/report.rs

use tracing::{error, info};

use crate::types::{TaskResult, TaskStatus};

/// Leaf results collected by a (possibly composite) step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub results: Vec<TaskResult>,
}

impl RunReport {
    pub fn single(result: TaskResult) -> Self {
        Self {
            results: vec![result],
        }
    }

    pub fn extend(&mut self, other: RunReport) {
        self.results.extend(other.results);
    }

    pub fn is_success(&self) -> bool {
        self.results.iter().all(TaskResult::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn files_processed(&self) -> usize {
        self.results.iter().map(|r| r.files_processed).sum()
    }

    /// Look up a leaf result by name.
    pub fn get(&self, name: &str) -> Option<&TaskResult> {
        self.results.iter().find(|r| r.transform_name == name)
    }

    /// Log every result: successes at info, failures at error.
    pub fn log(&self) {
        for result in &self.results {
            match &result.status {
                TaskStatus::Success => info!(
                    transform = %result.transform_name,
                    files = result.files_processed,
                    "transform finished"
                ),
                TaskStatus::Failed(reason) => error!(
                    transform = %result.transform_name,
                    files = result.files_processed,
                    error = %reason,
                    "transform failed"
                ),
            }
        }
    }
}
