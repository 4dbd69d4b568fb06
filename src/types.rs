use std::fmt;

use crate::errors::TransformError;

/// Outcome of a single transform execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Success,
    Failed(String),
}

impl TaskStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Success)
    }
}

/// Per-execution report for one transform (or any other leaf step).
///
/// Created when a step finishes, logged, then dropped; nothing persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub transform_name: String,
    pub status: TaskStatus,
    pub files_processed: usize,
}

impl TaskResult {
    pub fn success(name: impl Into<String>, files_processed: usize) -> Self {
        Self {
            transform_name: name.into(),
            status: TaskStatus::Success,
            files_processed,
        }
    }

    pub fn failed(
        name: impl Into<String>,
        files_processed: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            transform_name: name.into(),
            status: TaskStatus::Failed(reason.into()),
            files_processed,
        }
    }

    /// Build a result from the per-file errors a transform collected.
    pub fn from_errors(
        name: impl Into<String>,
        files_processed: usize,
        errors: &[TransformError],
    ) -> Self {
        if errors.is_empty() {
            return Self::success(name, files_processed);
        }
        let reason = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::failed(name, files_processed, reason)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// What a `Sequence` does after one of its steps fails.
///
/// - `RunToCompletion` (default): keep going; the next step starts once the
///   failed one has completed.
/// - `FailFast`: stop after the first failing step; later steps never start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencePolicy {
    #[default]
    RunToCompletion,
    FailFast,
}

/// The four asset classes known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetClass {
    Style,
    Script,
    Raster,
    Vector,
}

impl AssetClass {
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Style,
        AssetClass::Script,
        AssetClass::Raster,
        AssetClass::Vector,
    ];

    /// Task name used in logs and results.
    pub fn task_name(self) -> &'static str {
        match self {
            AssetClass::Style => "scss",
            AssetClass::Script => "js",
            AssetClass::Raster => "img",
            AssetClass::Vector => "svg",
        }
    }

    /// Key under `[files]` in the config file.
    pub fn config_key(self) -> &'static str {
        match self {
            AssetClass::Style => "scssPath",
            AssetClass::Script => "jsPath",
            AssetClass::Raster => "imgPath",
            AssetClass::Vector => "svgPath",
        }
    }

    pub fn default_pattern(self) -> &'static str {
        match self {
            AssetClass::Style => "src/scss/**/*.scss",
            AssetClass::Script => "src/js/**/*.js",
            AssetClass::Raster => "src/img/**/*.{png,jpg,jpeg}",
            AssetClass::Vector => "src/img/**/*.svg",
        }
    }

    /// Output directory relative to the project root. Raster and vector
    /// images share `dist/img`.
    pub fn destination(self) -> &'static str {
        match self {
            AssetClass::Style => "dist/css",
            AssetClass::Script => "dist/js",
            AssetClass::Raster | AssetClass::Vector => "dist/img",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.task_name())
    }
}
