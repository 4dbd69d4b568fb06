// src/transform/mod.rs

//! A single source-pattern-to-destination conversion unit.
//!
//! - [`pattern`] compiles and resolves source globs.
//! - [`processor`] is the per-file transformation seam.
//! - [`rename`] holds output path mappers.
//!
//! A [`Transform`] resolves its pattern, runs the processor on every matched
//! file and writes the outputs below its destination directory. Every file is
//! attempted; failures are collected into the `TaskResult` instead of
//! aborting the batch.

pub mod pattern;
pub mod processor;
pub mod rename;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::compose::{RunReport, Step, StepFuture};
use crate::errors::TransformError;
use crate::fs::FileSystem;
use crate::types::TaskResult;

pub use pattern::{glob_base, SourcePattern};
pub use processor::{BlockingProcessor, FnProcessor, Processor, SourceFile};
pub use rename::RenameFn;

pub struct Transform {
    name: String,
    root: PathBuf,
    source: SourcePattern,
    destination: PathBuf,
    processor: Arc<dyn Processor>,
    rename: Option<RenameFn>,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("rename", &self.rename.is_some())
            .finish_non_exhaustive()
    }
}

impl Transform {
    /// `destination` is relative to `root`, like the source pattern.
    pub fn new(
        name: impl Into<String>,
        root: impl Into<PathBuf>,
        source: SourcePattern,
        destination: impl Into<PathBuf>,
        processor: Arc<dyn Processor>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            source,
            destination: destination.into(),
            processor,
            rename: None,
            fs,
        }
    }

    pub fn with_rename(mut self, rename: RenameFn) -> Self {
        self.rename = Some(rename);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &SourcePattern {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Where the output for `relative` (relative to the glob base) lands.
    pub fn output_path(&self, relative: &Path) -> PathBuf {
        let relative = match &self.rename {
            Some(rename) => rename(relative),
            None => relative.to_path_buf(),
        };
        self.root.join(&self.destination).join(relative)
    }

    /// Run the transform once over the current contents of the filesystem.
    pub async fn execute(&self) -> TaskResult {
        info!(transform = %self.name, pattern = %self.source, "starting transform");

        let files = match self.resolve_sources().await {
            Ok(files) => files,
            Err(err) => {
                let err = TransformError::pattern(self.source.as_str(), &err);
                error!(transform = %self.name, error = %err, "source resolution failed");
                return TaskResult::from_errors(&self.name, 0, &[err]);
            }
        };

        if files.is_empty() {
            debug!(transform = %self.name, "pattern matched no files");
        }

        let mut processed = 0;
        let mut errors = Vec::new();

        for path in files {
            match self.process_file(path).await {
                Ok(output) => {
                    processed += 1;
                    debug!(transform = %self.name, output = ?output, "wrote output");
                }
                Err(err) => {
                    warn!(transform = %self.name, error = %err, "file failed");
                    errors.push(err);
                }
            }
        }

        TaskResult::from_errors(&self.name, processed, &errors)
    }

    async fn resolve_sources(&self) -> Result<Vec<PathBuf>> {
        let source = self.source.clone();
        let root = self.root.clone();
        blocking(&self.fs, move |fs| source.resolve(fs, &root)).await
    }

    async fn process_file(&self, path: PathBuf) -> std::result::Result<PathBuf, TransformError> {
        let contents = {
            let read_path = path.clone();
            blocking(&self.fs, move |fs| fs.read(&read_path))
                .await
                .map_err(|e| TransformError::transform(&path, &e))?
        };

        let base = self.root.join(self.source.base());
        let relative = match path.strip_prefix(&base) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => PathBuf::from(path.file_name().unwrap_or(path.as_os_str())),
        };

        let input = SourceFile {
            path,
            relative,
            contents,
        };

        let output = self
            .processor
            .process(&input)
            .await
            .map_err(|e| TransformError::transform(&input.path, &e))?;

        let out_path = self.output_path(&input.relative);
        {
            let write_path = out_path.clone();
            blocking(&self.fs, move |fs| fs.write(&write_path, &output))
                .await
                .map_err(|e| TransformError::write(&out_path, &e))?;
        }

        Ok(out_path)
    }
}

impl Step for Transform {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> StepFuture<'_> {
        Box::pin(async move { RunReport::single(self.execute().await) })
    }
}

/// Run a filesystem call on the blocking pool.
async fn blocking<T, F>(fs: &Arc<dyn FileSystem>, f: F) -> Result<T>
where
    F: FnOnce(&dyn FileSystem) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let fs = Arc::clone(fs);
    tokio::task::spawn_blocking(move || f(fs.as_ref()))
        .await
        .context("filesystem worker panicked")?
}
