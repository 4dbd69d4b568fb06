// src/registry.rs

//! The fixed set of transforms a build runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::compose::{Parallel, Step};
use crate::config::ConfigFile;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::processors;
use crate::transform::{SourcePattern, Transform};
use crate::types::AssetClass;

/// Read-only list of the four asset transforms (styles, scripts, raster
/// images, vector images).
///
/// Built once from config at startup; there is no API to add or replace
/// transforms afterwards.
#[derive(Debug)]
pub struct TaskRegistry {
    root: PathBuf,
    transforms: Vec<Arc<Transform>>,
}

impl TaskRegistry {
    /// Build the registry. Patterns and destinations are resolved against
    /// `root`.
    pub fn from_config(
        cfg: &ConfigFile,
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let root = root.into();
        let mut transforms = Vec::with_capacity(AssetClass::ALL.len());

        for class in AssetClass::ALL {
            let source = SourcePattern::new(cfg.pattern(class), &processors::excludes_for(class))
                .with_context(|| format!("compiling pattern for '{class}'"))?;

            let mut transform = Transform::new(
                class.task_name(),
                root.clone(),
                source,
                class.destination(),
                processors::processor_for(class),
                Arc::clone(&fs),
            );
            if let Some(rename) = processors::rename_for(class) {
                transform = transform.with_rename(rename);
            }

            transforms.push(Arc::new(transform));
        }

        Ok(Self { root, transforms })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn transforms(&self) -> &[Arc<Transform>] {
        &self.transforms
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Transform>> {
        self.transforms.iter().find(|t| t.name() == name)
    }

    /// All transforms as one parallel group.
    pub fn parallel_group(&self, name: &str) -> Parallel {
        let steps: Vec<Arc<dyn Step>> = self
            .transforms
            .iter()
            .map(|t| Arc::clone(t) as Arc<dyn Step>)
            .collect();
        Parallel::new(name, steps)
    }

    /// Source globs of every transform, for the watcher. Excludes are not
    /// applied here; they only narrow which files a transform compiles.
    pub fn watch_patterns(&self) -> Vec<SourcePattern> {
        self.transforms
            .iter()
            .map(|t| t.source().without_excludes())
            .collect()
    }
}
