#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use sitepipe::config::{ConfigFile, RawConfigFile};
use sitepipe::fs::FileSystem;
use sitepipe::transform::{Processor, RenameFn, SourcePattern, Transform};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.config.debounce_ms = ms;
        self
    }

    pub fn scss_path(mut self, pattern: &str) -> Self {
        self.config.files.scss_path = pattern.to_string();
        self
    }

    pub fn js_path(mut self, pattern: &str) -> Self {
        self.config.files.js_path = pattern.to_string();
        self
    }

    pub fn img_path(mut self, pattern: &str) -> Self {
        self.config.files.img_path = pattern.to_string();
        self
    }

    pub fn svg_path(mut self, pattern: &str) -> Self {
        self.config.files.svg_path = pattern.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a `Transform` with a custom processor.
pub struct TransformBuilder {
    name: String,
    root: PathBuf,
    pattern: String,
    excludes: Vec<String>,
    destination: PathBuf,
    processor: Arc<dyn Processor>,
    rename: Option<RenameFn>,
}

impl TransformBuilder {
    pub fn new(name: &str, pattern: &str, destination: &str, processor: Arc<dyn Processor>) -> Self {
        Self {
            name: name.to_string(),
            root: PathBuf::from("."),
            pattern: pattern.to_string(),
            excludes: Vec::new(),
            destination: PathBuf::from(destination),
            processor,
            rename: None,
        }
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.excludes.push(pattern.to_string());
        self
    }

    pub fn rename(mut self, rename: RenameFn) -> Self {
        self.rename = Some(rename);
        self
    }

    pub fn build(self, fs: Arc<dyn FileSystem>) -> Transform {
        let source = SourcePattern::new(&self.pattern, &self.excludes)
            .expect("Failed to compile source pattern");
        let transform = Transform::new(
            self.name,
            self.root,
            source,
            self.destination,
            self.processor,
            fs,
        );
        match self.rename {
            Some(rename) => transform.with_rename(rename),
            None => transform,
        }
    }
}
