// src/transform/processor.rs

//! The content transformation seam.
//!
//! A [`Processor`] turns one source file into output bytes. Transforms do not
//! know what a processor does; the built-in style/script/image processors live
//! in [`crate::processors`], and tests plug in their own.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{Context, Result};

/// A source file handed to a processor.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Full path as resolved against the project root.
    pub path: PathBuf,
    /// Path relative to the pattern's glob base.
    pub relative: PathBuf,
    pub contents: Vec<u8>,
}

impl SourceFile {
    /// Contents as UTF-8 text.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.contents)
            .with_context(|| format!("{:?} is not valid UTF-8", self.path))
    }
}

pub type ProcessFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;

/// Trait abstracting the per-file transformation function.
pub trait Processor: Send + Sync {
    fn process<'a>(&'a self, input: &'a SourceFile) -> ProcessFuture<'a>;
}

type SyncFn = dyn Fn(&SourceFile) -> Result<Vec<u8>> + Send + Sync;

/// Runs a synchronous, CPU-bound function on Tokio's blocking pool so it does
/// not stall sibling transforms.
#[derive(Clone)]
pub struct BlockingProcessor {
    f: Arc<SyncFn>,
}

impl BlockingProcessor {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&SourceFile) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }
}

impl Processor for BlockingProcessor {
    fn process<'a>(&'a self, input: &'a SourceFile) -> ProcessFuture<'a> {
        let f = Arc::clone(&self.f);
        let input = input.clone();

        Box::pin(async move {
            tokio::task::spawn_blocking(move || f(&input))
                .await
                .context("processor worker panicked")?
        })
    }
}

/// Runs a cheap synchronous function inline.
pub struct FnProcessor<F> {
    f: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(&SourceFile) -> Result<Vec<u8>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Processor for FnProcessor<F>
where
    F: Fn(&SourceFile) -> Result<Vec<u8>> + Send + Sync,
{
    fn process<'a>(&'a self, input: &'a SourceFile) -> ProcessFuture<'a> {
        let out = (self.f)(input);
        Box::pin(async move { out })
    }
}
