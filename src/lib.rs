// src/lib.rs

pub mod cli;
pub mod compose;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod processors;
pub mod registry;
pub mod transform;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::compose::{RunReport, Sequence, Step};
use crate::config::load_or_default;
use crate::errors::SitepipeError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::registry::TaskRegistry;
use crate::types::SequencePolicy;
use crate::watch::WatchStep;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the transform registry
/// - the initial parallel build
/// - (unless `--once`) the watcher, sequenced after the initial build
///
/// Returns an error when the initial build reports any failure, so the
/// process exits non-zero without entering watch mode.
pub async fn run(args: CliArgs) -> Result<()> {
    let explicit = args.config.as_deref().map(Path::new);
    let (config_path, cfg) = load_or_default(explicit)?;
    let root = config_root_dir(&config_path);

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let registry = TaskRegistry::from_config(&cfg, &root, fs)?;

    if args.dry_run {
        print_dry_run(&registry, cfg.config_section().debounce_ms);
        return Ok(());
    }

    let initial_build: Arc<dyn Step> = Arc::new(registry.parallel_group("build"));

    let report = if args.once {
        initial_build.run().await
    } else {
        let watch: Arc<dyn Step> = Arc::new(WatchStep::new(
            root,
            registry.watch_patterns(),
            cfg.debounce(),
            Arc::clone(&initial_build),
        ));
        let default_run = Sequence::new(
            "default",
            SequencePolicy::FailFast,
            vec![initial_build, watch],
        );
        default_run.run().await
    };

    ensure_success(&report)
}

/// Turn failures in the final report into an error.
fn ensure_success(report: &RunReport) -> Result<()> {
    if report.is_success() {
        info!(files = report.files_processed(), "done");
        return Ok(());
    }

    let failed = report.failed_count();
    error!(failed, "build failed");
    Err(SitepipeError::BuildFailed { failed }.into())
}

/// Figure out a sensible project root.
///
/// - If the config path has a non-empty parent (e.g. "site/Sitepipe.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Sitepipe.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: print each transform's source and destination.
fn print_dry_run(registry: &TaskRegistry, debounce_ms: u64) {
    println!("sitepipe dry-run");
    println!("  root = {}", registry.root().display());
    println!("  config.debounce_ms = {debounce_ms}");
    println!();

    println!("transforms ({}):", registry.transforms().len());
    for transform in registry.transforms() {
        println!("  - {}", transform.name());
        println!("      source: {}", transform.source());
        println!("      dest:   {}", transform.destination().display());
    }
}
