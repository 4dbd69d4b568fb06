// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::transform::SourcePattern;
use crate::watch::state::WatchEvent;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher on `root` that sends `WatchEvent::Changed` for
/// every created, modified or removed path matching any of `patterns`.
///
/// - `root` is the project root against which all glob patterns are evaluated.
/// - `events_tx` feeds the watch loop.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    patterns: Vec<SourcePattern>,
    events_tx: mpsc::Sender<WatchEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    let patterns = Arc::new(patterns);

    // Channel from the blocking notify callback into the async world.
    let (raw_tx, mut raw_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = raw_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("sitepipe: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("sitepipe: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    tokio::spawn(async move {
        while let Some(event) = raw_rx.recv().await {
            if !is_content_change(&event.kind) {
                continue;
            }
            debug!(?event, "received notify event");

            for path in &event.paths {
                let Some(rel) = relative_str(&root, path) else {
                    warn!("could not relativize path {:?} against root {:?}", path, root);
                    continue;
                };

                if !patterns.iter().any(|p| p.matches(&rel)) {
                    continue;
                }

                if events_tx
                    .send(WatchEvent::Changed(PathBuf::from(&rel)))
                    .await
                    .is_err()
                {
                    // Watch loop is gone; nothing left to notify.
                    debug!("watch loop closed; stopping notify forwarder");
                    return;
                }
            }
        }
        debug!("notify forwarder finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Reads and metadata-only updates do not change what a build produces.
fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Falls back to canonicalizing `path` when the direct prefix check fails
/// (symlinked temp dirs on macOS). Removed files cannot be canonicalized and
/// yield `None` in that case.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let to_string = |rel: &Path| rel.to_string_lossy().replace('\\', "/");

    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_string(rel));
    }

    let canonical = path.canonicalize().ok()?;
    canonical.strip_prefix(root).ok().map(to_string)
}
