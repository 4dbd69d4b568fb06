// tests/watcher_notify.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use sitepipe::config::ConfigFile;
use sitepipe::fs::RealFileSystem;
use sitepipe::registry::TaskRegistry;
use sitepipe::watch::{spawn_watcher, WatchEvent, WatcherHandle};
use sitepipe_test_utils::init_tracing;

/// Project dir with the default source and output directories in place, and
/// a watcher on the registry's patterns.
async fn watched_project() -> (TempDir, WatcherHandle, mpsc::Receiver<WatchEvent>) {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    for dir in ["src/scss", "src/js/lib", "src/img", "dist/css"] {
        fs::create_dir_all(tmp.path().join(dir)).unwrap();
    }

    let registry =
        TaskRegistry::from_config(&ConfigFile::default(), tmp.path(), Arc::new(RealFileSystem))
            .unwrap();
    let (tx, rx) = mpsc::channel(64);
    let handle = spawn_watcher(tmp.path(), registry.watch_patterns(), tx).unwrap();

    // Give the backend a moment to register the recursive watch.
    sleep(Duration::from_millis(200)).await;
    (tmp, handle, rx)
}

/// First `Changed` path received within `within`, if any.
async fn next_change(rx: &mut mpsc::Receiver<WatchEvent>, within: Duration) -> Option<PathBuf> {
    timeout(within, async {
        while let Some(event) = rx.recv().await {
            if let WatchEvent::Changed(path) = event {
                return Some(path);
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}

fn write(root: &Path, rel: &str, contents: &str) {
    fs::write(root.join(rel), contents).unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn writing_a_stylesheet_is_reported() {
    let (tmp, _handle, mut rx) = watched_project().await;

    write(tmp.path(), "src/scss/style.scss", ".a { color: red; }");

    let changed = next_change(&mut rx, Duration::from_secs(3)).await;
    assert_eq!(changed, Some(PathBuf::from("src/scss/style.scss")));
}

#[tokio::test(flavor = "multi_thread")]
async fn writing_a_partial_is_reported() {
    let (tmp, _handle, mut rx) = watched_project().await;

    write(tmp.path(), "src/scss/_vars.scss", "$accent: red;");

    let changed = next_change(&mut rx, Duration::from_secs(3)).await;
    assert_eq!(changed, Some(PathBuf::from("src/scss/_vars.scss")));
}

#[tokio::test(flavor = "multi_thread")]
async fn nested_script_is_reported_relative_to_root() {
    let (tmp, _handle, mut rx) = watched_project().await;

    write(tmp.path(), "src/js/lib/util.js", "var x = 1;");

    let changed = next_change(&mut rx, Duration::from_secs(3)).await;
    assert_eq!(changed, Some(PathBuf::from("src/js/lib/util.js")));
}

#[tokio::test(flavor = "multi_thread")]
async fn build_outputs_are_not_reported() {
    let (tmp, _handle, mut rx) = watched_project().await;

    write(tmp.path(), "dist/css/style.css", ".a{color:red}");

    assert_eq!(next_change(&mut rx, Duration::from_millis(800)).await, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn unrelated_files_are_not_reported() {
    let (tmp, _handle, mut rx) = watched_project().await;

    write(tmp.path(), "src/js/notes.md", "todo");
    write(tmp.path(), "README.txt", "hello");

    assert_eq!(next_change(&mut rx, Duration::from_millis(800)).await, None);
}
