// src/transform/rename.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maps a source path (relative to the glob base) to its output path
/// (relative to the destination directory).
pub type RenameFn = Arc<dyn Fn(&Path) -> PathBuf + Send + Sync>;

/// Replace the extension: `pages/a.scss` -> `pages/a.css`.
pub fn with_extension(ext: &'static str) -> RenameFn {
    Arc::new(move |path: &Path| path.with_extension(ext))
}

/// Append a suffix to the file stem and set the extension:
/// `lib/app.js` -> `lib/app.min.js` for `(".min", "js")`.
pub fn with_suffix(suffix: &'static str, ext: &'static str) -> RenameFn {
    Arc::new(move |path: &Path| {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!("{stem}{suffix}.{ext}"))
    })
}
