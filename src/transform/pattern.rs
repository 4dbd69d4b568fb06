// src/transform/pattern.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::fs::FileSystem;

const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}'];

/// A compiled source glob, plus optional excludes.
///
/// Patterns are relative to a project root and use forward slashes, e.g.
/// `"src/scss/**/*.scss"`. Resolution against the filesystem happens lazily,
/// each time a transform executes.
#[derive(Clone)]
pub struct SourcePattern {
    raw: String,
    base: PathBuf,
    include: GlobSet,
    exclude: Option<GlobSet>,
}

impl fmt::Debug for SourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcePattern")
            .field("raw", &self.raw)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for SourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl SourcePattern {
    pub fn new(pattern: &str, excludes: &[String]) -> Result<Self> {
        let pattern = pattern.trim_start_matches("./");
        let include = build_globset(&[pattern.to_string()])
            .with_context(|| format!("building source globset for {pattern}"))?;

        let exclude = if excludes.is_empty() {
            None
        } else {
            Some(
                build_globset(excludes)
                    .with_context(|| format!("building exclude globset for {pattern}"))?,
            )
        };

        Ok(Self {
            raw: pattern.to_string(),
            base: glob_base(pattern),
            include,
            exclude,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Leading directory of the pattern that contains no wildcards.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// The same glob with its excludes dropped.
    ///
    /// Excluded files (SCSS partials) are still inputs of the files that
    /// import them, so a change to one must trigger a rebuild.
    pub fn without_excludes(&self) -> Self {
        Self {
            exclude: None,
            ..self.clone()
        }
    }

    /// Returns true if the given path (relative to the project root, forward
    /// slashes) is part of this source set.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.include.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }

    /// Walk the glob base under `root` and collect every matching file.
    ///
    /// A missing base directory means zero matches, not an error. Ordering
    /// follows directory enumeration and is not stable.
    pub fn resolve(&self, fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
        let start = root.join(&self.base);
        let mut files = Vec::new();

        if !fs.is_dir(&start) {
            return Ok(files);
        }

        let mut stack = vec![start];
        while let Some(dir) = stack.pop() {
            for path in fs.read_dir(&dir)? {
                if fs.is_dir(&path) {
                    stack.push(path);
                } else if fs.is_file(&path) {
                    if let Ok(rel) = path.strip_prefix(root) {
                        let rel_str = rel.to_string_lossy().replace('\\', "/");
                        if self.matches(&rel_str) {
                            files.push(path);
                        }
                    }
                }
            }
        }

        Ok(files)
    }
}

/// Compute the glob base: every leading path component without wildcard
/// characters. A pattern without any wildcard is a literal file, so its base
/// is its parent directory.
///
/// `"src/scss/**/*.scss"` -> `"src/scss"`, `"*.js"` -> `""`.
pub fn glob_base(pattern: &str) -> PathBuf {
    let components: Vec<&str> = pattern.split('/').collect();
    let magic = components
        .iter()
        .position(|c| c.contains(GLOB_META))
        .unwrap_or(components.len().saturating_sub(1));

    components[..magic]
        .iter()
        .filter(|c| !c.is_empty() && **c != ".")
        .collect()
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
