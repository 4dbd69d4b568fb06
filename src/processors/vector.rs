// src/processors/vector.rs

use anyhow::{Context, Result};

use crate::transform::SourceFile;

/// Optimize an SVG by round-tripping it through usvg.
///
/// Comments, editor metadata and unused definitions are dropped; the output
/// has no indentation.
pub fn optimize_svg(content: &[u8]) -> Result<Vec<u8>> {
    let tree = usvg::Tree::from_data(content, &usvg::Options::default())
        .context("Failed to parse SVG")?;

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };

    Ok(tree.to_string(&write_options).into_bytes())
}

pub fn process(input: &SourceFile) -> Result<Vec<u8>> {
    optimize_svg(&input.contents)
}
