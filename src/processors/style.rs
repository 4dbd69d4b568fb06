// src/processors/style.rs

use anyhow::{anyhow, Result};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use crate::transform::SourceFile;

/// Sass partials (`_name.scss`) are not compiled on their own.
pub const PARTIALS_GLOB: &str = "**/_*.scss";

const fn major(version: u32) -> u32 {
    version << 16
}

/// Oldest browsers the prefixer supports.
fn browser_targets() -> Targets {
    Targets::from(Browsers {
        chrome: Some(major(80)),
        edge: Some(major(80)),
        firefox: Some(major(78)),
        safari: Some(major(13)),
        ios_saf: Some(major(13)),
        ie: Some(major(11)),
        ..Browsers::default()
    })
}

/// Compile SCSS to CSS. `@import`/`@use` resolve relative to `load_path`.
pub fn compile_scss(source: &str, load_path: Option<&std::path::Path>) -> Result<String> {
    let mut options = grass::Options::default();
    if let Some(dir) = load_path {
        options = options.load_path(dir);
    }
    grass::from_string(source.to_string(), &options).map_err(|e| anyhow!("{e}"))
}

/// Add vendor prefixes for the target browsers and minify.
pub fn prefix_and_minify(css: &str, filename: &str) -> Result<String> {
    let parser_options = ParserOptions {
        filename: filename.to_string(),
        ..ParserOptions::default()
    };
    let mut stylesheet = StyleSheet::parse(css, parser_options).map_err(|e| anyhow!("{e}"))?;

    stylesheet
        .minify(MinifyOptions {
            targets: browser_targets(),
            ..MinifyOptions::default()
        })
        .map_err(|e| anyhow!("{e}"))?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            targets: browser_targets(),
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("{e}"))?;

    Ok(result.code)
}

pub fn process(input: &SourceFile) -> Result<Vec<u8>> {
    let css = compile_scss(input.text()?, input.path.parent())?;
    let minified = prefix_and_minify(&css, &input.path.to_string_lossy())?;
    Ok(minified.into_bytes())
}
