// src/processors/mod.rs

//! Built-in processors for the four asset classes.
//!
//! - [`style`]: SCSS compile, vendor prefixing and CSS minification.
//! - [`script`]: JavaScript minification.
//! - [`raster`]: PNG/JPEG recompression.
//! - [`vector`]: SVG optimization.
//!
//! All of them are synchronous and CPU-bound, so they are wrapped in a
//! [`BlockingProcessor`].

pub mod raster;
pub mod script;
pub mod style;
pub mod vector;

use std::sync::Arc;

use crate::transform::rename::{self, RenameFn};
use crate::transform::{BlockingProcessor, Processor};
use crate::types::AssetClass;

/// The processor used for an asset class.
pub fn processor_for(class: AssetClass) -> Arc<dyn Processor> {
    let processor = match class {
        AssetClass::Style => BlockingProcessor::new(style::process),
        AssetClass::Script => BlockingProcessor::new(script::process),
        AssetClass::Raster => BlockingProcessor::new(raster::process),
        AssetClass::Vector => BlockingProcessor::new(vector::process),
    };
    Arc::new(processor)
}

/// Output renaming for an asset class, if any.
pub fn rename_for(class: AssetClass) -> Option<RenameFn> {
    match class {
        AssetClass::Style => Some(rename::with_extension("css")),
        AssetClass::Script => Some(rename::with_suffix(".min", "js")),
        AssetClass::Raster | AssetClass::Vector => None,
    }
}

/// Source excludes for an asset class.
pub fn excludes_for(class: AssetClass) -> Vec<String> {
    match class {
        // Partials are only ever imported.
        AssetClass::Style => vec![style::PARTIALS_GLOB.to_string()],
        _ => Vec::new(),
    }
}
