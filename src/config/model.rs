// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::AssetClass;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// debounce_ms = 200
///
/// [files]
/// scssPath = "src/scss/**/*.scss"
/// jsPath = "src/js/**/*.js"
/// imgPath = "src/img/**/*.{png,jpg,jpeg}"
/// svgPath = "src/img/**/*.svg"
/// ```
///
/// All sections and keys are optional and fall back to the values above.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub files: FilesSection,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// Window in which bursts of change events collapse into one rebuild.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `[files]` section: one source glob per asset class.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesSection {
    #[serde(rename = "scssPath", default = "default_scss_path")]
    pub scss_path: String,

    #[serde(rename = "jsPath", default = "default_js_path")]
    pub js_path: String,

    #[serde(rename = "imgPath", default = "default_img_path")]
    pub img_path: String,

    #[serde(rename = "svgPath", default = "default_svg_path")]
    pub svg_path: String,
}

fn default_scss_path() -> String {
    AssetClass::Style.default_pattern().to_string()
}

fn default_js_path() -> String {
    AssetClass::Script.default_pattern().to_string()
}

fn default_img_path() -> String {
    AssetClass::Raster.default_pattern().to_string()
}

fn default_svg_path() -> String {
    AssetClass::Vector.default_pattern().to_string()
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            scss_path: default_scss_path(),
            js_path: default_js_path(),
            img_path: default_img_path(),
            svg_path: default_svg_path(),
        }
    }
}

impl FilesSection {
    pub fn pattern(&self, class: AssetClass) -> &str {
        match class {
            AssetClass::Style => &self.scss_path,
            AssetClass::Script => &self.js_path,
            AssetClass::Raster => &self.img_path,
            AssetClass::Vector => &self.svg_path,
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)` (or
/// `Default`), so every pattern in here is known to compile.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    config: ConfigSection,
    files: FilesSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, files: FilesSection) -> Self {
        Self { config, files }
    }

    pub fn config_section(&self) -> &ConfigSection {
        &self.config
    }

    pub fn pattern(&self, class: AssetClass) -> &str {
        self.files.pattern(class)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.config.debounce_ms)
    }
}
