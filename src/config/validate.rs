// src/config/validate.rs

use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SitepipeError};
use crate::transform::{glob_base, SourcePattern};
use crate::types::AssetClass;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SitepipeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.files))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_global_config(cfg)?;
    validate_patterns(cfg)?;
    validate_destinations(cfg)?;
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.debounce_ms == 0 {
        return Err(SitepipeError::ConfigError(
            "[config].debounce_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_patterns(cfg: &RawConfigFile) -> Result<()> {
    for class in AssetClass::ALL {
        let pattern = cfg.files.pattern(class);
        if pattern.trim().is_empty() {
            return Err(SitepipeError::ConfigError(format!(
                "[files].{} must not be empty",
                class.config_key()
            )));
        }
        if pattern.starts_with('/') || Path::new(pattern).is_absolute() {
            return Err(SitepipeError::ConfigError(format!(
                "[files].{} = \"{}\" must be relative to the project root",
                class.config_key(),
                pattern
            )));
        }
        SourcePattern::new(pattern, &[]).map_err(|e| {
            SitepipeError::ConfigError(format!(
                "[files].{} is not a valid glob: {e:#}",
                class.config_key()
            ))
        })?;
    }
    Ok(())
}

/// A transform must never read its own output back as input.
fn validate_destinations(cfg: &RawConfigFile) -> Result<()> {
    for class in AssetClass::ALL {
        let pattern = cfg.files.pattern(class).trim_start_matches("./");
        let base = glob_base(pattern);
        let destination = Path::new(class.destination());

        if destination.starts_with(&base) {
            return Err(SitepipeError::ConfigError(format!(
                "[files].{} = \"{}\" would also match outputs written to '{}'; \
                 narrow the pattern to a source directory",
                class.config_key(),
                pattern,
                class.destination()
            )));
        }
    }
    Ok(())
}
