// tests/error_handling.rs

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;

use sitepipe::config::{load_and_validate, load_or_default, ConfigFile};
use sitepipe::errors::SitepipeError;
use sitepipe::types::AssetClass;
use sitepipe_test_utils::builders::ConfigFileBuilder;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn empty_file_uses_defaults() {
    let file = config_file("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.debounce(), Duration::from_millis(200));
    assert_eq!(cfg.pattern(AssetClass::Style), "src/scss/**/*.scss");
    assert_eq!(cfg.pattern(AssetClass::Raster), "src/img/**/*.{png,jpg,jpeg}");
}

#[test]
fn camel_case_keys_override_patterns() {
    let file = config_file(
        r#"
[config]
debounce_ms = 50

[files]
scssPath = "assets/styles/**/*.scss"
jsPath = "assets/scripts/*.js"
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.debounce(), Duration::from_millis(50));
    assert_eq!(cfg.pattern(AssetClass::Style), "assets/styles/**/*.scss");
    assert_eq!(cfg.pattern(AssetClass::Script), "assets/scripts/*.js");
    assert_eq!(cfg.pattern(AssetClass::Vector), "src/img/**/*.svg");
}

#[test]
fn unknown_key_is_a_toml_error() {
    let file = config_file(
        r#"
[files]
cssPath = "src/css/*.css"
"#,
    );

    match load_and_validate(file.path()) {
        Err(SitepipeError::TomlError(e)) => assert!(e.to_string().contains("cssPath")),
        other => panic!("Expected TomlError, got: {:?}", other),
    }
}

#[test]
fn invalid_glob_is_a_config_error() {
    let file = config_file(
        r#"
[files]
jsPath = "src/[js/*.js"
"#,
    );

    match load_and_validate(file.path()) {
        Err(SitepipeError::ConfigError(msg)) => {
            assert!(msg.contains("jsPath"), "{msg}");
            assert!(msg.contains("not a valid glob"), "{msg}");
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn pattern_covering_its_own_output_is_rejected() {
    let file = config_file(
        r#"
[files]
scssPath = "**/*.scss"
"#,
    );

    match load_and_validate(file.path()) {
        Err(SitepipeError::ConfigError(msg)) => {
            assert!(msg.contains("scssPath"), "{msg}");
            assert!(msg.contains("dist/css"), "{msg}");
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn pattern_inside_dist_is_rejected() {
    let result = ConfigFile::try_from(ConfigFileBuilder::new().js_path("dist/**/*.js").raw());
    assert!(matches!(result, Err(SitepipeError::ConfigError(_))));
}

#[test]
fn absolute_pattern_is_rejected() {
    let result = ConfigFile::try_from(ConfigFileBuilder::new().scss_path("/abs/src/**/*.scss").raw());

    match result {
        Err(SitepipeError::ConfigError(msg)) => {
            assert!(msg.contains("scssPath"), "{msg}");
            assert!(msg.contains("relative to the project root"), "{msg}");
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn zero_debounce_is_rejected() {
    let result = ConfigFile::try_from(ConfigFileBuilder::new().debounce_ms(0).raw());

    match result {
        Err(SitepipeError::ConfigError(msg)) => assert!(msg.contains("debounce_ms")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn empty_pattern_is_rejected() {
    let result = ConfigFile::try_from(ConfigFileBuilder::new().svg_path("  ").raw());
    assert!(matches!(result, Err(SitepipeError::ConfigError(_))));
}

#[test]
fn explicit_missing_config_is_an_error() {
    let result = load_or_default(Some(Path::new("/definitely/not/here/Sitepipe.toml")));

    match result {
        Err(SitepipeError::ConfigError(msg)) => assert!(msg.contains("does not exist")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn explicit_config_returns_its_path() {
    let file = config_file("[config]\ndebounce_ms = 10\n");
    let (path, cfg) = load_or_default(Some(file.path())).unwrap();

    assert_eq!(path, file.path());
    assert_eq!(cfg.config_section().debounce_ms, 10);
}
