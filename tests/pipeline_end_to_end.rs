// tests/pipeline_end_to_end.rs

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, Rgb};
use tempfile::TempDir;

use sitepipe::compose::Step;
use sitepipe::config::ConfigFile;
use sitepipe::fs::RealFileSystem;
use sitepipe::registry::TaskRegistry;
use sitepipe_test_utils::{init_tracing, with_timeout};

fn write(root: &Path, rel: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn registry(root: &Path) -> TaskRegistry {
    TaskRegistry::from_config(&ConfigFile::default(), root, Arc::new(RealFileSystem)).unwrap()
}

/// A flat-colored PNG written with the fastest compression setting.
fn loosely_compressed_png() -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(64, 64, |_, _| Rgb([200, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_with_encoder(PngEncoder::new_with_quality(
        &mut out,
        CompressionType::Fast,
        FilterType::NoFilter,
    ))
    .unwrap();
    out.into_inner()
}

fn seed_site(root: &Path) {
    write(root, "src/scss/_vars.scss", "$accent: #ff0000;\n");
    write(
        root,
        "src/scss/style.scss",
        "@import \"vars\";\n\n.button {\n  color: $accent;\n  user-select: none;\n}\n",
    );
    write(
        root,
        "src/js/app.js",
        "// greeting\nwindow.answer = function () {\n  var left = 1;\n  var right = 1;\n  return left + right;\n};\n",
    );
    write(root, "src/img/photo.png", loosely_compressed_png());
    write(
        root,
        "src/img/icons/dot.svg",
        "<?xml version=\"1.0\"?>\n<!-- exported by an editor -->\n<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\">\n  <circle cx=\"5\" cy=\"5\" r=\"4\" fill=\"red\"/>\n</svg>\n",
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn full_build_writes_every_asset_class() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    seed_site(root);

    let report = with_timeout(registry(root).parallel_group("build").run()).await;
    assert!(report.is_success(), "{:?}", report.failures().collect::<Vec<_>>());

    // Styles: compiled, prefixed, minified; partials are not emitted.
    let css = fs::read_to_string(root.join("dist/css/style.css")).unwrap();
    assert!(css.contains(".button{"), "{css}");
    assert!(css.contains("-webkit-user-select:none"), "{css}");
    assert!(!css.contains('\n'), "{css}");
    assert!(!root.join("dist/css/_vars.css").exists());
    assert_eq!(report.get("scss").unwrap().files_processed, 1);

    // Scripts: minified and renamed.
    let source_js = fs::read_to_string(root.join("src/js/app.js")).unwrap();
    let js = fs::read_to_string(root.join("dist/js/app.min.js")).unwrap();
    assert!(js.contains("window.answer"), "{js}");
    assert!(!js.contains("greeting"), "{js}");
    assert!(js.len() < source_js.len());

    // Raster: still a valid PNG, never larger than the source.
    let png = fs::read(root.join("dist/img/photo.png")).unwrap();
    assert!(image::load_from_memory(&png).is_ok());
    assert!(png.len() <= fs::metadata(root.join("src/img/photo.png")).unwrap().len() as usize);

    // Vector: nested path kept, comment stripped.
    let svg = fs::read_to_string(root.join("dist/img/icons/dot.svg")).unwrap();
    assert!(svg.contains("<svg"), "{svg}");
    assert!(!svg.contains("exported by an editor"), "{svg}");
}

#[tokio::test(flavor = "multi_thread")]
async fn broken_stylesheet_only_fails_the_style_transform() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    seed_site(root);
    write(root, "src/scss/broken.scss", ".oops { color: ;\n");

    let report = with_timeout(registry(root).parallel_group("build").run()).await;

    assert_eq!(report.failed_count(), 1);
    let scss = report.get("scss").unwrap();
    assert!(!scss.is_success());
    // The healthy stylesheet in the same transform still got built.
    assert_eq!(scss.files_processed, 1);
    assert!(root.join("dist/css/style.css").exists());

    for name in ["js", "img", "svg"] {
        assert!(report.get(name).unwrap().is_success(), "{name} should succeed");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_project_builds_nothing_successfully() {
    let tmp = TempDir::new().unwrap();

    let report = with_timeout(registry(tmp.path()).parallel_group("build").run()).await;

    assert!(report.is_success());
    assert_eq!(report.files_processed(), 0);
    assert!(!tmp.path().join("dist").exists());
}

#[test]
fn registry_exposes_the_four_transforms() {
    let registry = registry(Path::new("/site"));

    let names: Vec<&str> = registry.transforms().iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["scss", "js", "img", "svg"]);

    let js = registry.get("js").unwrap();
    assert_eq!(js.destination(), Path::new("dist/js"));
    assert_eq!(js.source().as_str(), "src/js/**/*.js");

    let patterns = registry.watch_patterns();
    assert_eq!(patterns.len(), 4);
    assert!(patterns.iter().any(|p| p.matches("src/img/logo.svg")));
    // Partials are not compiled on their own, but editing one must rebuild.
    assert!(patterns.iter().any(|p| p.matches("src/scss/_partial.scss")));
    assert!(!js.source().matches("src/js/readme.md"));
    assert!(!registry
        .get("scss")
        .unwrap()
        .source()
        .matches("src/scss/_partial.scss"));
    assert!(!patterns.iter().any(|p| p.matches("dist/css/style.css")));
}
