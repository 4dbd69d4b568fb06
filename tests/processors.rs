// tests/processors.rs

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb};

use sitepipe::processors::{raster, script, style, vector};

#[test]
fn scss_variables_and_nesting_compile() {
    let css = style::compile_scss("$w: 10px;\n.a { .b { width: $w * 2; } }\n", None).unwrap();
    assert!(css.contains(".a .b"), "{css}");
    assert!(css.contains("20px"), "{css}");
}

#[test]
fn scss_syntax_error_is_reported() {
    let err = style::compile_scss(".a { color: red;", None).unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn css_is_prefixed_for_older_browsers_and_minified() {
    let out = style::prefix_and_minify(
        ".a {\n  user-select: none;\n  color: #ff0000;\n}\n",
        "a.css",
    )
    .unwrap();

    assert!(out.contains("-webkit-user-select:none"), "{out}");
    assert!(out.contains("color:red"), "{out}");
    assert!(!out.contains('\n'));
}

#[test]
fn js_is_minified_without_dropping_globals() {
    let source = "function double(value) {\n  // twice\n  return value * 2;\n}\nwindow.double = double;\n";
    let out = script::minify_js(source).unwrap();

    assert!(out.len() < source.len(), "{out}");
    assert!(out.contains("double"), "{out}");
    assert!(!out.contains("twice"), "{out}");
}

#[test]
fn unreferenced_top_level_function_survives_minification() {
    let out = script::minify_js("function f(){return 1+1;}").unwrap();

    assert!(out.contains("function f("), "{out:?}");
    assert!(out.contains("return 2") || out.contains("return 1+1"), "{out:?}");
}

#[test]
fn js_syntax_error_is_reported() {
    let err = script::minify_js("function ( {").unwrap_err();
    assert!(err.to_string().contains("syntax error"));
}

#[test]
fn jpeg_is_recompressed_or_kept() {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(32, 32, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 128]));
    let mut input = Cursor::new(Vec::new());
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut input, 100))
        .unwrap();
    let input = input.into_inner();

    let out = raster::recompress(&input).unwrap();

    assert!(out.len() <= input.len());
    assert!(image::load_from_memory(&out).is_ok());
}

#[test]
fn non_image_bytes_are_rejected() {
    assert!(raster::recompress(b"definitely not an image").is_err());
}

#[test]
fn svg_is_normalized() {
    let input = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4">
    <!-- note -->
    <rect width="4" height="4" fill="blue"/>
</svg>"#;
    let out = String::from_utf8(vector::optimize_svg(input).unwrap()).unwrap();

    assert!(out.contains("<svg"), "{out}");
    assert!(!out.contains("\n    "), "{out}");
    assert!(!out.contains("note"), "{out}");
}

#[test]
fn malformed_svg_is_rejected() {
    assert!(vector::optimize_svg(b"<svg").is_err());
}
