// src/processors/raster.rs

use anyhow::{bail, Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::ImageFormat;
use tracing::debug;

use crate::transform::SourceFile;

pub const JPEG_QUALITY: u8 = 80;

/// Re-encode a PNG or JPEG for size.
///
/// PNGs are re-encoded losslessly at maximum compression; JPEGs at
/// [`JPEG_QUALITY`]. When the result is not smaller, the input is returned
/// unchanged.
pub fn recompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let format = image::guess_format(bytes).context("unrecognized image format")?;
    let img = image::load_from_memory_with_format(bytes, format).context("decoding image")?;

    let mut out = Vec::new();
    match format {
        ImageFormat::Png => img
            .write_with_encoder(PngEncoder::new_with_quality(
                &mut out,
                CompressionType::Best,
                FilterType::Adaptive,
            ))
            .context("encoding PNG")?,
        ImageFormat::Jpeg => img
            .write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
            .context("encoding JPEG")?,
        other => bail!("unsupported image format {other:?}"),
    }

    if out.len() >= bytes.len() {
        debug!(original = bytes.len(), encoded = out.len(), "keeping original image");
        return Ok(bytes.to_vec());
    }
    Ok(out)
}

pub fn process(input: &SourceFile) -> Result<Vec<u8>> {
    recompress(&input.contents)
}
