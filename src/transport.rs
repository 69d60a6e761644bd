//! Image I/O: PNG files, PNG bytes, and the Base64-PNG transport text.
//!
//! Stego output is always written as PNG. Lossy formats destroy the LSBs.

use crate::carrier::PixelBuffer;
use crate::error::{Result, StegError};
use crate::header::{decode_base64, encode_base64};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Convert a decoded image of any color type to an RGBA8 pixel buffer
pub fn from_dynamic(image: DynamicImage) -> Result<PixelBuffer> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_rgba(width, height, rgba.as_raw())
}

fn to_rgba_image(buffer: &PixelBuffer) -> Result<RgbaImage> {
    let (width, height) = buffer.dimensions();
    RgbaImage::from_raw(width, height, buffer.to_rgba()).ok_or_else(|| {
        StegError::InvalidInput(format!("pixel data does not match {}x{}", width, height))
    })
}

/// Load a carrier from any supported image file
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let buffer = from_dynamic(image::open(path)?)?;
    tracing::debug!(path = %path.display(), width = buffer.width(), height = buffer.height(), "loaded carrier image");
    Ok(buffer)
}

/// Write a buffer as a PNG file, regardless of the path's extension
pub fn save_png(path: &Path, buffer: &PixelBuffer) -> Result<()> {
    to_rgba_image(buffer)?.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Encode a buffer as PNG bytes
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    to_rgba_image(buffer)?.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Decode image bytes (PNG or any other enabled format)
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer> {
    from_dynamic(image::load_from_memory(bytes)?)
}

/// Serialize a buffer to Base64-encoded PNG text
pub fn image_to_string(buffer: &PixelBuffer) -> Result<String> {
    Ok(encode_base64(&encode_png(buffer)?))
}

/// Parse Base64-encoded image text; whitespace is ignored
pub fn string_to_image(text: &str) -> Result<PixelBuffer> {
    let bytes = decode_base64(text).map_err(|e| {
        StegError::InvalidInput(format!("transport text is not valid Base64: {}", e))
    })?;
    decode_image(&bytes)
}
