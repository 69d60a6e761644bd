pub mod embed;
pub mod extract;
pub mod info;
pub mod keygen;

pub use embed::*;
pub use extract::*;
pub use info::*;
pub use keygen::*;

use crate::carrier::PixelBuffer;
use crate::error::Result;
use crate::transport::{load_image, string_to_image};
use std::path::Path;

/// Read a carrier from an image file, or from Base64 PNG text when `transport` is set
pub fn load_carrier(path: &Path, transport: bool) -> Result<PixelBuffer> {
    if transport {
        let text = std::fs::read_to_string(path)?;
        string_to_image(&text)
    } else {
        load_image(path)
    }
}
