use crate::carrier::PixelBuffer;
use crate::error::{Result, StegError};
use crate::pipeline::frame::{frame, framed_len, read_length_prefix, unframe, BitSequence};
use crate::pipeline::LENGTH_PREFIX_BITS;

/// Largest message length a frame header may declare
pub const MAX_FRAME_BYTES: u32 = i32::MAX as u32;

/// Embed bits into the blue-channel LSB of a copy of `image`, one bit per pixel, row-major
/// Pixels past the last bit are left untouched
pub fn embed(image: &PixelBuffer, bits: &BitSequence) -> Result<PixelBuffer> {
    let available = image.capacity_bits();
    let required = bits.len() as u64;
    if required > available {
        return Err(StegError::CapacityExceeded {
            required,
            available,
        });
    }

    let mut output = image.clone();
    // Row-major storage, so zipping in order visits y outer and x inner
    for (pixel, bit) in output.pixels_mut().iter_mut().zip(bits.iter()) {
        pixel.blue = (pixel.blue & 0xFE) | u8::from(bit);
    }

    tracing::debug!(
        bits = required,
        capacity = available,
        "embedded bit sequence into carrier"
    );
    Ok(output)
}

/// Extract the framed bit sequence (length prefix plus message bits) from `image`
///
/// Fails with `InvalidLength` when the header declares zero bytes or more than
/// `MAX_FRAME_BYTES`, and with `InsufficientCapacity` when the image has fewer
/// pixels than the header claims. Truncated frames are never returned.
pub fn extract(image: &PixelBuffer) -> Result<BitSequence> {
    let available = image.capacity_bits();
    let lsb = |index: usize| image.at(index).map(|p| p.blue & 1 == 1);

    let len = read_length_prefix((0..LENGTH_PREFIX_BITS).map_while(lsb)).ok_or(
        StegError::InsufficientCapacity {
            required: LENGTH_PREFIX_BITS as u64,
            available,
        },
    )?;
    if len == 0 || len > MAX_FRAME_BYTES {
        return Err(StegError::InvalidLength(u64::from(len)));
    }

    let required = framed_len(len as usize);
    if required > available {
        return Err(StegError::InsufficientCapacity {
            required,
            available,
        });
    }

    let bits: BitSequence = (0..required as usize).map_while(lsb).collect();
    tracing::debug!(bytes = len, bits = bits.len(), "extracted framed bit sequence");
    Ok(bits)
}

/// Frame and embed message bytes
pub fn embed_bytes(image: &PixelBuffer, message: &[u8]) -> Result<PixelBuffer> {
    embed(image, &frame(message)?)
}

/// Extract and unframe message bytes
pub fn extract_bytes(image: &PixelBuffer) -> Result<Vec<u8>> {
    unframe(&extract(image)?)
}
