use crate::carrier::PixelBuffer;
use crate::header::LENGTH_PREFIX_SIZE;
use crate::pipeline::{framed_len, BLOCK_SIZE, KEY_SIZE, LENGTH_PREFIX_BITS, MAX_FRAME_BYTES};

/// Wrapped per-message key size (RFC 3394 adds one semiblock)
pub const WRAPPED_KEY_SIZE: usize = KEY_SIZE + 8;

/// Fixed envelope overhead before the ciphertext: prefix + wrapped key + IV
pub const ENVELOPE_OVERHEAD: usize = LENGTH_PREFIX_SIZE + WRAPPED_KEY_SIZE + BLOCK_SIZE;

/// Summary of how a payload maps onto a carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityReport {
    pub width: u32,
    pub height: u32,
    pub available_bits: u64,
    pub required_bits: u64,
    pub payload_bytes: usize,
}

impl CapacityReport {
    pub fn headroom_bits(&self) -> u64 {
        self.available_bits.saturating_sub(self.required_bits)
    }

    pub fn fits(&self) -> bool {
        self.required_bits <= self.available_bits
    }
}

/// Analyze a payload of `payload_len` bytes against a carrier
pub fn analyze_payload(image: &PixelBuffer, payload_len: usize) -> CapacityReport {
    CapacityReport {
        width: image.width(),
        height: image.height(),
        available_bits: image.capacity_bits(),
        required_bits: framed_bits(payload_len),
        payload_bytes: payload_len,
    }
}

/// Bits needed for a framed payload (length prefix + body)
pub fn framed_bits(payload_len: usize) -> u64 {
    framed_len(payload_len)
}

/// AES-CBC ciphertext length with PKCS#7 padding
pub fn ciphertext_len(plaintext_len: usize) -> usize {
    (plaintext_len / BLOCK_SIZE + 1) * BLOCK_SIZE
}

/// Binary envelope length for a plaintext of `plaintext_len` bytes
pub fn envelope_len(plaintext_len: usize) -> usize {
    ENVELOPE_OVERHEAD + ciphertext_len(plaintext_len)
}

/// Base64 envelope text length (the bytes that get embedded)
pub fn envelope_text_len(plaintext_len: usize) -> usize {
    envelope_len(plaintext_len).div_ceil(3) * 4
}

/// Largest payload in bytes a carrier of `capacity_bits` can frame
pub fn max_payload_bytes(capacity_bits: u64) -> u64 {
    let body = capacity_bits.saturating_sub(LENGTH_PREFIX_BITS as u64) / 8;
    body.min(u64::from(MAX_FRAME_BYTES))
}

/// Largest UTF-8 plaintext (in bytes) whose envelope fits, or None if nothing fits
pub fn max_plaintext_bytes(capacity_bits: u64) -> Option<u64> {
    let raw = max_payload_bytes(capacity_bits) / 4 * 3;
    let overhead = ENVELOPE_OVERHEAD as u64 + BLOCK_SIZE as u64;
    if raw < overhead {
        return None;
    }
    let blocks = (raw - ENVELOPE_OVERHEAD as u64) / BLOCK_SIZE as u64;
    Some(blocks * BLOCK_SIZE as u64 - 1)
}
