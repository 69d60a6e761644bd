//! End-to-end hide and reveal: text ↔ envelope ↔ frame ↔ blue-channel LSBs.

use crate::capacity::{envelope_text_len, framed_bits};
use crate::carrier::PixelBuffer;
use crate::envelope::EnvelopeEngine;
use crate::error::{Result, StegError};
use crate::keystore::KeyProvider;
use crate::pipeline::{embed_bytes, extract_bytes};
use crate::transport::{image_to_string, string_to_image};

/// Encrypt `plaintext` and hide the envelope text in a copy of `carrier`
pub fn conceal_message<P: KeyProvider>(
    engine: &EnvelopeEngine<P>,
    carrier: &PixelBuffer,
    plaintext: &str,
) -> Result<PixelBuffer> {
    // Fail before touching the key when the envelope cannot fit
    let required = framed_bits(envelope_text_len(plaintext.len()));
    let available = carrier.capacity_bits();
    if required > available {
        return Err(StegError::CapacityExceeded {
            required,
            available,
        });
    }

    let envelope = engine.encrypt_message(plaintext)?;
    embed_bytes(carrier, envelope.as_bytes())
}

/// Extract the hidden envelope text from `carrier` and decrypt it
pub fn reveal_message<P: KeyProvider>(
    engine: &EnvelopeEngine<P>,
    carrier: &PixelBuffer,
) -> Result<String> {
    let payload = extract_bytes(carrier)?;
    let envelope = String::from_utf8(payload)
        .map_err(|_| StegError::MalformedPayload("hidden payload is not text".into()))?;
    engine.decrypt_message(&envelope)
}

/// Conceal and serialize the stego image to Base64 PNG text
pub fn conceal_to_transport<P: KeyProvider>(
    engine: &EnvelopeEngine<P>,
    carrier: &PixelBuffer,
    plaintext: &str,
) -> Result<String> {
    image_to_string(&conceal_message(engine, carrier, plaintext)?)
}

/// Parse Base64 PNG text and reveal its message
pub fn reveal_from_transport<P: KeyProvider>(
    engine: &EnvelopeEngine<P>,
    text: &str,
) -> Result<String> {
    reveal_message(engine, &string_to_image(text)?)
}
