//! Property-based tests for the framing codec and envelope encryption.

use proptest::prelude::*;
use stegcrypt::header::{decode_base64, encode_base64};
use stegcrypt::pipeline::{embed_bytes, extract_bytes, frame, unframe};
use stegcrypt::{EnvelopeEngine, MasterKey, Pixel, PixelBuffer, StegError};

fn carrier_for(len: usize) -> PixelBuffer {
    // Square-ish carrier with room for the framed payload plus slack
    let bits = 32 + len as u32 * 8 + 7;
    let width = 16;
    let height = bits.div_ceil(width);
    PixelBuffer::from_fn(width, height, |x, y| {
        Pixel::new(x as u8, y as u8, (x * 31 + y) as u8, 255)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any non-empty byte string survives embed then extract.
    #[test]
    fn embedded_bytes_are_recovered(message in prop::collection::vec(any::<u8>(), 1..256)) {
        let image = carrier_for(message.len());
        let stego = embed_bytes(&image, &message).unwrap();
        prop_assert_eq!(extract_bytes(&stego).unwrap(), message);
    }

    /// Only the blue LSB of any pixel differs after embedding.
    #[test]
    fn embedding_touches_only_blue_lsb(message in prop::collection::vec(any::<u8>(), 1..64)) {
        let image = carrier_for(message.len());
        let stego = embed_bytes(&image, &message).unwrap();
        for (before, after) in image.pixels().iter().zip(stego.pixels()) {
            prop_assert_eq!(before.red, after.red);
            prop_assert_eq!(before.green, after.green);
            prop_assert_eq!(before.alpha, after.alpha);
            prop_assert_eq!(before.blue | 1, after.blue | 1);
        }
    }

    /// Framing is invertible for non-empty payloads.
    #[test]
    fn frame_unframe(message in prop::collection::vec(any::<u8>(), 1..512)) {
        let bits = frame(&message).unwrap();
        prop_assert_eq!(bits.len(), 32 + message.len() * 8);
        prop_assert_eq!(unframe(&bits).unwrap(), message);
    }

    /// Any UTF-8 text decrypts to itself under the same master key.
    #[test]
    fn envelope_roundtrip(message in ".{0,200}") {
        let engine = EnvelopeEngine::new(MasterKey::from_bytes(&[7u8; 16]).unwrap());
        let envelope = engine.encrypt_message(&message).unwrap();
        prop_assert_eq!(engine.decrypt_message(&envelope).unwrap(), message);
    }

    /// Flipping any bit of the IV or ciphertext never decrypts to the original text.
    #[test]
    fn ciphertext_tampering_never_returns_original(offset in 0usize..64, bit in 0u8..8) {
        let message = "forty-three bytes of secret text, unchanged";
        let engine = EnvelopeEngine::new(MasterKey::from_bytes(&[5u8; 16]).unwrap());
        let mut bytes = decode_base64(&engine.encrypt_message(message).unwrap()).unwrap();
        // 4 + 24 byte key header, then 16-byte IV and 48 bytes of ciphertext
        prop_assert_eq!(bytes.len(), 28 + 64);
        bytes[28 + offset] ^= 1 << bit;
        if let Ok(recovered) = engine.decrypt_message(&encode_base64(&bytes)) {
            prop_assert_ne!(recovered, message);
        }
    }

    /// Flipping any bit of the wrapped key is detected by the unwrap integrity check.
    #[test]
    fn wrapped_key_tampering_detected(index in 4usize..28, bit in 0u8..8) {
        let engine = EnvelopeEngine::new(MasterKey::from_bytes(&[9u8; 16]).unwrap());
        let mut bytes = decode_base64(&engine.encrypt_message("integrity").unwrap()).unwrap();
        bytes[index] ^= 1 << bit;
        let result = engine.decrypt_message(&encode_base64(&bytes));
        prop_assert!(matches!(result, Err(StegError::CryptoFailure(_))));
    }
}
