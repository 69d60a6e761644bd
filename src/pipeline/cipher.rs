//! AES-128-CBC with PKCS#7 padding over the raw `aes` block cipher.
//!
//! Output layout is `IV ‖ ciphertext`, with a fresh random IV per call.

use crate::error::{Result, StegError};
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Block};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/// AES block size in bytes (also the IV size)
pub const BLOCK_SIZE: usize = 16;

/// Per-message key size in bytes (AES-128)
pub const KEY_SIZE: usize = 16;

/// Ephemeral per-message key, zeroized on drop
pub type MessageKey = Zeroizing<[u8; KEY_SIZE]>;

/// Fill `dest` from the OS CSPRNG
pub fn fill_random(dest: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(dest)
        .map_err(|e| StegError::CryptoUnavailable(e.to_string()))
}

/// Generate a fresh AES-128 key for one message
pub fn generate_ephemeral_key() -> Result<MessageKey> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    fill_random(key.as_mut_slice())?;
    Ok(key)
}

/// Encrypt under AES-128-CBC with a new random IV, returning `IV ‖ ciphertext`
pub fn encrypt_block(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut iv = [0u8; BLOCK_SIZE];
    fill_random(&mut iv)?;
    Ok(encrypt_with_iv(key, &iv, plaintext))
}

pub(crate) fn encrypt_with_iv(
    key: &[u8; KEY_SIZE],
    iv: &[u8; BLOCK_SIZE],
    plaintext: &[u8],
) -> Vec<u8> {
    let cipher = Aes128::new(key.into());
    let pad = BLOCK_SIZE - plaintext.len() % BLOCK_SIZE;

    let mut output = Vec::with_capacity(BLOCK_SIZE + plaintext.len() + pad);
    output.extend_from_slice(iv);
    output.extend_from_slice(plaintext);
    output.resize(output.len() + pad, pad as u8);

    let mut prev = *iv;
    for chunk in output[BLOCK_SIZE..].chunks_exact_mut(BLOCK_SIZE) {
        xor_in_place(chunk, &prev);
        cipher.encrypt_block(Block::from_mut_slice(chunk));
        prev.copy_from_slice(chunk);
    }
    output
}

/// Decrypt `IV ‖ ciphertext` produced by [`encrypt_block`]
pub fn decrypt_block(key: &[u8; KEY_SIZE], data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 2 * BLOCK_SIZE || data.len() % BLOCK_SIZE != 0 {
        return Err(StegError::CryptoFailure(format!(
            "invalid ciphertext length: {} bytes",
            data.len()
        )));
    }

    let cipher = Aes128::new(key.into());
    let (iv, ciphertext) = data.split_at(BLOCK_SIZE);

    let mut prev = [0u8; BLOCK_SIZE];
    prev.copy_from_slice(iv);
    let mut plaintext = ciphertext.to_vec();
    let mut saved = [0u8; BLOCK_SIZE];
    for chunk in plaintext.chunks_exact_mut(BLOCK_SIZE) {
        saved.copy_from_slice(chunk);
        cipher.decrypt_block(Block::from_mut_slice(chunk));
        xor_in_place(chunk, &prev);
        prev = saved;
    }

    strip_padding(plaintext)
}

/// Remove and verify PKCS#7 padding
fn strip_padding(mut data: Vec<u8>) -> Result<Vec<u8>> {
    let bad_padding = || StegError::CryptoFailure("bad padding".into());
    let pad = *data.last().ok_or_else(bad_padding)? as usize;
    if pad == 0 || pad > BLOCK_SIZE || pad > data.len() {
        return Err(bad_padding());
    }
    let body_len = data.len() - pad;
    if data[body_len..].iter().any(|&b| b as usize != pad) {
        return Err(bad_padding());
    }
    data.truncate(body_len);
    Ok(data)
}

/// XOR `key` into `data`
pub(crate) fn xor_in_place(data: &mut [u8], key: &[u8]) {
    for (d, k) in data.iter_mut().zip(key.iter()) {
        *d ^= k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_from_hex(s: &str) -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&hex::decode(s).unwrap());
        key
    }

    #[test]
    fn test_sp800_38a_cbc_vector() {
        // NIST SP 800-38A F.2.1, first block
        let key = key_from_hex("2b7e151628aed2a6abf7158809cf4f3c");
        let iv = key_from_hex("000102030405060708090a0b0c0d0e0f");
        let plaintext = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();

        let output = encrypt_with_iv(&key, &iv, &plaintext);
        // IV + one data block + one full padding block
        assert_eq!(output.len(), 48);
        assert_eq!(&output[..16], &iv);
        assert_eq!(
            hex::encode(&output[16..32]),
            "7649abac8119b246cee98e9b12e9197d"
        );
        assert_eq!(decrypt_block(&key, &output).unwrap(), plaintext);
    }

    #[test]
    fn test_roundtrip_various_lengths() {
        let key = *generate_ephemeral_key().unwrap();
        for len in [0usize, 1, 15, 16, 17, 31, 32, 100] {
            let plaintext: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
            let encrypted = encrypt_block(&key, &plaintext).unwrap();
            assert_eq!(encrypted.len(), BLOCK_SIZE + (len / BLOCK_SIZE + 1) * BLOCK_SIZE);
            assert_eq!(decrypt_block(&key, &encrypted).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_iv_is_fresh_per_call() {
        let key = *generate_ephemeral_key().unwrap();
        let a = encrypt_block(&key, b"same message").unwrap();
        let b = encrypt_block(&key, b"same message").unwrap();
        assert_ne!(&a[..BLOCK_SIZE], &b[..BLOCK_SIZE]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_ephemeral_keys_differ() {
        let a = generate_ephemeral_key().unwrap();
        let b = generate_ephemeral_key().unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_decrypt_rejects_bad_lengths() {
        let key = [0u8; KEY_SIZE];
        for len in [0usize, 15, 16, 31, 33] {
            let result = decrypt_block(&key, &vec![0u8; len]);
            assert!(
                matches!(result, Err(StegError::CryptoFailure(_))),
                "length {len} should be rejected"
            );
        }
    }

    #[test]
    fn test_decrypt_wrong_key_fails_or_differs() {
        let key = [1u8; KEY_SIZE];
        let other = [2u8; KEY_SIZE];
        let encrypted = encrypt_block(&key, b"attack at dawn").unwrap();
        match decrypt_block(&other, &encrypted) {
            Ok(plaintext) => assert_ne!(plaintext, b"attack at dawn"),
            Err(e) => assert!(matches!(e, StegError::CryptoFailure(_))),
        }
    }

    #[test]
    fn test_strip_padding_rejects_inconsistent_bytes() {
        let mut data = vec![0u8; 16];
        data[15] = 3;
        data[14] = 3;
        data[13] = 2;
        assert!(strip_padding(data).is_err());
        assert!(strip_padding(vec![0u8; 16]).is_err());
        assert!(strip_padding(vec![17u8; 16]).is_err());
    }
}
