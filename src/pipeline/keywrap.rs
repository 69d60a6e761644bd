//! AES key wrap (RFC 3394) with the default initial value.
//!
//! Wrapping both encrypts and integrity-protects key material: any change to
//! the wrapped bytes fails the initial-value check on unwrap.

use crate::error::{Result, StegError};
use crate::pipeline::cipher::xor_in_place;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256, Block};
use zeroize::Zeroizing;

/// RFC 3394 default initial value
pub const DEFAULT_IV: [u8; 8] = [0xA6; 8];

/// Semiblock size in bytes
const SEMIBLOCK: usize = 8;

/// Key-encryption key for any AES key size
pub enum Kek {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl Kek {
    /// Build a KEK from 16, 24 or 32 raw key bytes
    pub fn new(key: &[u8]) -> Result<Self> {
        let invalid = |_| StegError::InvalidInput(format!("invalid KEK length: {}", key.len()));
        match key.len() {
            16 => Ok(Self::Aes128(Aes128::new_from_slice(key).map_err(invalid)?)),
            24 => Ok(Self::Aes192(Aes192::new_from_slice(key).map_err(invalid)?)),
            32 => Ok(Self::Aes256(Aes256::new_from_slice(key).map_err(invalid)?)),
            n => Err(StegError::InvalidInput(format!(
                "unsupported KEK length: {} bytes",
                n
            ))),
        }
    }

    fn encrypt(&self, block: &mut Block) {
        match self {
            Self::Aes128(c) => c.encrypt_block(block),
            Self::Aes192(c) => c.encrypt_block(block),
            Self::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt(&self, block: &mut Block) {
        match self {
            Self::Aes128(c) => c.decrypt_block(block),
            Self::Aes192(c) => c.decrypt_block(block),
            Self::Aes256(c) => c.decrypt_block(block),
        }
    }
}

/// Wrap key material (at least 16 bytes, multiple of 8) under `kek`
/// Output is 8 bytes longer than the input
pub fn wrap(kek: &Kek, key: &[u8]) -> Result<Vec<u8>> {
    if key.len() < 2 * SEMIBLOCK || key.len() % SEMIBLOCK != 0 {
        return Err(StegError::InvalidInput(format!(
            "key to wrap must be a multiple of 8 bytes and at least 16, got {}",
            key.len()
        )));
    }

    let n = key.len() / SEMIBLOCK;
    let mut a = DEFAULT_IV;
    let mut r = Zeroizing::new(key.to_vec());
    let mut block = Block::default();

    for j in 0..6 {
        for i in 0..n {
            let ri = &mut r[i * SEMIBLOCK..(i + 1) * SEMIBLOCK];
            block[..SEMIBLOCK].copy_from_slice(&a);
            block[SEMIBLOCK..].copy_from_slice(ri);
            kek.encrypt(&mut block);

            let t = (n * j + i + 1) as u64;
            a.copy_from_slice(&block[..SEMIBLOCK]);
            xor_in_place(&mut a, &t.to_be_bytes());
            ri.copy_from_slice(&block[SEMIBLOCK..]);
        }
    }

    let mut wrapped = Vec::with_capacity(SEMIBLOCK + key.len());
    wrapped.extend_from_slice(&a);
    wrapped.extend_from_slice(&r);
    Ok(wrapped)
}

/// Unwrap and verify key material produced by [`wrap`]
pub fn unwrap(kek: &Kek, wrapped: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if wrapped.len() < 3 * SEMIBLOCK || wrapped.len() % SEMIBLOCK != 0 {
        return Err(StegError::CryptoFailure(format!(
            "invalid wrapped key length: {} bytes",
            wrapped.len()
        )));
    }

    let n = wrapped.len() / SEMIBLOCK - 1;
    let mut a = [0u8; SEMIBLOCK];
    a.copy_from_slice(&wrapped[..SEMIBLOCK]);
    let mut r = Zeroizing::new(wrapped[SEMIBLOCK..].to_vec());
    let mut block = Block::default();

    for j in (0..6).rev() {
        for i in (0..n).rev() {
            let ri = &mut r[i * SEMIBLOCK..(i + 1) * SEMIBLOCK];
            let t = (n * j + i + 1) as u64;
            xor_in_place(&mut a, &t.to_be_bytes());
            block[..SEMIBLOCK].copy_from_slice(&a);
            block[SEMIBLOCK..].copy_from_slice(ri);
            kek.decrypt(&mut block);

            a.copy_from_slice(&block[..SEMIBLOCK]);
            ri.copy_from_slice(&block[SEMIBLOCK..]);
        }
    }

    if !is_default_iv(&a) {
        return Err(StegError::CryptoFailure(
            "key wrap integrity check failed".into(),
        ));
    }
    Ok(r)
}

/// Constant-time check of the recovered integrity value
fn is_default_iv(a: &[u8; SEMIBLOCK]) -> bool {
    a.iter()
        .zip(DEFAULT_IV.iter())
        .fold(0u8, |diff, (x, y)| diff | (x ^ y))
        == 0
}
