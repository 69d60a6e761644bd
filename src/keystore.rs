//! Master key holder and the [`KeyProvider`] seam used by the envelope engine.
//!
//! The store is set at most once. There is no clear or rotate operation; a
//! process restart is the only reset.

use crate::error::{Result, StegError};
use crate::header::{decode_base64, encode_base64};
use crate::pipeline::fill_random;
use crate::pipeline::keywrap::Kek;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::{Arc, OnceLock};
use zeroize::Zeroizing;

/// Size of a freshly generated master key in bytes (AES-128)
pub const MASTER_KEY_SIZE: usize = 16;

/// Long-lived AES key used to wrap per-message keys
#[derive(Clone)]
pub struct MasterKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl MasterKey {
    /// Accepts 16, 24 or 32 byte AES keys
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            16 | 24 | 32 => Ok(Self {
                bytes: Zeroizing::new(bytes.to_vec()),
            }),
            n => Err(StegError::InvalidInput(format!(
                "master key must be 16, 24 or 32 bytes, got {}",
                n
            ))),
        }
    }

    pub fn from_base64(text: &str) -> Result<Self> {
        let bytes = Zeroizing::new(decode_base64(text).map_err(|e| {
            StegError::InvalidInput(format!("master key is not valid Base64: {}", e))
        })?);
        Self::from_bytes(&bytes)
    }

    /// Generate a new random AES-128 master key
    pub fn generate() -> Result<Self> {
        let mut bytes = Zeroizing::new(vec![0u8; MASTER_KEY_SIZE]);
        fill_random(&mut bytes)?;
        Ok(Self { bytes })
    }

    pub fn to_base64(&self) -> String {
        encode_base64(&self.bytes)
    }

    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8
    }

    /// First 8 bytes of SHA-256 over the key, hex encoded
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.bytes.as_slice());
        hex::encode(&digest[..8])
    }

    pub(crate) fn kek(&self) -> Result<Kek> {
        Kek::new(&self.bytes)
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("bits", &self.bit_len())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Source of the master key for wrap/unwrap
pub trait KeyProvider: Send + Sync {
    /// The current master key, or `KeyNotConfigured`
    fn master_key(&self) -> Result<MasterKey>;
}

impl KeyProvider for MasterKey {
    fn master_key(&self) -> Result<MasterKey> {
        Ok(self.clone())
    }
}

impl<P: KeyProvider + ?Sized> KeyProvider for &P {
    fn master_key(&self) -> Result<MasterKey> {
        (**self).master_key()
    }
}

impl<P: KeyProvider + ?Sized> KeyProvider for Arc<P> {
    fn master_key(&self) -> Result<MasterKey> {
        (**self).master_key()
    }
}

static GLOBAL_STORE: MasterKeyStore = MasterKeyStore::new();

/// Set-once holder for the master key
#[derive(Debug, Default)]
pub struct MasterKeyStore {
    key: OnceLock<MasterKey>,
}

impl MasterKeyStore {
    pub const fn new() -> Self {
        Self {
            key: OnceLock::new(),
        }
    }

    /// Process-wide store for callers with no handle to pass around
    pub fn global() -> &'static MasterKeyStore {
        &GLOBAL_STORE
    }

    /// Install the master key from its Base64 form
    ///
    /// Never fails: empty or invalid input and repeated calls are logged and
    /// leave the current state unchanged.
    pub fn set_master_key(&self, base64_key: &str) {
        if base64_key.trim().is_empty() {
            tracing::error!("received empty master key; store left unchanged");
            return;
        }

        let key = match MasterKey::from_base64(base64_key) {
            Ok(key) => key,
            Err(e) => {
                tracing::error!(error = %e, "rejected master key; store left unchanged");
                return;
            }
        };

        let fingerprint = key.fingerprint();
        let bits = key.bit_len();
        match self.key.set(key) {
            Ok(()) => tracing::info!(%fingerprint, bits, "master key installed"),
            Err(_) => tracing::warn!(%fingerprint, "master key already set; replacement ignored"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.key.get().is_some()
    }
}

impl KeyProvider for MasterKeyStore {
    fn master_key(&self) -> Result<MasterKey> {
        self.key.get().cloned().ok_or(StegError::KeyNotConfigured)
    }
}
