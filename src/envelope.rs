//! Envelope encryption: each message is encrypted under a fresh AES-128 key,
//! and that key is wrapped under the master key from the injected
//! [`KeyProvider`].
//!
//! ```text
//! plaintext → AES-128-CBC (per-message key, random IV) → IV‖ciphertext
//! per-message key → RFC 3394 wrap (master key) → wrapped key
//! [u32 BE len][wrapped key][IV‖ciphertext] → Base64
//! ```

use crate::error::{Result, StegError};
use crate::header::Envelope;
use crate::keystore::KeyProvider;
use crate::pipeline::{cipher, keywrap, MessageKey, KEY_SIZE};
use zeroize::Zeroizing;

/// Envelope encryption engine bound to a master key provider
#[derive(Debug, Clone)]
pub struct EnvelopeEngine<P> {
    provider: P,
}

impl<P: KeyProvider> EnvelopeEngine<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fresh per-message key from the OS CSPRNG
    pub fn generate_ephemeral_key(&self) -> Result<MessageKey> {
        cipher::generate_ephemeral_key()
    }

    /// Wrap a per-message key under the master key
    pub fn wrap_key(&self, key: &MessageKey) -> Result<Vec<u8>> {
        let kek = self.provider.master_key()?.kek()?;
        keywrap::wrap(&kek, key.as_slice())
    }

    /// Unwrap and verify a per-message key
    pub fn unwrap_key(&self, wrapped: &[u8]) -> Result<MessageKey> {
        let kek = self.provider.master_key()?.kek()?;
        let raw = keywrap::unwrap(&kek, wrapped)?;
        if raw.len() != KEY_SIZE {
            return Err(StegError::CryptoFailure(format!(
                "unwrapped key has {} bytes, expected {}",
                raw.len(),
                KEY_SIZE
            )));
        }
        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        key.copy_from_slice(&raw);
        Ok(key)
    }

    /// Encrypt text into a Base64 envelope
    pub fn encrypt_message(&self, plaintext: &str) -> Result<String> {
        let key = self.generate_ephemeral_key()?;
        let encrypted = cipher::encrypt_block(&key, plaintext.as_bytes())?;
        let wrapped = self.wrap_key(&key)?;

        let envelope = Envelope::new(wrapped, encrypted)?;
        let text = envelope.to_base64();
        tracing::debug!(
            plaintext_bytes = plaintext.len(),
            envelope_chars = text.len(),
            "encrypted message envelope"
        );
        Ok(text)
    }

    /// Decrypt a Base64 envelope back into text
    pub fn decrypt_message(&self, envelope_text: &str) -> Result<String> {
        if envelope_text.trim().is_empty() {
            return Err(StegError::InvalidInput("envelope text is empty".into()));
        }

        let envelope = Envelope::from_base64(envelope_text)?;
        let key = self.unwrap_key(envelope.wrapped_key())?;
        let plaintext = cipher::decrypt_block(&key, envelope.encrypted())?;
        tracing::debug!(plaintext_bytes = plaintext.len(), "decrypted message envelope");

        String::from_utf8(plaintext)
            .map_err(|_| StegError::MalformedPayload("decrypted message is not valid UTF-8".into()))
    }
}
