use crate::error::{Result, StegError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// Size of the wrapped-key length prefix in bytes
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Binary envelope carried inside the image
/// Layout: [wrapped_key_len: u32 BE][wrapped_key][IV ‖ ciphertext]
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    wrapped_key: Vec<u8>,
    encrypted: Vec<u8>,
}

impl Envelope {
    /// Assemble an envelope; the wrapped key must be non-empty
    pub fn new(wrapped_key: Vec<u8>, encrypted: Vec<u8>) -> Result<Self> {
        if wrapped_key.is_empty() {
            return Err(StegError::CryptoFailure("wrapped key is empty".into()));
        }
        if u32::try_from(wrapped_key.len()).is_err() {
            return Err(StegError::InvalidInput(format!(
                "wrapped key too long: {} bytes",
                wrapped_key.len()
            )));
        }
        Ok(Self {
            wrapped_key,
            encrypted,
        })
    }

    pub fn wrapped_key(&self) -> &[u8] {
        &self.wrapped_key
    }

    /// IV ‖ ciphertext
    pub fn encrypted(&self) -> &[u8] {
        &self.encrypted
    }

    /// Serialize to the binary wire format
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf =
            Vec::with_capacity(LENGTH_PREFIX_SIZE + self.wrapped_key.len() + self.encrypted.len());
        buf.extend_from_slice(&(self.wrapped_key.len() as u32).to_be_bytes());
        buf.extend_from_slice(&self.wrapped_key);
        buf.extend_from_slice(&self.encrypted);
        buf
    }

    /// Parse the binary wire format
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < LENGTH_PREFIX_SIZE {
            return Err(StegError::MalformedPayload(format!(
                "envelope too short: {} bytes",
                data.len()
            )));
        }
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        prefix.copy_from_slice(&data[..LENGTH_PREFIX_SIZE]);
        let wrapped_len = u32::from_be_bytes(prefix) as usize;

        let rest = &data[LENGTH_PREFIX_SIZE..];
        if wrapped_len == 0 || wrapped_len > rest.len() {
            return Err(StegError::MalformedPayload(format!(
                "invalid wrapped key length: {}",
                wrapped_len
            )));
        }

        let (wrapped_key, encrypted) = rest.split_at(wrapped_len);
        Ok(Self {
            wrapped_key: wrapped_key.to_vec(),
            encrypted: encrypted.to_vec(),
        })
    }

    /// Standard Base64 text form
    pub fn to_base64(&self) -> String {
        encode_base64(&self.to_bytes())
    }

    /// Parse the Base64 text form; embedded whitespace is ignored
    pub fn from_base64(text: &str) -> Result<Self> {
        let bytes = decode_base64(text)
            .map_err(|e| StegError::MalformedPayload(format!("invalid Base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("wrapped_key_len", &self.wrapped_key.len())
            .field("encrypted_len", &self.encrypted.len())
            .finish()
    }
}

/// Standard padded Base64 without line breaks
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode standard Base64, skipping ASCII whitespace (line-wrapped input is accepted)
pub fn decode_base64(text: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact)
}
