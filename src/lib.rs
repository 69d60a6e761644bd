//! Stegcrypt - LSB Image Steganography with AES Envelope Encryption
//!
//! Text messages are encrypted under a fresh per-message AES-128 key, that
//! key is wrapped with a shared master key (RFC 3394), and the resulting
//! Base64 envelope is hidden in the least significant bit of each pixel's
//! blue channel.
//!
//! ## Pipeline
//!
//! ```text
//! Plaintext → Envelope (AES-CBC + KeyWrap) → Base64 → Frame (u32 len + bits) → Blue LSB → PNG → Base64
//! ```
//!
//! - **Envelope**: `[u32 BE wrapped-key len][wrapped key][IV ‖ ciphertext]`
//! - **Frame**: 32-bit big-endian byte count, then message bits MSB first
//! - **Blue LSB**: one bit per pixel, row-major, nothing else changes
//! - **Transport**: the stego image as Base64-encoded PNG text
//!
//! ## Example
//!
//! ```no_run
//! use stegcrypt::{stego, transport, EnvelopeEngine, MasterKeyStore};
//! use std::path::Path;
//!
//! let store = MasterKeyStore::global();
//! store.set_master_key("AAECAwQFBgcICQoLDA0ODw==");
//! let engine = EnvelopeEngine::new(store);
//!
//! let cover = transport::load_image(Path::new("cover.png")).unwrap();
//! let stego_image = stego::conceal_message(&engine, &cover, "meet at noon").unwrap();
//! transport::save_png(Path::new("stego.png"), &stego_image).unwrap();
//!
//! let message = stego::reveal_message(&engine, &stego_image).unwrap();
//! assert_eq!(message, "meet at noon");
//! ```

pub mod capacity;
pub mod carrier;
pub mod cli;
pub mod config;
pub mod envelope;
pub mod error;
pub mod header;
pub mod keystore;
pub mod pipeline;
pub mod stego;
pub mod transport;

pub use carrier::{Pixel, PixelBuffer};
pub use envelope::EnvelopeEngine;
pub use error::{Result, StegError};
pub use header::Envelope;
pub use keystore::{KeyProvider, MasterKey, MasterKeyStore};
