use crate::cli::load_carrier;
use crate::envelope::EnvelopeEngine;
use crate::error::Result;
use crate::keystore::KeyProvider;
use crate::stego::reveal_message;
use std::path::Path;

/// Options for the extract command
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Input is Base64 PNG text rather than an image file
    pub transport: bool,
}

/// Recover and decrypt the message hidden in `input_path`
pub fn extract_from_image<P: KeyProvider>(
    input_path: &Path,
    options: &ExtractOptions,
    keys: P,
) -> Result<String> {
    let carrier = load_carrier(input_path, options.transport)?;
    reveal_message(&EnvelopeEngine::new(keys), &carrier)
}
