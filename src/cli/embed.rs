use crate::capacity::{analyze_payload, envelope_text_len, CapacityReport};
use crate::envelope::EnvelopeEngine;
use crate::error::Result;
use crate::keystore::KeyProvider;
use crate::stego::conceal_message;
use crate::transport::{image_to_string, load_image, save_png};
use std::path::Path;

/// Options for the embed command
#[derive(Debug, Clone, Default)]
pub struct EmbedOptions {
    pub message: String,
    /// Write Base64 PNG text instead of a PNG file
    pub transport: bool,
}

/// Hide an encrypted message in `input_path` and write the stego image to `output_path`
/// Returns how the envelope mapped onto the carrier
pub fn embed_into_image<P: KeyProvider>(
    input_path: &Path,
    output_path: &Path,
    options: &EmbedOptions,
    keys: P,
) -> Result<CapacityReport> {
    let carrier = load_image(input_path)?;
    let engine = EnvelopeEngine::new(keys);
    let stego = conceal_message(&engine, &carrier, &options.message)?;

    if options.transport {
        std::fs::write(output_path, image_to_string(&stego)?)?;
    } else {
        save_png(output_path, &stego)?;
    }

    let report = analyze_payload(&carrier, envelope_text_len(options.message.len()));
    tracing::info!(
        output = %output_path.display(),
        bits = report.required_bits,
        capacity = report.available_bits,
        "wrote stego image"
    );
    Ok(report)
}
