use crate::capacity::{max_payload_bytes, max_plaintext_bytes};
use crate::cli::load_carrier;
use crate::error::{Result, StegError};
use crate::pipeline::{lsb, LENGTH_PREFIX_BITS};
use std::path::Path;

/// Display capacity and frame information about a carrier image
pub fn show_info(path: &Path, transport: bool) -> Result<String> {
    let carrier = load_carrier(path, transport)?;
    let capacity = carrier.capacity_bits();

    let mut output = String::new();

    output.push_str("Stegcrypt Carrier Information\n");
    output.push_str("=============================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!(
        "Dimensions: {}x{}\n",
        carrier.width(),
        carrier.height()
    ));
    output.push('\n');

    output.push_str("Capacity:\n");
    output.push_str(&format!("  Carrier bits: {}\n", capacity));
    output.push_str(&format!(
        "  Max payload: {}\n",
        format_size(max_payload_bytes(capacity))
    ));
    match max_plaintext_bytes(capacity) {
        Some(bytes) => output.push_str(&format!("  Max message: {}\n", format_size(bytes))),
        None => output.push_str("  Max message: none (carrier too small)\n"),
    }
    output.push('\n');

    output.push_str("Hidden frame:\n");
    match lsb::extract(&carrier) {
        Ok(bits) => {
            let bytes = (bits.len() as u64 - LENGTH_PREFIX_BITS as u64) / 8;
            output.push_str(&format!("  Detected: {} payload\n", format_size(bytes)));
        }
        Err(StegError::InvalidLength(len)) => {
            output.push_str(&format!("  Not detected (header declares {} bytes)\n", len));
        }
        Err(StegError::InsufficientCapacity { required, .. }) => {
            output.push_str(&format!(
                "  Not detected (header needs {} bits)\n",
                required
            ));
        }
        Err(e) => return Err(e),
    }

    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
