use crate::error::Result;
use crate::keystore::MasterKey;

/// Generate a fresh AES-128 master key for distribution to both peers
pub fn generate_master_key() -> Result<MasterKey> {
    let key = MasterKey::generate()?;
    tracing::info!(fingerprint = %key.fingerprint(), "generated master key");
    Ok(key)
}
