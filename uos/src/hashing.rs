use async_trait::async_trait;
use thiserror::Error;

use crate::convert::hex_with_prefix;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("hasher unavailable: {0}")]
    Unavailable(String),
}

/// Hashing primitive used for oversized signing payloads.
///
/// Implementations may call out to a platform service, hence the async
/// signature. The decoder awaits the result before producing its output.
#[async_trait]
pub trait PayloadHasher: Send + Sync {
    /// Hashes the bytes spelled by `hex_data` (no `0x` prefix) and returns the
    /// digest as `0x`-prefixed hex.
    async fn hash_hex(&self, hex_data: &str) -> Result<String, HashError>;
}

/// Blake2b with a 256-bit digest, matching Substrate's `blake2_256`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake2Hasher;

#[async_trait]
impl PayloadHasher for Blake2Hasher {
    async fn hash_hex(&self, hex_data: &str) -> Result<String, HashError> {
        let bytes = hex::decode(hex_data)?;
        Ok(hex_with_prefix(&sp_crypto_hashing::blake2_256(&bytes)))
    }
}
