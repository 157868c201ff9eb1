use thiserror::Error;

use sp_crypto_hashing::blake2_512;

pub const PUBLIC_KEY_LEN: usize = 32;

const SS58_CHECKSUM_CONTEXT: &[u8] = b"SS58PRE";
const SS58_CHECKSUM_LEN: usize = 2;
const SS58_MAX_PREFIX: u16 = 16_383;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address prefix {0} is out of range")]
    InvalidPrefix(u16),

    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("invalid address length {0}")]
    InvalidLength(usize),

    #[error("address checksum mismatch")]
    BadChecksum,
}

/// Address-encoding primitive: renders a public key for a given network.
pub trait AddressEncoder: Send + Sync {
    fn encode(&self, public_key: &[u8; PUBLIC_KEY_LEN], prefix: u16)
        -> Result<String, AddressError>;
}

/// Substrate SS58 addresses for 32-byte public keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ss58Encoder;

impl AddressEncoder for Ss58Encoder {
    fn encode(
        &self,
        public_key: &[u8; PUBLIC_KEY_LEN],
        prefix: u16,
    ) -> Result<String, AddressError> {
        let mut payload = encode_prefix(prefix)?;
        payload.extend_from_slice(public_key);
        let checksum = ss58_checksum(&payload);
        payload.extend_from_slice(&checksum[..SS58_CHECKSUM_LEN]);
        Ok(bs58::encode(payload).into_string())
    }
}

impl Ss58Encoder {
    /// Parses an SS58 address back into its prefix and public key.
    pub fn decode(address: &str) -> Result<(u16, [u8; PUBLIC_KEY_LEN]), AddressError> {
        let bytes = bs58::decode(address)
            .into_vec()
            .map_err(|err| AddressError::Base58(err.to_string()))?;
        let (prefix_len, prefix) = match bytes.first() {
            Some(first @ 0..=63) => (1, u16::from(*first)),
            Some(64..=127) if bytes.len() > 1 => {
                let lower = (bytes[0] << 2) | (bytes[1] >> 6);
                let upper = bytes[1] & 0b0011_1111;
                (2, u16::from(lower) | (u16::from(upper) << 8))
            }
            _ => return Err(AddressError::InvalidLength(bytes.len())),
        };
        if bytes.len() != prefix_len + PUBLIC_KEY_LEN + SS58_CHECKSUM_LEN {
            return Err(AddressError::InvalidLength(bytes.len()));
        }
        let body_end = prefix_len + PUBLIC_KEY_LEN;
        let checksum = ss58_checksum(&bytes[..body_end]);
        if bytes[body_end..] != checksum[..SS58_CHECKSUM_LEN] {
            return Err(AddressError::BadChecksum);
        }
        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        public_key.copy_from_slice(&bytes[prefix_len..body_end]);
        Ok((prefix, public_key))
    }
}

fn encode_prefix(prefix: u16) -> Result<Vec<u8>, AddressError> {
    match prefix {
        0..=63 => Ok(vec![prefix as u8]),
        64..=SS58_MAX_PREFIX => {
            // 14-bit identifier split over two bytes, first byte tagged 0b01.
            let first = ((prefix & 0b0000_0000_1111_1100) as u8) >> 2;
            let second = ((prefix >> 8) as u8) | (((prefix & 0b0000_0000_0000_0011) as u8) << 6);
            Ok(vec![first | 0b0100_0000, second])
        }
        _ => Err(AddressError::InvalidPrefix(prefix)),
    }
}

fn ss58_checksum(payload: &[u8]) -> [u8; 64] {
    let mut preimage = Vec::with_capacity(SS58_CHECKSUM_CONTEXT.len() + payload.len());
    preimage.extend_from_slice(SS58_CHECKSUM_CONTEXT);
    preimage.extend_from_slice(payload);
    blake2_512(&preimage)
}
