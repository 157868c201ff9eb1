//! Substrate signing requests.
//!
//! Layout after the `0x53` discriminator:
//! - crypto scheme (1 byte)
//! - command (1 byte)
//! - public key (32 bytes)
//! - signing payload (variable)
//! - spec version (4 bytes, SCALE `u32`)
//! - genesis hash (32 bytes)
//!
//! The genesis hash selects the network whose address prefix renders the
//! account. Transaction payloads longer than [`OVERSIZED_THRESHOLD`] are
//! signed by hash, so their call data is replaced by its blake2 digest.

use serde::Serialize;

use crate::address::{AddressEncoder, PUBLIC_KEY_LEN};
use crate::compact::{read_u32, split_compact_prefix};
use crate::convert::hex_with_prefix;
use crate::error::{DecodeError, SubstrateError};
use crate::hashing::PayloadHasher;
use crate::network::NetworkRegistry;
use crate::payload::Action;

pub const GENESIS_HASH_LEN: usize = 32;
pub const SPEC_VERSION_LEN: usize = 4;

/// Signing payloads strictly longer than this are oversized.
pub const OVERSIZED_THRESHOLD: usize = 256;

const CRYPTO_OFFSET: usize = 1;
const COMMAND_OFFSET: usize = 2;
const PUBLIC_KEY_OFFSET: usize = 3;
const PAYLOAD_OFFSET: usize = PUBLIC_KEY_OFFSET + PUBLIC_KEY_LEN;
const MIN_LEN: usize = PAYLOAD_OFFSET + SPEC_VERSION_LEN + GENESIS_HASH_LEN;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CryptoScheme {
    Ed25519,
    Sr25519,
    Unknown(u8),
}

impl From<u8> for CryptoScheme {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Ed25519,
            0x01 => Self::Sr25519,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    SignMortal = 0x00,
    SignHash = 0x01,
    SignImmortal = 0x02,
    SignMessage = 0x03,
}

impl TryFrom<u8> for Command {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::SignMortal),
            0x01 => Ok(Self::SignHash),
            0x02 => Ok(Self::SignImmortal),
            0x03 => Ok(Self::SignMessage),
            other => Err(DecodeError::UnrecognizedCommand(other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstrateSigningRequest {
    pub action: Action,
    pub crypto_scheme: CryptoScheme,
    pub is_hash: bool,
    pub oversized: bool,
    pub account: String,
    #[serde(serialize_with = "crate::payload::serialize_hex")]
    pub public_key: [u8; PUBLIC_KEY_LEN],
    /// Everything after the public key: signing payload, spec version and
    /// genesis hash, as the signer is expected to sign it.
    #[serde(serialize_with = "crate::payload::serialize_hex")]
    pub raw_payload: Vec<u8>,
    /// Call data (or its hash when oversized) for transactions, the whole
    /// signing payload for hashes and messages. Always `0x`-prefixed hex.
    pub data: String,
    pub spec_version: u32,
    pub genesis_hash: String,
}

impl SubstrateSigningRequest {
    /// Rejects requests whose crypto scheme byte was not recognised.
    pub fn require_known_scheme(&self) -> Result<(), DecodeError> {
        match self.crypto_scheme {
            CryptoScheme::Unknown(byte) => Err(DecodeError::UnknownCryptoScheme(byte)),
            CryptoScheme::Ed25519 | CryptoScheme::Sr25519 => Ok(()),
        }
    }
}

pub async fn decode<H, A>(
    bytes: &[u8],
    networks: &NetworkRegistry,
    hasher: &H,
    encoder: &A,
) -> Result<SubstrateSigningRequest, DecodeError>
where
    H: PayloadHasher + ?Sized,
    A: AddressEncoder + ?Sized,
{
    if bytes.len() < MIN_LEN {
        return Err(DecodeError::substrate(
            bytes,
            SubstrateError::Truncated {
                expected: MIN_LEN,
                actual: bytes.len(),
            },
        ));
    }

    let crypto_scheme = CryptoScheme::from(bytes[CRYPTO_OFFSET]);
    let command_byte = bytes[COMMAND_OFFSET];
    let mut public_key = [0u8; PUBLIC_KEY_LEN];
    public_key.copy_from_slice(&bytes[PUBLIC_KEY_OFFSET..PAYLOAD_OFFSET]);

    let raw_payload = &bytes[PAYLOAD_OFFSET..];
    let (rest, genesis) = raw_payload.split_at(raw_payload.len() - GENESIS_HASH_LEN);
    let (signing_payload, spec_version_bytes) = rest.split_at(rest.len() - SPEC_VERSION_LEN);

    let genesis_hash = hex_with_prefix(genesis);
    let Some(network) = networks.get(&genesis_hash) else {
        tracing::warn!(%genesis_hash, "signing request for unknown network");
        return Err(DecodeError::UnknownNetwork(genesis_hash));
    };

    let spec_version =
        read_u32(spec_version_bytes).map_err(|err| DecodeError::substrate(bytes, err))?;
    let command = Command::try_from(command_byte)?;
    let is_oversized = signing_payload.len() > OVERSIZED_THRESHOLD;
    let account = encoder
        .encode(&public_key, network.address_prefix)
        .map_err(|err| DecodeError::substrate(bytes, err))?;

    let (action, oversized, is_hash, data) = match command {
        Command::SignMortal | Command::SignImmortal => {
            let (_, call_data) = split_compact_prefix(signing_payload)
                .map_err(|err| DecodeError::substrate(bytes, err))?;
            let data = if is_oversized {
                tracing::debug!(len = signing_payload.len(), "hashing oversized call data");
                hasher
                    .hash_hex(&hex::encode(call_data))
                    .await
                    .map_err(|err| DecodeError::substrate(bytes, err))?
            } else {
                hex_with_prefix(call_data)
            };
            (Action::SignTransaction, is_oversized, is_oversized, data)
        }
        Command::SignHash | Command::SignMessage => (
            Action::SignData,
            false,
            command == Command::SignHash,
            hex_with_prefix(signing_payload),
        ),
    };

    Ok(SubstrateSigningRequest {
        action,
        crypto_scheme,
        is_hash,
        oversized,
        account,
        public_key,
        raw_payload: raw_payload.to_vec(),
        data,
        spec_version,
        genesis_hash,
    })
}
