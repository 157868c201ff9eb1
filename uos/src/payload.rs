use serde::{Serialize, Serializer};

use crate::address::AddressEncoder;
use crate::error::DecodeError;
use crate::ethereum::{self, EthereumSigningRequest};
use crate::hashing::PayloadHasher;
use crate::network::NetworkRegistry;
use crate::substrate::{self, SubstrateSigningRequest};

/// First byte of a complete payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PayloadKind {
    Ethereum = 0x45,
    Substrate = 0x53,
}

impl TryFrom<u8> for PayloadKind {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x45 => Ok(Self::Ethereum),
            0x53 => Ok(Self::Substrate),
            other => Err(DecodeError::UnrecognizedPayloadType(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    SignData,
    SignTransaction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParsedPayload {
    Ethereum(EthereumSigningRequest),
    Substrate(SubstrateSigningRequest),
}

impl ParsedPayload {
    pub fn action(&self) -> Action {
        match self {
            Self::Ethereum(request) => request.action,
            Self::Substrate(request) => request.action,
        }
    }

    pub fn account(&self) -> &str {
        match self {
            Self::Ethereum(request) => &request.account,
            Self::Substrate(request) => &request.account,
        }
    }
}

/// Routes a complete payload to the decoder for its kind.
pub async fn dispatch<H, A>(
    bytes: &[u8],
    networks: &NetworkRegistry,
    hasher: &H,
    encoder: &A,
) -> Result<ParsedPayload, DecodeError>
where
    H: PayloadHasher + ?Sized,
    A: AddressEncoder + ?Sized,
{
    let first = *bytes.first().ok_or(DecodeError::EmptyPayload)?;
    let kind = PayloadKind::try_from(first)?;
    tracing::debug!(?kind, len = bytes.len(), "dispatching payload");
    match kind {
        PayloadKind::Ethereum => ethereum::decode(bytes).map(ParsedPayload::Ethereum),
        PayloadKind::Substrate => substrate::decode(bytes, networks, hasher, encoder)
            .await
            .map(ParsedPayload::Substrate),
    }
}

pub(crate) fn serialize_hex<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&crate::convert::hex_with_prefix(bytes.as_ref()))
}
