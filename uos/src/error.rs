use thiserror::Error;

use crate::address::AddressError;
use crate::hashing::HashError;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("scan is not a recognised UOS encoding")]
    UnparseableScan,

    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] FrameError),

    #[error("payload is empty")]
    EmptyPayload,

    #[error("unrecognised payload type 0x{0:02x}")]
    UnrecognizedPayloadType(u8),

    #[error("unrecognised ethereum action 0x{0:02x}")]
    MalformedAction(u8),

    #[error("payload too short (needed {expected} bytes, got {actual})")]
    TruncatedPayload { expected: usize, actual: usize },

    #[error("unknown network with genesis hash {0}")]
    UnknownNetwork(String),

    #[error("unrecognised substrate command 0x{0:02x}")]
    UnrecognizedCommand(u8),

    #[error("unknown crypto scheme 0x{0:02x}")]
    UnknownCryptoScheme(u8),

    #[error("malformed substrate payload {payload}: {source}")]
    MalformedSubstratePayload {
        payload: String,
        #[source]
        source: SubstrateError,
    },

    #[error("payload is not valid utf-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame count {0} exceeds the supported maximum")]
    TooManyFrames(u16),

    #[error("frame count {0} does not describe a multipart payload")]
    NotMultipart(u16),

    #[error("frame header needs 5 bytes, got {0}")]
    TruncatedHeader(usize),

    #[error("frame announces {actual} frames, expected {expected}")]
    FrameCountMismatch { expected: u16, actual: u16 },

    #[error("frame index {index} out of range for {frame_count} frames")]
    FrameIndexOutOfRange { index: u16, frame_count: u16 },

    #[error("multipart payload is incomplete ({missing} frames missing)")]
    Incomplete { missing: usize },

    #[error("payload of {0} bytes does not fit a 2-byte length prefix")]
    PayloadTooLarge(usize),
}

/// Inner cause of a [`DecodeError::MalformedSubstratePayload`].
#[derive(Debug, Error)]
pub enum SubstrateError {
    #[error("body too short (needed {expected} bytes, got {actual})")]
    Truncated { expected: usize, actual: usize },

    #[error("invalid compact prefix: {0}")]
    CompactPrefix(#[from] codec::Error),

    #[error("hashing failed: {0}")]
    Hashing(#[from] HashError),

    #[error("address encoding failed: {0}")]
    Address(#[from] AddressError),
}

impl DecodeError {
    pub(crate) fn substrate(body: &[u8], source: impl Into<SubstrateError>) -> Self {
        Self::MalformedSubstratePayload {
            payload: crate::convert::hex_with_prefix(body),
            source: source.into(),
        }
    }
}
