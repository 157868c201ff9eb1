//! Ethereum signing requests.
//!
//! Layout: `0x45 <action> <22-byte address field> <data>`, where `data` is an
//! RLP-encoded transaction for [`Action::SignTransaction`] and raw bytes for
//! [`Action::SignData`].

use serde::Serialize;

use crate::convert::hex_with_prefix;
use crate::error::DecodeError;
use crate::payload::Action;

pub const ADDRESS_FIELD_LEN: usize = 22;

const ACTION_OFFSET: usize = 1;
const ADDRESS_OFFSET: usize = 2;
const DATA_OFFSET: usize = ADDRESS_OFFSET + ADDRESS_FIELD_LEN;

const ACTION_SIGN_DATA: u8 = 0x00;
const ACTION_SIGN_TRANSACTION: u8 = 0x01;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EthereumSigningRequest {
    pub action: Action,
    pub account: String,
    #[serde(serialize_with = "crate::payload::serialize_hex")]
    pub payload: Vec<u8>,
}

impl EthereumSigningRequest {
    /// Whether [`Self::payload`] is an RLP-encoded transaction.
    pub fn is_rlp(&self) -> bool {
        self.action == Action::SignTransaction
    }
}

fn action_from_byte(byte: u8) -> Result<Action, DecodeError> {
    match byte {
        ACTION_SIGN_DATA => Ok(Action::SignData),
        ACTION_SIGN_TRANSACTION => Ok(Action::SignTransaction),
        other => Err(DecodeError::MalformedAction(other)),
    }
}

pub fn decode(bytes: &[u8]) -> Result<EthereumSigningRequest, DecodeError> {
    let action_byte = *bytes
        .get(ACTION_OFFSET)
        .ok_or(DecodeError::TruncatedPayload {
            expected: DATA_OFFSET,
            actual: bytes.len(),
        })?;
    let action = action_from_byte(action_byte)?;

    if bytes.len() < DATA_OFFSET {
        return Err(DecodeError::TruncatedPayload {
            expected: DATA_OFFSET,
            actual: bytes.len(),
        });
    }

    Ok(EthereumSigningRequest {
        action,
        account: hex_with_prefix(&bytes[ADDRESS_OFFSET..DATA_OFFSET]),
        payload: bytes[DATA_OFFSET..].to_vec(),
    })
}
