use serde::Serialize;

use crate::address::{AddressEncoder, Ss58Encoder};
use crate::assembler::{assemble, Assembly, PartialFrame};
use crate::error::DecodeError;
use crate::frame;
use crate::hashing::{Blake2Hasher, PayloadHasher};
use crate::network::NetworkRegistry;
use crate::payload::{dispatch, ParsedPayload};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DecodeOutcome {
    /// One frame of a multi-frame payload; collect the rest and decode the
    /// reassembled bytes with `multipart_complete` set.
    Partial(PartialFrame),
    Parsed(ParsedPayload),
}

/// Scan → signing request pipeline.
///
/// Holds only read-only collaborators; every call is independent.
#[derive(Clone, Debug)]
pub struct Decoder<H = Blake2Hasher, A = Ss58Encoder> {
    networks: NetworkRegistry,
    hasher: H,
    encoder: A,
}

impl Decoder {
    pub fn new(networks: NetworkRegistry) -> Self {
        Self::with_collaborators(networks, Blake2Hasher, Ss58Encoder)
    }
}

impl<H, A> Decoder<H, A>
where
    H: PayloadHasher,
    A: AddressEncoder,
{
    pub fn with_collaborators(networks: NetworkRegistry, hasher: H, encoder: A) -> Self {
        Self {
            networks,
            hasher,
            encoder,
        }
    }

    pub fn networks(&self) -> &NetworkRegistry {
        &self.networks
    }

    /// Decodes one raw scan.
    pub async fn decode_scan(
        &self,
        raw: &str,
        multipart_complete: bool,
    ) -> Result<DecodeOutcome, DecodeError> {
        let bytes = frame::strip(raw).ok_or(DecodeError::UnparseableScan)?;
        self.decode_bytes(&bytes, multipart_complete).await
    }

    /// Decodes stripped bytes, frame header included.
    pub async fn decode_bytes(
        &self,
        bytes: &[u8],
        multipart_complete: bool,
    ) -> Result<DecodeOutcome, DecodeError> {
        match assemble(bytes, multipart_complete)? {
            Assembly::Partial(partial) => Ok(DecodeOutcome::Partial(partial)),
            Assembly::Complete(body) => {
                let parsed = dispatch(&body, &self.networks, &self.hasher, &self.encoder).await?;
                Ok(DecodeOutcome::Parsed(parsed))
            }
        }
    }
}
