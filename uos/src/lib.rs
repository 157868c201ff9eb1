pub mod address;
pub mod assembler;
pub mod compact;
pub mod convert;
pub mod decoder;
pub mod error;
pub mod ethereum;
pub mod frame;
pub mod hashing;
pub mod network;
pub mod payload;
pub mod substrate;

pub use address::{AddressEncoder, AddressError, Ss58Encoder};
pub use assembler::{Assembly, FrameHeader, MultipartCollector, PartialFrame};
pub use decoder::{DecodeOutcome, Decoder};
pub use error::{DecodeError, FrameError, SubstrateError};
pub use ethereum::EthereumSigningRequest;
pub use hashing::{Blake2Hasher, HashError, PayloadHasher};
pub use network::{NetworkError, NetworkParams, NetworkRegistry};
pub use payload::{Action, ParsedPayload, PayloadKind};
pub use substrate::{Command, CryptoScheme, SubstrateSigningRequest};
