//! Address-format parameters keyed by chain genesis hash.
//!
//! The registry is loaded once (from JSON or the built-in defaults) and only
//! read while decoding.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const GENESIS_HASH_HEX_LEN: usize = 64;

const POLKADOT_GENESIS: &str = "0x91b171bb158e2d3848fa23a9f1c25182fb8e20313b2c1eb49219da7a70ce90c3";
const KUSAMA_GENESIS: &str = "0xb0a8d493285c2df73290dfb7e61f870f17b41801197a149ca93654499ea3dafe";
const WESTEND_GENESIS: &str = "0xe143f23803ac50e8f6f8e62695d1ce9e4e1d68aa36c1cd2cfd15340213f3423e";

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("invalid genesis hash {0:?}")]
    InvalidGenesisHash(String),

    #[error("failed to read network table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse network table: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub address_prefix: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NetworkParams {
    pub fn new(address_prefix: u16) -> Self {
        Self {
            address_prefix,
            name: None,
        }
    }

    pub fn named(address_prefix: u16, name: impl Into<String>) -> Self {
        Self {
            address_prefix,
            name: Some(name.into()),
        }
    }
}

/// Genesis hash → network parameters. Keys are stored as lower-case,
/// `0x`-prefixed hex regardless of how they were supplied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HashMap<String, NetworkParams>")]
pub struct NetworkRegistry {
    networks: HashMap<String, NetworkParams>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Polkadot, Kusama and Westend.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (genesis, params) in [
            (POLKADOT_GENESIS, NetworkParams::named(0, "polkadot")),
            (KUSAMA_GENESIS, NetworkParams::named(2, "kusama")),
            (WESTEND_GENESIS, NetworkParams::named(42, "westend")),
        ] {
            registry.networks.insert(genesis.to_string(), params);
        }
        registry
    }

    pub fn from_json_str(json: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn insert(
        &mut self,
        genesis_hash: &str,
        params: NetworkParams,
    ) -> Result<Option<NetworkParams>, NetworkError> {
        let key = normalize_genesis_hash(genesis_hash)?;
        Ok(self.networks.insert(key, params))
    }

    pub fn get(&self, genesis_hash: &str) -> Option<&NetworkParams> {
        let key = normalize_genesis_hash(genesis_hash).ok()?;
        self.networks.get(&key)
    }

    pub fn contains(&self, genesis_hash: &str) -> bool {
        self.get(genesis_hash).is_some()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl TryFrom<HashMap<String, NetworkParams>> for NetworkRegistry {
    type Error = NetworkError;

    fn try_from(raw: HashMap<String, NetworkParams>) -> Result<Self, Self::Error> {
        let networks = raw
            .into_iter()
            .map(|(genesis, params)| Ok((normalize_genesis_hash(&genesis)?, params)))
            .collect::<Result<_, NetworkError>>()?;
        Ok(Self { networks })
    }
}

fn normalize_genesis_hash(genesis_hash: &str) -> Result<String, NetworkError> {
    let trimmed = genesis_hash.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != GENESIS_HASH_HEX_LEN || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(NetworkError::InvalidGenesisHash(genesis_hash.to_string()));
    }
    Ok(format!("0x{}", digits.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_relay_chains() {
        let registry = NetworkRegistry::with_defaults();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(POLKADOT_GENESIS).unwrap().address_prefix, 0);
        assert_eq!(registry.get(KUSAMA_GENESIS).unwrap().address_prefix, 2);
        assert_eq!(registry.get(WESTEND_GENESIS).unwrap().address_prefix, 42);
    }

    #[test]
    fn lookup_ignores_prefix_and_case() {
        let registry = NetworkRegistry::with_defaults();
        let bare = KUSAMA_GENESIS.trim_start_matches("0x").to_ascii_uppercase();
        assert!(registry.contains(&bare));
        assert!(!registry.contains("0x1234"));
    }

    #[test]
    fn json_keys_are_normalised() {
        let json = format!(
            r#"{{ "{}": {{ "address_prefix": 7, "name": "edgeware" }} }}"#,
            "AB".repeat(32)
        );
        let registry = NetworkRegistry::from_json_str(&json).unwrap();
        let params = registry.get(&format!("0x{}", "ab".repeat(32))).unwrap();
        assert_eq!(params, &NetworkParams::named(7, "edgeware"));
    }

    #[test]
    fn json_rejects_bad_genesis_hash() {
        let json = r#"{ "0xnothex": { "address_prefix": 7 } }"#;
        assert!(matches!(
            NetworkRegistry::from_json_str(json),
            Err(NetworkError::Json(_))
        ));
    }

    #[test]
    fn insert_validates_key() {
        let mut registry = NetworkRegistry::new();
        assert!(registry.insert("0x12", NetworkParams::new(1)).is_err());
        let previous = registry
            .insert(&"cd".repeat(32), NetworkParams::new(1))
            .unwrap();
        assert!(previous.is_none());
        assert_eq!(registry.get(&"CD".repeat(32)).unwrap().address_prefix, 1);
    }
}
