//! Static registry of known contract builds.
//!
//! Deployed bytecode is used purely as a version fingerprint: we hash it with
//! keccak-256 and look the digest up in a per-network table shipped with the
//! crate. Absence is an expected outcome (new deployments land before the
//! registry is updated), never an error. A fingerprint registered under one
//! network never matches under another.

use crate::error::{ConfigError, PoolError, Result};
use alloy::primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

const KNOWN_VERSIONS_JSON: &str = include_str!("../data/known_versions.json");

/// Contract builds the registry can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    CompoundPrizePool,
    StakePrizePool,
    YieldSourcePrizePool,
    SingleRandomWinner,
    MultipleWinners,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractKind::CompoundPrizePool => "CompoundPrizePool",
            ContractKind::StakePrizePool => "StakePrizePool",
            ContractKind::YieldSourcePrizePool => "YieldSourcePrizePool",
            ContractKind::SingleRandomWinner => "SingleRandomWinner",
            ContractKind::MultipleWinners => "MultipleWinners",
        };
        f.write_str(name)
    }
}

/// One known build: which contract it is and the release it shipped in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub contract: ContractKind,
    pub version: String,
}

impl VersionRecord {
    pub fn new(contract: ContractKind, version: impl Into<String>) -> Self {
        Self {
            contract,
            version: version.into(),
        }
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.contract, self.version)
    }
}

/// keccak-256 fingerprint of a deployed bytecode blob.
pub fn code_fingerprint(code: &[u8]) -> B256 {
    keccak256(code)
}

#[derive(Debug, Default, Clone)]
pub struct Registry {
    by_network: HashMap<u64, HashMap<B256, VersionRecord>>,
}

impl Registry {
    /// Parse a registry from the JSON shape shipped in `data/known_versions.json`:
    /// `{ "<chain id>": { "<0x fingerprint>": { contract, version } } }`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, HashMap<String, VersionRecord>> = serde_json::from_str(raw)
            .map_err(|e| {
                PoolError::Config(ConfigError::InvalidConfig(format!(
                    "version registry JSON: {e}"
                )))
            })?;

        let mut by_network = HashMap::with_capacity(parsed.len());
        for (chain_key, entries) in parsed {
            let chain_id: u64 = chain_key.parse().map_err(|_| {
                ConfigError::InvalidConfig(format!(
                    "version registry: chain key `{chain_key}` is not a chain id"
                ))
            })?;
            let mut table = HashMap::with_capacity(entries.len());
            for (hash_key, record) in entries {
                let fingerprint: B256 = hash_key.parse().map_err(|_| {
                    ConfigError::InvalidConfig(format!(
                        "version registry: `{hash_key}` is not a 32-byte fingerprint"
                    ))
                })?;
                table.insert(fingerprint, record);
            }
            by_network.insert(chain_id, table);
        }
        Ok(Self { by_network })
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (u64, B256, VersionRecord)>) -> Self {
        let mut by_network: HashMap<u64, HashMap<B256, VersionRecord>> = HashMap::new();
        for (chain_id, fingerprint, record) in entries {
            by_network
                .entry(chain_id)
                .or_default()
                .insert(fingerprint, record);
        }
        Self { by_network }
    }

    /// The registry compiled into the crate. Parsed once; a malformed bundle
    /// degrades to an empty registry (everything resolves to fallbacks) rather
    /// than aborting the host.
    pub fn bundled() -> &'static Registry {
        static BUNDLED: OnceLock<Registry> = OnceLock::new();
        BUNDLED.get_or_init(|| match Registry::from_json(KNOWN_VERSIONS_JSON) {
            Ok(registry) => registry,
            Err(err) => {
                tracing::error!("[REGISTRY] bundled version data failed to parse: {err}");
                Registry::default()
            }
        })
    }

    /// Pure lookup; never crosses networks.
    pub fn lookup(&self, chain_id: u64, fingerprint: B256) -> Option<&VersionRecord> {
        self.by_network.get(&chain_id)?.get(&fingerprint)
    }

    /// Fingerprint `code` and look it up for `chain_id`.
    pub fn lookup_code(&self, chain_id: u64, code: &[u8]) -> Option<&VersionRecord> {
        self.lookup(chain_id, code_fingerprint(code))
    }

    pub fn network_entry_count(&self, chain_id: u64) -> usize {
        self.by_network.get(&chain_id).map_or(0, HashMap::len)
    }
}
