//! Contract-version reconciliation.
//!
//! One resolution pass fingerprints the prize pool and its linked prize
//! strategy against the registry. An unrecognized build never hard-fails the
//! pipeline: it substitutes a pinned recent build and records an advisory for
//! the presentation layer. A connection whose reported chain id disagrees
//! with the requested one aborts the pass silently; the caller re-runs once
//! the inputs settle.

use crate::config::chains;
use crate::error::{DecodeError, Result};
use crate::fields::{prize_strategy_field, read_fields, FieldValue};
use crate::reader::ChainReader;
use crate::registry::{code_fingerprint, ContractKind, Registry, VersionRecord};
use alloy::primitives::Address;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractVersions {
    pub prize_pool: VersionRecord,
    pub prize_strategy: VersionRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryReason {
    UnrecognizedBytecode,
}

impl fmt::Display for AdvisoryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvisoryReason::UnrecognizedBytecode => f.write_str("unrecognized-bytecode"),
        }
    }
}

/// Non-blocking warning: a deployment we could not match. Recovered locally
/// via fallback substitution, never raised as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub chain_id: u64,
    pub address: Address,
    pub reason: AdvisoryReason,
}

/// Result of one pass. `versions: None` only on a chain-id mismatch; when
/// populated, both records are present (possibly fallbacks).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub versions: Option<ContractVersions>,
    pub advisory: Option<Advisory>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.versions.is_none()
    }
}

/// Pinned builds assumed for deployments the registry does not know. Kept on
/// the most recent widely-deployed release so downstream logic always has a
/// usable record.
fn fallback_prize_pool() -> VersionRecord {
    VersionRecord::new(ContractKind::StakePrizePool, "3.2.0")
}

fn fallback_prize_strategy() -> VersionRecord {
    VersionRecord::new(ContractKind::MultipleWinners, "3.2.0")
}

/// A later advisory replaces an earlier one within the same pass. Exempt
/// networks emit none at all.
fn note_advisory(slot: &mut Option<Advisory>, chain_id: u64, address: Address) {
    if chains::version_check_exempt(chain_id) {
        return;
    }
    tracing::warn!(
        "[VERSIONS] unrecognized bytecode at {address} on {} (chain {chain_id}); assuming fallback build",
        chains::chain_name(chain_id),
    );
    *slot = Some(Advisory {
        chain_id,
        address,
        reason: AdvisoryReason::UnrecognizedBytecode,
    });
}

pub struct VersionResolver {
    registry: Registry,
}

impl VersionResolver {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Resolver over the registry compiled into the crate.
    pub fn bundled() -> Self {
        Self::new(Registry::bundled().clone())
    }

    /// One end-to-end pass for `prize_pool` on `chain_id`.
    ///
    /// Bytecode fetch and the chain-id probe are independent round trips and
    /// go out concurrently; the identity check happens after the join so a
    /// wallet/chain switch mid-flight yields an empty result instead of a
    /// record matched under the wrong network.
    pub async fn resolve(
        &self,
        reader: &dyn ChainReader,
        chain_id: u64,
        prize_pool: Address,
    ) -> Result<Resolution> {
        let (pool_code, reported_chain_id) =
            tokio::try_join!(reader.code_at(prize_pool), reader.chain_id())?;

        if reported_chain_id != chain_id {
            tracing::debug!(
                "[VERSIONS] connection reports chain {reported_chain_id}, expected {chain_id}; discarding pass"
            );
            return Ok(Resolution::default());
        }

        let mut advisory = None;

        let prize_pool_record = match self
            .registry
            .lookup(chain_id, code_fingerprint(&pool_code))
        {
            Some(record) => {
                tracing::debug!("[VERSIONS] prize pool {prize_pool} matched {record}");
                record.clone()
            }
            None => {
                note_advisory(&mut advisory, chain_id, prize_pool);
                fallback_prize_pool()
            }
        };

        let fields = read_fields(reader, &[prize_strategy_field(prize_pool)]).await?;
        let prize_strategy = fields
            .get("prizeStrategy")
            .and_then(FieldValue::as_address)
            .ok_or_else(|| DecodeError::FieldShape {
                field: "prizeStrategy".to_string(),
                reason: "missing from batch result".to_string(),
            })?;

        let strategy_code = reader.code_at(prize_strategy).await?;
        let prize_strategy_record = match self
            .registry
            .lookup(chain_id, code_fingerprint(&strategy_code))
        {
            Some(record) => {
                tracing::debug!("[VERSIONS] prize strategy {prize_strategy} matched {record}");
                record.clone()
            }
            None => {
                note_advisory(&mut advisory, chain_id, prize_strategy);
                fallback_prize_strategy()
            }
        };

        Ok(Resolution {
            versions: Some(ContractVersions {
                prize_pool: prize_pool_record,
                prize_strategy: prize_strategy_record,
            }),
            advisory,
        })
    }
}
