//! Network connection boundary.
//!
//! `ChainReader` is the one seam the resolver talks through: reported chain
//! id, deployed bytecode, and a batched multi-field read. The HTTP
//! implementation wraps an alloy provider with per-call timeouts, a TTL'd
//! bytecode cache, and multicall3 batching where the chain has a deployment.

use crate::config::chains::ChainConfig;
use crate::error::{DecodeError, Result, RpcError};
use alloy::primitives::{Address, Bytes};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::sol_types::SolCall;
use alloy::transports::http::Http;
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use std::future::IntoFuture;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const RPC_CALL_TIMEOUT_MS: u64 = 1_500;
const CODE_CACHE_TTL_MS: u64 = 10 * 60 * 1_000;
const CODE_CACHE_MAX_ENTRIES: usize = 4_096;

alloy::sol! {
    struct Multicall3Call {
        address target;
        bool allowFailure;
        bytes callData;
    }

    struct Multicall3Result {
        bool success;
        bytes returnData;
    }

    function aggregate3(Multicall3Call[] calldata calls)
        external
        payable
        returns (Multicall3Result[] memory returnData);
}

/// One call in a batched read.
#[derive(Debug, Clone)]
pub struct BatchCall {
    pub target: Address,
    pub calldata: Bytes,
}

/// Raw outcome of one batched call. `success: false` means the target
/// reverted; transport failures never reach this type.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub success: bool,
    pub data: Bytes,
}

#[async_trait]
pub trait ChainReader: Send + Sync {
    /// The network identifier the connection is actually attached to.
    async fn chain_id(&self) -> Result<u64>;

    /// Deployed bytecode at `address`. Empty bytes is a valid result for an
    /// address with no code.
    async fn code_at(&self, address: Address) -> Result<Bytes>;

    /// Execute every call in one round trip where the chain allows it.
    /// Outcomes are returned in call order, one per call.
    async fn batch_call(&self, calls: &[BatchCall]) -> Result<Vec<BatchOutcome>>;
}

pub type HttpProvider = alloy::providers::RootProvider<Http<Client>>;

pub struct HttpChainReader<P> {
    provider: P,
    multicall3: Option<Address>,
    code_cache: DashMap<Address, (Bytes, u64)>,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn rpc_call_timeout_ms() -> u64 {
    std::env::var("RPC_CALL_TIMEOUT_MS")
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|v| (250..=20_000).contains(v))
        .unwrap_or(RPC_CALL_TIMEOUT_MS)
}

fn is_revert_error(message: &str) -> bool {
    let msg = message.to_ascii_lowercase();
    msg.contains("execution reverted") || msg.contains("revert")
}

async fn timed<T>(
    context: &'static str,
    fut: impl IntoFuture<Output = alloy::transports::TransportResult<T>>,
) -> Result<T> {
    let waited_ms = rpc_call_timeout_ms();
    match tokio::time::timeout(Duration::from_millis(waited_ms), fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(RpcError::Transport(format!("{context}: {err}")).into()),
        Err(_) => Err(RpcError::Timeout {
            waited_ms,
            context: context.to_string(),
        }
        .into()),
    }
}

impl<P> HttpChainReader<P> {
    pub fn new(provider: P, chain_id: u64) -> Self {
        Self {
            provider,
            multicall3: ChainConfig::get(chain_id).multicall3,
            code_cache: DashMap::new(),
        }
    }

    fn cached_code(&self, address: Address) -> Option<Bytes> {
        let entry = self.code_cache.get(&address)?;
        let (code, stored_ms) = entry.value();
        if now_ms().saturating_sub(*stored_ms) > CODE_CACHE_TTL_MS {
            return None;
        }
        Some(code.clone())
    }

    fn store_code(&self, address: Address, code: Bytes) {
        if self.code_cache.len() >= CODE_CACHE_MAX_ENTRIES {
            let cutoff = now_ms();
            self.code_cache
                .retain(|_, (_, stored_ms)| cutoff.saturating_sub(*stored_ms) <= CODE_CACHE_TTL_MS);
        }
        self.code_cache.insert(address, (code, now_ms()));
    }
}

#[async_trait]
impl<P> ChainReader for HttpChainReader<P>
where
    P: Provider<Http<Client>> + Send + Sync,
{
    async fn chain_id(&self) -> Result<u64> {
        timed("eth_chainId", self.provider.get_chain_id()).await
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        if let Some(code) = self.cached_code(address) {
            return Ok(code);
        }
        let code = timed("eth_getCode", self.provider.get_code_at(address)).await?;
        self.store_code(address, code.clone());
        Ok(code)
    }

    async fn batch_call(&self, calls: &[BatchCall]) -> Result<Vec<BatchOutcome>> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }
        match self.multicall3 {
            Some(multicall) => self.batch_via_multicall(multicall, calls).await,
            None => self.batch_sequential(calls).await,
        }
    }
}

impl<P> HttpChainReader<P>
where
    P: Provider<Http<Client>> + Send + Sync,
{
    async fn batch_via_multicall(
        &self,
        multicall: Address,
        calls: &[BatchCall],
    ) -> Result<Vec<BatchOutcome>> {
        let aggregated = calls
            .iter()
            .map(|call| Multicall3Call {
                target: call.target,
                allowFailure: true,
                callData: call.calldata.clone(),
            })
            .collect::<Vec<_>>();
        let req = TransactionRequest::default().to(multicall).input(
            TransactionInput::new(aggregate3Call { calls: aggregated }.abi_encode().into()),
        );
        let raw = timed("multicall3 aggregate3", self.provider.call(&req)).await?;

        let decoded = <aggregate3Call as SolCall>::abi_decode_returns(raw.as_ref(), true)
            .map_err(|e| DecodeError::Payload(e.to_string()))?;
        if decoded.returnData.len() != calls.len() {
            return Err(DecodeError::ResultCount {
                expected: calls.len(),
                got: decoded.returnData.len(),
            }
            .into());
        }
        Ok(decoded
            .returnData
            .into_iter()
            .map(|result| BatchOutcome {
                success: result.success,
                data: result.returnData,
            })
            .collect())
    }

    /// Per-call fallback for chains without a multicall3 deployment. A revert
    /// maps to an unsuccessful outcome; anything else is a transport failure.
    async fn batch_sequential(&self, calls: &[BatchCall]) -> Result<Vec<BatchOutcome>> {
        let mut outcomes = Vec::with_capacity(calls.len());
        for call in calls {
            let req = TransactionRequest::default()
                .to(call.target)
                .input(TransactionInput::new(call.calldata.clone()));
            match timed("eth_call", self.provider.call(&req)).await {
                Ok(data) => outcomes.push(BatchOutcome {
                    success: true,
                    data,
                }),
                Err(crate::error::PoolError::Net(RpcError::Transport(msg)))
                    if is_revert_error(&msg) =>
                {
                    outcomes.push(BatchOutcome {
                        success: false,
                        data: Bytes::new(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_detection_matches_common_rpc_messages() {
        assert!(is_revert_error("execution reverted: PrizePool/unknown"));
        assert!(is_revert_error("server returned an error: Revert"));
        assert!(!is_revert_error("connection refused"));
        assert!(!is_revert_error("429 too many requests"));
    }

    #[test]
    fn aggregate3_roundtrip_encodes_call_count() {
        let calls = vec![
            Multicall3Call {
                target: Address::ZERO,
                allowFailure: true,
                callData: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
            },
            Multicall3Call {
                target: Address::repeat_byte(0x11),
                allowFailure: true,
                callData: Bytes::new(),
            },
        ];
        let encoded = aggregate3Call { calls }.abi_encode();
        let decoded = <aggregate3Call as SolCall>::abi_decode(&encoded, true).expect("decode");
        assert_eq!(decoded.calls.len(), 2);
        assert_eq!(decoded.calls[1].target, Address::repeat_byte(0x11));
    }
}
