#![allow(dead_code)]

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use poolcheck::error::{Result, RpcError};
use poolcheck::reader::{BatchCall, BatchOutcome, ChainReader};
use std::collections::HashMap;
use std::time::Duration;

/// In-memory chain double: deployed code per address, a pool → strategy
/// wiring for the `prizeStrategy()` getter, and optional per-address latency
/// so tests can stage slow passes.
pub struct MockChain {
    reported_chain_id: u64,
    code: HashMap<Address, Bytes>,
    strategy_of: HashMap<Address, Address>,
    code_delay_ms: HashMap<Address, u64>,
    forced_batch_outcome: Option<(bool, Bytes)>,
    transport_down: bool,
}

impl MockChain {
    pub fn new(reported_chain_id: u64) -> Self {
        Self {
            reported_chain_id,
            code: HashMap::new(),
            strategy_of: HashMap::new(),
            code_delay_ms: HashMap::new(),
            forced_batch_outcome: None,
            transport_down: false,
        }
    }

    pub fn with_code(mut self, address: Address, code: &[u8]) -> Self {
        self.code.insert(address, Bytes::copy_from_slice(code));
        self
    }

    pub fn with_strategy(mut self, pool: Address, strategy: Address) -> Self {
        self.strategy_of.insert(pool, strategy);
        self
    }

    pub fn with_code_delay_ms(mut self, address: Address, delay_ms: u64) -> Self {
        self.code_delay_ms.insert(address, delay_ms);
        self
    }

    /// Force every batched call to return this outcome, shape checks be damned.
    pub fn with_forced_batch_outcome(mut self, success: bool, data: &[u8]) -> Self {
        self.forced_batch_outcome = Some((success, Bytes::copy_from_slice(data)));
        self
    }

    pub fn with_transport_down(mut self) -> Self {
        self.transport_down = true;
        self
    }

    fn check_transport(&self) -> Result<()> {
        if self.transport_down {
            return Err(RpcError::Transport("connection refused".to_string()).into());
        }
        Ok(())
    }
}

pub fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..32].copy_from_slice(address.as_slice());
    word
}

#[async_trait]
impl ChainReader for MockChain {
    async fn chain_id(&self) -> Result<u64> {
        self.check_transport()?;
        Ok(self.reported_chain_id)
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        if let Some(delay_ms) = self.code_delay_ms.get(&address) {
            tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
        }
        self.check_transport()?;
        Ok(self.code.get(&address).cloned().unwrap_or_default())
    }

    async fn batch_call(&self, calls: &[BatchCall]) -> Result<Vec<BatchOutcome>> {
        self.check_transport()?;
        if let Some((success, data)) = &self.forced_batch_outcome {
            return Ok(calls
                .iter()
                .map(|_| BatchOutcome {
                    success: *success,
                    data: data.clone(),
                })
                .collect());
        }
        Ok(calls
            .iter()
            .map(|call| match self.strategy_of.get(&call.target) {
                Some(strategy) => BatchOutcome {
                    success: true,
                    data: Bytes::copy_from_slice(&address_word(*strategy)),
                },
                None => BatchOutcome {
                    success: false,
                    data: Bytes::new(),
                },
            })
            .collect())
    }
}
