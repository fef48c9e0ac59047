//! Reactive re-resolution.
//!
//! The resolver pass re-runs whenever any of its inputs (connection
//! readiness, chain id, pool address) changes. Passes are stamped with a
//! monotonically increasing token; only the latest pass may publish, so a
//! slow superseded pass can never overwrite a newer result.

use crate::reader::ChainReader;
use crate::resolver::{Resolution, VersionResolver};
use alloy::primitives::Address;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverInputs {
    pub ready: bool,
    pub chain_id: u64,
    pub prize_pool: Address,
}

impl ResolverInputs {
    /// Initial state before a connection is available. Triggers no pass.
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            chain_id: 0,
            prize_pool: Address::ZERO,
        }
    }

    pub fn ready(chain_id: u64, prize_pool: Address) -> Self {
        Self {
            ready: true,
            chain_id,
            prize_pool,
        }
    }
}

/// The single published slot consumers read. `pass` is the token of the
/// resolution that produced it; pass 0 is the pristine empty state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedState {
    pub pass: u64,
    pub resolution: Resolution,
}

pub struct VersionWatcher {
    state: watch::Receiver<PublishedState>,
    handle: JoinHandle<()>,
}

impl VersionWatcher {
    /// Spawn the watch loop. Every change on `inputs` (including the initial
    /// value, when ready) starts a pass; failed passes publish nothing and
    /// the previous state stays visible until the next trigger.
    pub fn spawn(
        resolver: Arc<VersionResolver>,
        reader: Arc<dyn ChainReader>,
        mut inputs: watch::Receiver<ResolverInputs>,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(PublishedState::default());
        let state_tx = Arc::new(state_tx);
        let latest_pass = Arc::new(AtomicU64::new(0));

        let handle = tokio::spawn(async move {
            loop {
                let snapshot = *inputs.borrow_and_update();
                if snapshot.ready {
                    let pass = latest_pass.fetch_add(1, Ordering::SeqCst) + 1;
                    run_pass(
                        Arc::clone(&resolver),
                        Arc::clone(&reader),
                        Arc::clone(&latest_pass),
                        Arc::clone(&state_tx),
                        snapshot,
                        pass,
                    );
                }
                if inputs.changed().await.is_err() {
                    break;
                }
            }
        });

        Self {
            state: state_rx,
            handle,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PublishedState> {
        self.state.clone()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

fn run_pass(
    resolver: Arc<VersionResolver>,
    reader: Arc<dyn ChainReader>,
    latest_pass: Arc<AtomicU64>,
    state_tx: Arc<watch::Sender<PublishedState>>,
    snapshot: ResolverInputs,
    pass: u64,
) {
    tokio::spawn(async move {
        match resolver
            .resolve(reader.as_ref(), snapshot.chain_id, snapshot.prize_pool)
            .await
        {
            Ok(resolution) => {
                let published = state_tx.send_if_modified(|state| {
                    // Both guards run under the sender lock: the token check
                    // drops passes that were superseded while resolving, the
                    // slot check drops out-of-order stragglers.
                    if latest_pass.load(Ordering::SeqCst) != pass || state.pass > pass {
                        return false;
                    }
                    *state = PublishedState { pass, resolution };
                    true
                });
                if !published {
                    tracing::debug!("[WATCH] pass {pass} superseded; result discarded");
                }
            }
            Err(err) => {
                tracing::warn!("[WATCH] pass {pass} failed, keeping previous state: {err}");
            }
        }
    });
}
