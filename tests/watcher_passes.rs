mod support;

use alloy::primitives::Address;
use poolcheck::reader::ChainReader;
use poolcheck::registry::{code_fingerprint, ContractKind, Registry, VersionRecord};
use poolcheck::resolver::VersionResolver;
use poolcheck::watcher::{ResolverInputs, VersionWatcher};
use std::sync::Arc;
use std::time::Duration;
use support::MockChain;
use tokio::sync::watch;

const SLOW_POOL: Address = Address::repeat_byte(0x0a);
const FAST_POOL: Address = Address::repeat_byte(0x0b);
const STRATEGY: Address = Address::repeat_byte(0x0c);
const SLOW_CODE: &[u8] = b"slow pool build";
const FAST_CODE: &[u8] = b"fast pool build";
const STRATEGY_CODE: &[u8] = b"strategy build";

fn test_registry() -> Registry {
    Registry::from_entries([
        (
            1u64,
            code_fingerprint(SLOW_CODE),
            VersionRecord::new(ContractKind::StakePrizePool, "3.2.0"),
        ),
        (
            1u64,
            code_fingerprint(FAST_CODE),
            VersionRecord::new(ContractKind::CompoundPrizePool, "3.4.3"),
        ),
        (
            1u64,
            code_fingerprint(STRATEGY_CODE),
            VersionRecord::new(ContractKind::MultipleWinners, "3.2.0"),
        ),
    ])
}

fn wired_chain() -> MockChain {
    MockChain::new(1)
        .with_code(SLOW_POOL, SLOW_CODE)
        .with_code(FAST_POOL, FAST_CODE)
        .with_code(STRATEGY, STRATEGY_CODE)
        .with_strategy(SLOW_POOL, STRATEGY)
        .with_strategy(FAST_POOL, STRATEGY)
}

#[tokio::test]
async fn superseded_slow_pass_never_overwrites_the_newer_result() {
    let reader: Arc<dyn ChainReader> =
        Arc::new(wired_chain().with_code_delay_ms(SLOW_POOL, 300));
    let resolver = Arc::new(VersionResolver::new(test_registry()));
    let (input_tx, input_rx) = watch::channel(ResolverInputs::not_ready());
    let watcher = VersionWatcher::spawn(resolver, reader, input_rx);
    let mut state = watcher.subscribe();

    // Not-ready inputs trigger no pass.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(state.borrow().pass, 0);

    input_tx
        .send(ResolverInputs::ready(1, SLOW_POOL))
        .expect("watcher alive");
    tokio::time::sleep(Duration::from_millis(30)).await;
    input_tx
        .send(ResolverInputs::ready(1, FAST_POOL))
        .expect("watcher alive");

    tokio::time::timeout(
        Duration::from_secs(2),
        state.wait_for(|published| published.pass == 2),
    )
    .await
    .expect("second pass publishes")
    .expect("watcher alive");

    let published = state.borrow().clone();
    let versions = published
        .resolution
        .versions
        .clone()
        .expect("fast pool resolved");
    assert_eq!(
        versions.prize_pool,
        VersionRecord::new(ContractKind::CompoundPrizePool, "3.4.3")
    );

    // Let the superseded slow pass finish; its result must be discarded.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(*state.borrow(), published);

    watcher.abort();
}

#[tokio::test]
async fn failed_pass_keeps_the_previous_published_state() {
    let reader: Arc<dyn ChainReader> = Arc::new(wired_chain());
    let resolver = Arc::new(VersionResolver::new(test_registry()));
    let (input_tx, input_rx) = watch::channel(ResolverInputs::ready(1, FAST_POOL));
    let watcher = VersionWatcher::spawn(resolver, reader, input_rx);
    let mut state = watcher.subscribe();

    tokio::time::timeout(
        Duration::from_secs(2),
        state.wait_for(|published| published.pass == 1),
    )
    .await
    .expect("initial pass publishes")
    .expect("watcher alive");
    let first = state.borrow().clone();
    assert!(first.resolution.versions.is_some());

    // A pool with no strategy wiring makes the batched read revert, so the
    // pass errors out and publishes nothing.
    input_tx
        .send(ResolverInputs::ready(1, Address::repeat_byte(0xee)))
        .expect("watcher alive");
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*state.borrow(), first);

    watcher.abort();
}
