//--------------------------------------------------------------------------------------------------
// TEST MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Integration tests exercising the engine through its async, single-writer
// front end (`EngineHandle`) rather than `MatchingEngine` directly, the way
// a caller outside the crate actually uses it. `src/engine.rs` already
// covers the matching algorithm's edge cases synchronously; these tests
// cover the concurrency discipline and the query surface built on top of it.
//--------------------------------------------------------------------------------------------------

use rust_decimal_macros::dec;

use lob_engine::{EngineHandle, Price, Side};

fn price(v: rust_decimal::Decimal) -> Price {
    Price::new(v)
}

#[tokio::test]
async fn concurrent_callers_observe_a_consistent_total_volume() {
    let engine = EngineHandle::spawn(200);

    let mut handles = Vec::new();
    for i in 0..20u64 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.place(format!("client-{i}"), Side::Buy, price(dec!(100.00)), 5).await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(engine.volume_at(price(dec!(100.00)), Side::Buy).await.unwrap(), 100);
    let snapshot = engine.snapshot(1).await.unwrap();
    assert_eq!(snapshot.bids, vec![(price(dec!(100.00)), 100)]);
}

#[tokio::test]
async fn resting_order_reflects_partial_fill_and_disappears_once_filled() {
    let engine = EngineHandle::spawn(200);

    let (resting_id, _) =
        engine.place("maker".into(), Side::Buy, price(dec!(100.00)), 10).await.unwrap();
    assert_eq!(
        engine.resting_order(resting_id).await.unwrap(),
        Some((Side::Buy, price(dec!(100.00)), 10))
    );

    engine.place("taker".into(), Side::Sell, price(dec!(99.00)), 4).await.unwrap();
    assert_eq!(
        engine.resting_order(resting_id).await.unwrap(),
        Some((Side::Buy, price(dec!(100.00)), 6))
    );

    engine.place("taker2".into(), Side::Sell, price(dec!(99.00)), 6).await.unwrap();
    assert_eq!(engine.resting_order(resting_id).await.unwrap(), None);
}

#[tokio::test]
async fn cancelling_an_unknown_order_reports_failure_without_side_effects() {
    let engine = EngineHandle::spawn(200);
    engine.place("A".into(), Side::Buy, price(dec!(100.00)), 10).await.unwrap();

    assert!(!engine.cancel(9999).await.unwrap());
    assert_eq!(engine.volume_at(price(dec!(100.00)), Side::Buy).await.unwrap(), 10);
}

#[tokio::test]
async fn price_history_carries_the_running_mid_after_trades() {
    let engine = EngineHandle::spawn(200);

    engine.place("A".into(), Side::Buy, price(dec!(100.00)), 10).await.unwrap();
    engine.place("B".into(), Side::Sell, price(dec!(102.00)), 10).await.unwrap();

    let history = engine.price_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].price, price(dec!(101.00)));
}

#[tokio::test]
async fn trades_endpoint_query_returns_most_recent_first_cap() {
    let engine = EngineHandle::spawn(200);
    engine.place("maker".into(), Side::Buy, price(dec!(100.00)), 30).await.unwrap();

    for i in 0..5u64 {
        engine.place(format!("taker-{i}"), Side::Sell, price(dec!(99.00)), 2).await.unwrap();
    }

    let trades = engine.trades(2).await.unwrap();
    assert_eq!(trades.len(), 2);
    assert!(trades[0].timestamp <= trades[1].timestamp);
}
