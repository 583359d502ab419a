//! Engine Integration Test
//!
//! Walks the full order lifecycle on a simulated clock:
//! 1. Create an index and supply liquidity constraints
//! 2. Submit buys through admission (rate limit, minimum notional)
//! 3. Drain the queue into fills and partial fills
//! 4. Cancel a partially filled order and realize the loss
//! 5. Rebalance and confirm NAV moves composition, not value

use std::collections::HashMap;
use std::sync::Arc;

use basketsim_clock::SimClock;
use basketsim_core::{
    ConstraintMap, LiquidityConstraint, OrderStatus, Price, Symbol, WeightMap,
};
use basketsim_engine::{ChannelSink, EngineConfig, EngineEvent, ExecutionEngine};
use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn abc_assets() -> Vec<(Symbol, Decimal, Price, Price)> {
    vec![
        ("A".into(), dec!(1), dec!(10), dec!(10)),
        ("B".into(), dec!(2), dec!(5), dec!(5)),
        ("C".into(), dec!(5), dec!(2), dec!(2)),
    ]
}

#[test]
fn test_full_order_lifecycle() {
    let clock = Arc::new(SimClock::new(None));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut engine = ExecutionEngine::new(
        EngineConfig::default(),
        clock.clone(),
        Arc::new(ChannelSink::new(tx)),
    );

    // === Setup: index with a binding constraint on C ===
    engine.create_index("ETF-1", abc_assets()).unwrap();
    let mut constraints = ConstraintMap::new();
    constraints.insert(
        "A".into(),
        LiquidityConstraint::new(dec!(2000000), dec!(0.01)),
    );
    constraints.insert(
        "B".into(),
        LiquidityConstraint::new(dec!(1000000), dec!(0.02)),
    );
    constraints.insert(
        "C".into(),
        LiquidityConstraint::new(dec!(200000), dec!(0.05)),
    );
    engine
        .set_liquidity_constraints("ETF-1", constraints)
        .unwrap();

    assert_eq!(engine.get_index("ETF-1").unwrap().nav(), dec!(30));

    // === Submit and drain: C gates the basket at 20% ===
    let order = engine.submit_buy(1, "ETF-1", dec!(100000), dec!(30));
    assert_eq!(order.status, OrderStatus::Pending);

    let summary = engine.drain_queue();
    assert_eq!(summary.executed, 1);

    let report = engine.get_fill_report(1).unwrap();
    assert_eq!(report.fill_percentage, dec!(20));
    assert!(report.fill_percentage >= Decimal::ZERO && report.fill_percentage <= dec!(100));
    assert_eq!(
        engine.get_order(1).unwrap().status,
        OrderStatus::PartiallyFilled
    );

    // === Cancel the partial fill; loss on the filled portion ===
    let cancel = engine.cancel(1);
    assert!(cancel.success);
    // 20_000 filled x |30 - 30.030| slippage
    assert_eq!(cancel.loss, dec!(600));

    // Double cancel reports failure without state change
    let again = engine.cancel(1);
    assert!(!again.success);
    assert_eq!(
        engine.get_order(1).unwrap().status,
        OrderStatus::Cancelled
    );

    // === Rebalance: value preserved, composition moved ===
    let nav_before = engine.get_index("ETF-1").unwrap().nav();
    let mut weights = WeightMap::new();
    weights.insert("A".into(), dec!(0.4));
    weights.insert("B".into(), dec!(0.4));
    weights.insert("C".into(), dec!(0.2));
    let rebalance = engine.rebalance("ETF-1", &weights).unwrap();

    assert_eq!(engine.get_index("ETF-1").unwrap().nav(), nav_before);
    assert!(rebalance.total_cost > Decimal::ZERO);
    let old_total: Decimal = rebalance.old_weights.values().copied().sum();
    assert_eq!(old_total, dec!(1));

    // === Events arrived in lifecycle order ===
    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        kinds.push(match event {
            EngineEvent::OrderAccepted { .. } => "accepted",
            EngineEvent::OrderRejected { .. } => "rejected",
            EngineEvent::OrderExecuted { .. } => "executed",
            EngineEvent::OrderCancelled { .. } => "cancelled",
            EngineEvent::BatchDrained { .. } => "drained",
            EngineEvent::PricesUpdated { .. } => "prices",
            EngineEvent::Rebalanced { .. } => "rebalanced",
        });
    }
    assert_eq!(
        kinds,
        vec!["accepted", "executed", "drained", "cancelled", "rebalanced"]
    );
}

#[test]
fn test_rate_limited_submissions_reject_overflow_only() {
    let clock = Arc::new(SimClock::new(None));
    let config = EngineConfig {
        rate_capacity: 10,
        ..Default::default()
    };
    let mut engine = ExecutionEngine::new(config, clock.clone(), Arc::new(basketsim_engine::NullSink));
    engine.create_index("ETF-1", abc_assets()).unwrap();

    // capacity + 4 submissions inside one window
    for id in 0..14u64 {
        engine.submit_buy(id, "ETF-1", dec!(100), dec!(30));
    }
    assert_eq!(engine.get_rejected_orders().len(), 4);
    assert_eq!(engine.queued_orders(), 10);

    // The window already spent its budget; a drain executes nothing yet
    let summary = engine.drain_queue();
    assert_eq!(summary.executed, 0);
    assert_eq!(summary.remaining, 10);
    for id in 0..10u64 {
        assert_eq!(engine.get_order(id).unwrap().status, OrderStatus::Pending);
    }

    // Next window: the whole backlog drains
    clock.advance(Duration::seconds(11));
    let summary = engine.drain_queue();
    assert_eq!(summary.executed, 10);
    assert_eq!(summary.remaining, 0);
}

#[test]
fn test_prices_feed_through_to_fill_math() {
    let clock = Arc::new(SimClock::new(None));
    let mut engine = ExecutionEngine::with_defaults(clock.clone());
    engine.create_index("ETF-1", abc_assets()).unwrap();

    // Double A's price: NAV 30 -> 40
    let prices: HashMap<Symbol, Price> = [("A".to_string(), dec!(20))].into_iter().collect();
    engine.update_prices("ETF-1", &prices).unwrap();
    assert_eq!(engine.get_index("ETF-1").unwrap().nav(), dec!(40));

    // A constraint priced off the new level binds at 50%
    let mut constraints = ConstraintMap::new();
    constraints.insert(
        "A".into(),
        LiquidityConstraint::new(dec!(1000000), dec!(0.01)),
    );
    engine
        .set_liquidity_constraints("ETF-1", constraints)
        .unwrap();

    // Required notional for A: 100_000 x 20 x 1 = 2_000_000 -> fraction 0.5
    engine.submit_buy(1, "ETF-1", dec!(100000), dec!(40));
    engine.drain_queue();
    assert_eq!(engine.get_fill_report(1).unwrap().fill_percentage, dec!(50));
}
