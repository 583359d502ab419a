//! Execution Engine facade
//!
//! Owns the indices, order ledger, execution queue, rate limiter, and
//! per-index retainers as one consistency domain. Every public operation
//! is synchronous, takes `&mut self`, and completes before returning, so a
//! single owner (or one external mutex) serializes all mutation. Time
//! comes from an injected [`Clock`]; reporting goes to an injected
//! [`ReportingSink`].

use std::collections::HashMap;
use std::sync::Arc;

use basketsim_core::{
    Asset, CancelResult, ConstraintMap, DrainSummary, FillReport, Index, Order, OrderPriority,
    OrderStatus, PositionId, Price, Quantity, RebalanceReport, RejectReason, Symbol, Timestamp,
    WeightMap,
};
use basketsim_ports::Clock;
use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::events::{EngineEvent, NullSink, ReportingSink};
use crate::ledger::OrderLedger;
use crate::liquidity::LiquidityEvaluator;
use crate::queue::ExecutionQueue;
use crate::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::rebalance::Rebalancer;

/// Price degradation applied at execution relative to the requested price
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlippageModel {
    /// Flat rate on every execution
    Fixed(Decimal),
    /// Rate scales with order size and is capped
    VolumeScaled {
        rate_per_thousand: Decimal,
        cap: Decimal,
    },
}

impl SlippageModel {
    /// Slippage rate for an order of `quantity` units
    pub fn rate(&self, quantity: Quantity) -> Decimal {
        match self {
            SlippageModel::Fixed(rate) => *rate,
            SlippageModel::VolumeScaled {
                rate_per_thousand,
                cap,
            } => {
                let scaled = quantity / dec!(1000) * rate_per_thousand;
                scaled.min(*cap)
            }
        }
    }
}

impl Default for SlippageModel {
    fn default() -> Self {
        // 0.1% flat
        SlippageModel::Fixed(dec!(0.001))
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Admission window duration
    pub rate_window: Duration,
    /// Admissions allowed per window
    pub rate_capacity: u32,
    /// Minimum notional per constituent asset; an order below
    /// `min_order_value x asset_count` is rejected
    pub min_order_value: Decimal,
    pub slippage: SlippageModel,
    /// Fee rate applied to rebalance cost
    pub fee_rate: Decimal,
    /// Fill fractions at or above this threshold count as a full fill
    pub full_fill_threshold: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rate_window: Duration::seconds(10),
            rate_capacity: 100,
            min_order_value: dec!(5),
            slippage: SlippageModel::default(),
            fee_rate: dec!(0.001),
            full_fill_threshold: dec!(0.99),
        }
    }
}

/// The order execution engine
pub struct ExecutionEngine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn ReportingSink>,
    indices: HashMap<String, Index>,
    constraints: HashMap<String, ConstraintMap>,
    /// Unexecuted notional set aside per index; never reset
    retainers: HashMap<String, Decimal>,
    ledger: OrderLedger,
    queue: ExecutionQueue,
    limiter: RateLimiter,
}

impl ExecutionEngine {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>, sink: Arc<dyn ReportingSink>) -> Self {
        let limiter = RateLimiter::new(
            RateLimiterConfig {
                window: config.rate_window,
                capacity: config.rate_capacity,
            },
            clock.now(),
        );
        Self {
            config,
            clock,
            sink,
            indices: HashMap::new(),
            constraints: HashMap::new(),
            retainers: HashMap::new(),
            ledger: OrderLedger::new(),
            queue: ExecutionQueue::new(),
            limiter,
        }
    }

    /// Engine with default configuration and no reporting
    pub fn with_defaults(clock: Arc<dyn Clock>) -> Self {
        Self::new(EngineConfig::default(), clock, Arc::new(NullSink))
    }

    /// Create an index from `(symbol, quantity, price_at_last_rebalance,
    /// current_price)` rows. Fails on duplicate index ids, duplicate
    /// symbols, or an empty basket.
    pub fn create_index(
        &mut self,
        id: &str,
        assets: Vec<(Symbol, Quantity, Price, Price)>,
    ) -> Result<&Index> {
        if self.indices.contains_key(id) {
            return Err(EngineError::DuplicateIndex(id.to_string()));
        }

        let now = self.clock.now();
        let assets = assets
            .into_iter()
            .map(|(symbol, quantity, rebalance_price, current_price)| {
                Asset::new(symbol, quantity, rebalance_price, current_price)
            })
            .collect();
        let index = Index::new(id, assets, now)?;

        self.retainers.insert(id.to_string(), Decimal::ZERO);
        Ok(self.indices.entry(id.to_string()).or_insert(index))
    }

    /// Replace the liquidity constraints for an index
    pub fn set_liquidity_constraints(
        &mut self,
        index_id: &str,
        constraints: ConstraintMap,
    ) -> Result<()> {
        if !self.indices.contains_key(index_id) {
            return Err(EngineError::IndexNotFound(index_id.to_string()));
        }
        self.constraints.insert(index_id.to_string(), constraints);
        Ok(())
    }

    /// Update current prices for the named symbols. Symbols absent from
    /// the index are ignored.
    pub fn update_prices(&mut self, index_id: &str, prices: &HashMap<Symbol, Price>) -> Result<()> {
        let index = self
            .indices
            .get_mut(index_id)
            .ok_or_else(|| EngineError::IndexNotFound(index_id.to_string()))?;

        let mut updated = 0;
        for asset in index.assets_mut() {
            if let Some(price) = prices.get(&asset.symbol) {
                asset.current_price = *price;
                updated += 1;
            }
        }

        self.sink.record(&EngineEvent::PricesUpdated {
            index_id: index_id.to_string(),
            symbols_updated: updated,
            timestamp: self.clock.now(),
        });
        Ok(())
    }

    /// Submit a buy order. Admission failures return a REJECTED order the
    /// caller can inspect - they are data, not errors. Checks run in
    /// order: unknown index and duplicate position id first (neither may
    /// consume a rate slot), then non-positive quantity, rate admission,
    /// and the per-asset minimum notional.
    pub fn submit_buy(
        &mut self,
        position_id: PositionId,
        index_id: &str,
        quantity: Quantity,
        price: Price,
    ) -> Order {
        let now = self.clock.now();

        if self.ledger.contains(position_id) {
            // The id already names another order; reject without touching
            // the ledger entry it points at.
            let order = Order::rejected_buy(position_id, index_id, quantity, price, now);
            self.emit_rejection(&order, RejectReason::DuplicatePositionId, now);
            return order;
        }

        let Some(asset_count) = self.indices.get(index_id).map(Index::asset_count) else {
            return self.reject(position_id, index_id, quantity, price, RejectReason::UnknownIndex, now);
        };

        if quantity <= Decimal::ZERO {
            return self.reject(
                position_id,
                index_id,
                quantity,
                price,
                RejectReason::NonPositiveQuantity,
                now,
            );
        }

        if !self.limiter.admit(now) {
            return self.reject(
                position_id,
                index_id,
                quantity,
                price,
                RejectReason::RateLimited,
                now,
            );
        }

        let min_notional = self.config.min_order_value * Decimal::from(asset_count as u64);
        if quantity * price < min_notional {
            return self.reject(
                position_id,
                index_id,
                quantity,
                price,
                RejectReason::BelowMinimumNotional,
                now,
            );
        }

        let order = Order::pending_buy(position_id, index_id, quantity, price, now);
        self.ledger.insert(order.clone());
        self.queue.enqueue(position_id, OrderPriority::Limit, now);
        self.sink.record(&EngineEvent::OrderAccepted {
            position_id,
            index_id: index_id.to_string(),
            quantity,
            price,
            timestamp: now,
        });
        order
    }

    /// Cancel an order. Double-cancel and unknown ids are reported, not
    /// raised; a partially filled cancel realizes the loss on the filled
    /// portion.
    pub fn cancel(&mut self, position_id: PositionId) -> CancelResult {
        let result = self.ledger.cancel(position_id);
        if result.success {
            self.queue.remove(position_id);
            self.sink.record(&EngineEvent::OrderCancelled {
                position_id,
                loss: result.loss,
                timestamp: self.clock.now(),
            });
        }
        result
    }

    /// Drain the execution queue: rank every queued order, execute up to
    /// the admission slots left in the current window, and leave the rest
    /// queued for the next drain (they stay PENDING - drain never
    /// bulk-rejects).
    pub fn drain_queue(&mut self) -> DrainSummary {
        let now = self.clock.now();
        let slots = self.limiter.available_slots(now) as usize;

        let impacts: HashMap<PositionId, Decimal> = self
            .queue
            .position_ids()
            .filter_map(|position_id| {
                let order = self.ledger.get(position_id)?;
                let index = self.indices.get(&order.index_id)?;
                let constraints = self.constraints.get(&order.index_id);
                let impact = constraints
                    .map(|c| LiquidityEvaluator::liquidity_impact(index, c))
                    .unwrap_or(Decimal::ZERO);
                Some((position_id, impact))
            })
            .collect();

        let plan = self.queue.drain_plan(slots, &impacts);
        let mut executed = 0;
        for item in &plan {
            if self.execute_order(item.position_id, now) {
                executed += 1;
            }
        }

        let summary = DrainSummary {
            batch_id: Uuid::new_v4(),
            executed,
            remaining: self.queue.len(),
            timestamp: now,
        };
        self.sink.record(&EngineEvent::BatchDrained {
            batch_id: summary.batch_id,
            executed: summary.executed,
            remaining: summary.remaining,
            timestamp: now,
        });
        summary
    }

    /// Execute one pending order against its index's liquidity. Returns
    /// false for entries whose order is no longer PENDING (cancelled while
    /// queued); those consume no admission slot.
    fn execute_order(&mut self, position_id: PositionId, now: Timestamp) -> bool {
        let Some(order) = self.ledger.get(position_id) else {
            return false;
        };
        if order.status != OrderStatus::Pending {
            return false;
        }

        let quantity = order.quantity;
        let price = order.price;
        let index_id = order.index_id.clone();
        let Some(index) = self.indices.get(&index_id) else {
            return false;
        };

        let empty = ConstraintMap::new();
        let constraints = self.constraints.get(&index_id).unwrap_or(&empty);
        let fraction = LiquidityEvaluator::fillable_fraction(index, quantity, constraints);

        let filled_quantity = quantity * fraction;
        let slippage = self.config.slippage.rate(quantity);
        let filled_price = price * (Decimal::ONE + slippage);
        let status = if fraction >= self.config.full_fill_threshold {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
        let realized_loss = (filled_quantity * (price - filled_price)).abs();

        self.ledger
            .record_execution(position_id, filled_quantity, filled_price, status, realized_loss);
        self.limiter.record(now);

        // Unexecuted notional accumulates in the index retainer
        let unexecuted = quantity * price - filled_quantity * filled_price;
        if let Some(retainer) = self.retainers.get_mut(&index_id) {
            *retainer += unexecuted;
        }

        self.sink.record(&EngineEvent::OrderExecuted {
            position_id,
            index_id,
            status,
            filled_quantity,
            filled_price,
            realized_loss,
            timestamp: now,
        });
        true
    }

    /// Fill quality for an order; `None` for unknown ids
    pub fn get_fill_report(&self, position_id: PositionId) -> Option<FillReport> {
        self.ledger.fill_report(position_id, self.clock.now())
    }

    /// Rebalance an index to new target weights
    pub fn rebalance(&mut self, index_id: &str, new_weights: &WeightMap) -> Result<RebalanceReport> {
        let now = self.clock.now();
        let index = self
            .indices
            .get_mut(index_id)
            .ok_or_else(|| EngineError::IndexNotFound(index_id.to_string()))?;

        let report = Rebalancer::rebalance(index, new_weights, self.config.fee_rate, now);
        self.sink.record(&EngineEvent::Rebalanced {
            index_id: index_id.to_string(),
            total_cost: report.total_cost,
            timestamp: now,
        });
        Ok(report)
    }

    /// All orders refused at submission, in submission order
    pub fn get_rejected_orders(&self) -> Vec<Order> {
        self.ledger.rejected_orders()
    }

    pub fn get_order(&self, position_id: PositionId) -> Option<&Order> {
        self.ledger.get(position_id)
    }

    pub fn get_index(&self, index_id: &str) -> Option<&Index> {
        self.indices.get(index_id)
    }

    /// Accumulated unexecuted notional for an index
    pub fn retainer(&self, index_id: &str) -> Option<Decimal> {
        self.retainers.get(index_id).copied()
    }

    /// Number of orders waiting in the execution queue
    pub fn queued_orders(&self) -> usize {
        self.queue.len()
    }

    /// Drop queue entries older than `max_age`; their orders keep their
    /// current status. Returns how many entries were dropped.
    pub fn purge_stale_orders(&mut self, max_age: Duration) -> usize {
        self.queue.purge_older_than(max_age, self.clock.now())
    }

    fn reject(
        &mut self,
        position_id: PositionId,
        index_id: &str,
        quantity: Quantity,
        price: Price,
        reason: RejectReason,
        now: Timestamp,
    ) -> Order {
        let order = Order::rejected_buy(position_id, index_id, quantity, price, now);
        self.ledger.insert(order.clone());
        self.emit_rejection(&order, reason, now);
        order
    }

    fn emit_rejection(&self, order: &Order, reason: RejectReason, now: Timestamp) {
        self.sink.record(&EngineEvent::OrderRejected {
            position_id: order.position_id,
            index_id: order.index_id.clone(),
            reason,
            timestamp: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basketsim_core::LiquidityConstraint;
    use basketsim_clock::SimClock;

    fn sim_engine() -> (ExecutionEngine, Arc<SimClock>) {
        let clock = Arc::new(SimClock::new(None));
        let engine = ExecutionEngine::with_defaults(clock.clone());
        (engine, clock)
    }

    fn engine_with_index() -> (ExecutionEngine, Arc<SimClock>) {
        let (mut engine, clock) = sim_engine();
        engine
            .create_index(
                "ETF-1",
                vec![
                    ("A".into(), dec!(1), dec!(10), dec!(10)),
                    ("B".into(), dec!(2), dec!(5), dec!(5)),
                    ("C".into(), dec!(5), dec!(2), dec!(2)),
                ],
            )
            .unwrap();
        (engine, clock)
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let (mut engine, _clock) = engine_with_index();
        let err = engine
            .create_index("ETF-1", vec![("X".into(), dec!(1), dec!(1), dec!(1))])
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateIndex("ETF-1".into()));
    }

    #[test]
    fn test_submit_non_positive_quantity_rejected() {
        let (mut engine, _clock) = engine_with_index();
        let order = engine.submit_buy(1, "ETF-1", dec!(0), dec!(30));
        assert_eq!(order.status, OrderStatus::Rejected);
        assert_eq!(engine.get_rejected_orders().len(), 1);
        assert_eq!(engine.queued_orders(), 0);
    }

    #[test]
    fn test_submit_unknown_index_rejected() {
        let (mut engine, _clock) = engine_with_index();
        let order = engine.submit_buy(1, "NOPE", dec!(10), dec!(30));
        assert_eq!(order.status, OrderStatus::Rejected);
    }

    #[test]
    fn test_submit_below_minimum_notional_rejected() {
        let (mut engine, _clock) = engine_with_index();
        // 3 assets x 5.0 minimum = 15; 1 x 10 = 10 falls short
        let order = engine.submit_buy(1, "ETF-1", dec!(1), dec!(10));
        assert_eq!(order.status, OrderStatus::Rejected);
    }

    #[test]
    fn test_duplicate_position_id_rejected_without_clobbering() {
        let (mut engine, _clock) = engine_with_index();
        let first = engine.submit_buy(1, "ETF-1", dec!(10), dec!(30));
        assert_eq!(first.status, OrderStatus::Pending);

        let second = engine.submit_buy(1, "ETF-1", dec!(20), dec!(30));
        assert_eq!(second.status, OrderStatus::Rejected);
        // The original order is untouched
        let stored = engine.get_order(1).unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.quantity, dec!(10));
    }

    #[test]
    fn test_rate_limit_rejects_exactly_overflow() {
        let clock = Arc::new(SimClock::new(None));
        let config = EngineConfig {
            rate_capacity: 5,
            ..Default::default()
        };
        let mut engine = ExecutionEngine::new(config, clock.clone(), Arc::new(NullSink));
        engine
            .create_index("ETF-1", vec![("A".into(), dec!(1), dec!(10), dec!(10))])
            .unwrap();

        for id in 0..8u64 {
            engine.submit_buy(id, "ETF-1", dec!(10), dec!(10));
        }

        let rejected = engine.get_rejected_orders();
        assert_eq!(rejected.len(), 3);
        let ids: Vec<_> = rejected.iter().map(|o| o.position_id).collect();
        assert_eq!(ids, vec![5, 6, 7]);
    }

    #[test]
    fn test_rate_window_expiry_admits_again() {
        let clock = Arc::new(SimClock::new(None));
        let config = EngineConfig {
            rate_capacity: 1,
            ..Default::default()
        };
        let mut engine = ExecutionEngine::new(config, clock.clone(), Arc::new(NullSink));
        engine
            .create_index("ETF-1", vec![("A".into(), dec!(1), dec!(10), dec!(10))])
            .unwrap();

        assert_eq!(
            engine.submit_buy(1, "ETF-1", dec!(10), dec!(10)).status,
            OrderStatus::Pending
        );
        assert_eq!(
            engine.submit_buy(2, "ETF-1", dec!(10), dec!(10)).status,
            OrderStatus::Rejected
        );

        clock.advance(Duration::seconds(11));
        assert_eq!(
            engine.submit_buy(3, "ETF-1", dec!(10), dec!(10)).status,
            OrderStatus::Pending
        );
    }

    #[test]
    fn test_drain_executes_full_fill() {
        let (mut engine, _clock) = engine_with_index();
        engine.submit_buy(1, "ETF-1", dec!(100), dec!(30));

        let summary = engine.drain_queue();
        assert_eq!(summary.executed, 1);
        assert_eq!(summary.remaining, 0);

        let order = engine.get_order(1).unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.filled_quantity, dec!(100));
        // 0.1% slippage on the requested price
        assert_eq!(order.filled_price, dec!(30.030));
    }

    #[test]
    fn test_drain_partial_fill_under_constraint() {
        let (mut engine, _clock) = engine_with_index();
        let mut constraints = ConstraintMap::new();
        constraints.insert("C".into(), LiquidityConstraint::new(dec!(200000), dec!(0.05)));
        engine.set_liquidity_constraints("ETF-1", constraints).unwrap();

        engine.submit_buy(1, "ETF-1", dec!(100000), dec!(30));
        engine.drain_queue();

        let report = engine.get_fill_report(1).unwrap();
        assert_eq!(report.fill_percentage, dec!(20));
        assert_eq!(
            engine.get_order(1).unwrap().status,
            OrderStatus::PartiallyFilled
        );
    }

    #[test]
    fn test_drain_respects_available_slots() {
        let clock = Arc::new(SimClock::new(None));
        let config = EngineConfig {
            rate_capacity: 4,
            ..Default::default()
        };
        let mut engine = ExecutionEngine::new(config, clock.clone(), Arc::new(NullSink));
        engine
            .create_index("ETF-1", vec![("A".into(), dec!(1), dec!(10), dec!(10))])
            .unwrap();

        // Three submissions consume three of the four window slots
        for id in 0..3u64 {
            engine.submit_buy(id, "ETF-1", dec!(10), dec!(10));
        }

        let summary = engine.drain_queue();
        assert_eq!(summary.executed, 1);
        assert_eq!(summary.remaining, 2);
        // The stragglers stay PENDING, not rejected
        assert_eq!(engine.get_order(1).unwrap().status, OrderStatus::Pending);
        assert_eq!(engine.get_order(2).unwrap().status, OrderStatus::Pending);

        // A fresh window drains the rest
        clock.advance(Duration::seconds(11));
        let summary = engine.drain_queue();
        assert_eq!(summary.executed, 2);
        assert_eq!(summary.remaining, 0);
    }

    #[test]
    fn test_cancelled_while_queued_is_not_executed() {
        let (mut engine, _clock) = engine_with_index();
        engine.submit_buy(1, "ETF-1", dec!(100), dec!(30));
        assert!(engine.cancel(1).success);

        let summary = engine.drain_queue();
        assert_eq!(summary.executed, 0);
        assert_eq!(engine.get_order(1).unwrap().status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_retainer_accumulates_unexecuted_notional() {
        let (mut engine, _clock) = engine_with_index();
        let mut constraints = ConstraintMap::new();
        constraints.insert("C".into(), LiquidityConstraint::new(dec!(200000), dec!(0.05)));
        engine.set_liquidity_constraints("ETF-1", constraints).unwrap();

        engine.submit_buy(1, "ETF-1", dec!(100000), dec!(30));
        engine.drain_queue();

        // requested 100000 x 30 = 3_000_000; filled 20000 x 30.030 = 600_600
        assert_eq!(engine.retainer("ETF-1").unwrap(), dec!(2399400.000));
    }

    #[test]
    fn test_update_prices_unknown_index_fails() {
        let (mut engine, _clock) = engine_with_index();
        let err = engine.update_prices("NOPE", &HashMap::new()).unwrap_err();
        assert_eq!(err, EngineError::IndexNotFound("NOPE".into()));
    }

    #[test]
    fn test_update_prices_moves_nav() {
        let (mut engine, _clock) = engine_with_index();
        let prices: HashMap<Symbol, Price> = [("A".to_string(), dec!(20))].into_iter().collect();
        engine.update_prices("ETF-1", &prices).unwrap();
        assert_eq!(engine.get_index("ETF-1").unwrap().nav(), dec!(40));
    }

    #[test]
    fn test_volume_scaled_slippage_caps() {
        let model = SlippageModel::VolumeScaled {
            rate_per_thousand: dec!(0.001),
            cap: dec!(0.01),
        };
        assert_eq!(model.rate(dec!(1000)), dec!(0.001));
        assert_eq!(model.rate(dec!(100000)), dec!(0.01));
    }

    #[test]
    fn test_purge_stale_orders_leaves_status() {
        let (mut engine, clock) = engine_with_index();
        engine.submit_buy(1, "ETF-1", dec!(100), dec!(30));

        clock.advance(Duration::seconds(7200));
        let purged = engine.purge_stale_orders(Duration::seconds(3600));
        assert_eq!(purged, 1);
        assert_eq!(engine.queued_orders(), 0);
        assert_eq!(engine.get_order(1).unwrap().status, OrderStatus::Pending);
    }
}
