//! Order Ledger
//!
//! Exclusive owner of every [`Order`], keyed by position id. All status
//! transitions flow through here; terminal orders are immutable. Failures
//! a caller can act on (unknown id, double cancel) are reported as data in
//! [`CancelResult`], never raised.

use std::collections::HashMap;

use basketsim_core::{
    CancelResult, FillReport, Order, OrderStatus, PositionId, Price, Quantity, Timestamp,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Default)]
pub struct OrderLedger {
    orders: HashMap<PositionId, Order>,
    /// Position ids in submission order, for deterministic listings
    submission_log: Vec<PositionId>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, position_id: PositionId) -> bool {
        self.orders.contains_key(&position_id)
    }

    pub fn get(&self, position_id: PositionId) -> Option<&Order> {
        self.orders.get(&position_id)
    }

    /// Record a newly submitted order (pending or rejected). The caller
    /// guarantees the position id is not already present.
    pub fn insert(&mut self, order: Order) {
        debug_assert!(
            !self.orders.contains_key(&order.position_id),
            "position id {} reused",
            order.position_id
        );
        self.submission_log.push(order.position_id);
        self.orders.insert(order.position_id, order);
    }

    /// Cancel an order. Unknown ids and terminal orders fail as data;
    /// cancelling a partially filled order realizes the price loss on the
    /// filled portion.
    pub fn cancel(&mut self, position_id: PositionId) -> CancelResult {
        let Some(order) = self.orders.get_mut(&position_id) else {
            return CancelResult::failed("Order not found");
        };

        if order.status.is_terminal() {
            return CancelResult::failed(format!("Order already {}", order.status));
        }

        let loss = if order.status == OrderStatus::PartiallyFilled {
            (order.filled_quantity * (order.price - order.filled_price)).abs()
        } else {
            Decimal::ZERO
        };

        order.status = OrderStatus::Cancelled;
        order.realized_loss = loss;
        CancelResult::ok("Order cancelled", loss)
    }

    /// Apply an execution outcome to a pending order
    pub fn record_execution(
        &mut self,
        position_id: PositionId,
        filled_quantity: Quantity,
        filled_price: Price,
        status: OrderStatus,
        realized_loss: Decimal,
    ) {
        let Some(order) = self.orders.get_mut(&position_id) else {
            debug_assert!(false, "execution recorded for unknown order {position_id}");
            return;
        };
        debug_assert_eq!(order.status, OrderStatus::Pending);

        order.filled_quantity = filled_quantity;
        order.filled_price = filled_price;
        order.status = status;
        order.realized_loss = realized_loss;
    }

    /// Fill quality for an order; `None` for unknown ids
    pub fn fill_report(&self, position_id: PositionId, now: Timestamp) -> Option<FillReport> {
        let order = self.orders.get(&position_id)?;
        Some(FillReport {
            position_id,
            fill_percentage: order.fill_fraction() * dec!(100),
            loss: order.realized_loss,
            timestamp: now,
        })
    }

    /// All orders refused at submission, in submission order
    pub fn rejected_orders(&self) -> Vec<Order> {
        self.submission_log
            .iter()
            .filter_map(|id| self.orders.get(id))
            .filter(|order| order.status == OrderStatus::Rejected)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
