//! Engine events and reporting sinks
//!
//! The engine produces structured events instead of printing; a
//! [`ReportingSink`] records them for human inspection. Sinks sit outside
//! the engine's consistency domain: recording is infallible at the call
//! site, and a slow or dead consumer can never block or corrupt engine
//! state.

use basketsim_core::{OrderStatus, PositionId, Price, Quantity, RejectReason, Timestamp};
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Structured record of one engine state change
#[derive(Debug, Clone, Serialize)]
pub enum EngineEvent {
    OrderAccepted {
        position_id: PositionId,
        index_id: String,
        quantity: Quantity,
        price: Price,
        timestamp: Timestamp,
    },
    OrderRejected {
        position_id: PositionId,
        index_id: String,
        reason: RejectReason,
        timestamp: Timestamp,
    },
    OrderExecuted {
        position_id: PositionId,
        index_id: String,
        status: OrderStatus,
        filled_quantity: Quantity,
        filled_price: Price,
        realized_loss: Decimal,
        timestamp: Timestamp,
    },
    OrderCancelled {
        position_id: PositionId,
        loss: Decimal,
        timestamp: Timestamp,
    },
    BatchDrained {
        batch_id: Uuid,
        executed: usize,
        remaining: usize,
        timestamp: Timestamp,
    },
    PricesUpdated {
        index_id: String,
        symbols_updated: usize,
        timestamp: Timestamp,
    },
    Rebalanced {
        index_id: String,
        total_cost: Decimal,
        timestamp: Timestamp,
    },
}

/// Recording boundary for engine events
pub trait ReportingSink: Send + Sync {
    fn record(&self, event: &EngineEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportingSink for NullSink {
    fn record(&self, _event: &EngineEvent) {}
}

/// Writes events through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ReportingSink for LogSink {
    fn record(&self, event: &EngineEvent) {
        match event {
            EngineEvent::OrderAccepted {
                position_id,
                index_id,
                quantity,
                price,
                ..
            } => info!("[ORDER] accepted #{position_id} {index_id} {quantity} @ {price}"),
            EngineEvent::OrderRejected {
                position_id,
                index_id,
                reason,
                ..
            } => info!("[ORDER] rejected #{position_id} {index_id}: {reason:?}"),
            EngineEvent::OrderExecuted {
                position_id,
                status,
                filled_quantity,
                filled_price,
                ..
            } => info!("[EXEC] #{position_id} {status} {filled_quantity} @ {filled_price}"),
            EngineEvent::OrderCancelled {
                position_id, loss, ..
            } => info!("[ORDER] cancelled #{position_id} loss {loss}"),
            EngineEvent::BatchDrained {
                batch_id,
                executed,
                remaining,
                ..
            } => info!("[QUEUE] batch {batch_id}: {executed} executed, {remaining} queued"),
            EngineEvent::PricesUpdated {
                index_id,
                symbols_updated,
                ..
            } => info!("[PRICE] {index_id}: {symbols_updated} symbols updated"),
            EngineEvent::Rebalanced {
                index_id,
                total_cost,
                ..
            } => info!("[REBAL] {index_id} cost {total_cost}"),
        }
    }
}

/// Forwards events to a channel, fire-and-forget. Events sent after the
/// receiver is gone are dropped silently.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<EngineEvent>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ReportingSink for ChannelSink {
    fn record(&self, event: &EngineEvent) {
        let _ = self.tx.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_channel_sink_forwards_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx);

        sink.record(&EngineEvent::OrderCancelled {
            position_id: 1,
            loss: dec!(0),
            timestamp: Utc::now(),
        });

        match rx.try_recv().unwrap() {
            EngineEvent::OrderCancelled { position_id, .. } => assert_eq!(position_id, 1),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        let sink = ChannelSink::new(tx);

        // Must not panic or error back into the engine
        sink.record(&EngineEvent::PricesUpdated {
            index_id: "ETF-1".into(),
            symbols_updated: 0,
            timestamp: Utc::now(),
        });
    }
}
