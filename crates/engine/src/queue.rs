//! Execution Queue
//!
//! Holds pending orders awaiting a drain. Ranking is an explicit stable
//! sort - timestamp, then priority class, then predicted liquidity impact,
//! then insertion order - rather than comparator side effects inside a
//! heap. Earlier timestamps always win regardless of priority class;
//! within a timestamp, REBALANCE and CANCEL intents go before MARKET and
//! LIMIT; within a class, lower predicted market impact executes first.
//!
//! Orders beyond the drain's slot budget stay queued unchanged - they are
//! never bulk-rejected at drain time.

use std::collections::HashMap;

use basketsim_core::{OrderPriority, PositionId, Timestamp};
use chrono::Duration;
use rust_decimal::Decimal;

/// One queued intent
#[derive(Debug, Clone)]
pub struct QueueItem {
    /// Insertion counter, the final FIFO tie-break
    pub seq: u64,
    pub enqueued_at: Timestamp,
    pub priority: OrderPriority,
    pub position_id: PositionId,
}

#[derive(Debug, Default)]
pub struct ExecutionQueue {
    items: Vec<QueueItem>,
    next_seq: u64,
}

impl ExecutionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, position_id: PositionId, priority: OrderPriority, now: Timestamp) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.push(QueueItem {
            seq,
            enqueued_at: now,
            priority,
            position_id,
        });
    }

    /// Rank every queued item and remove the first `slots` of them for
    /// execution. The remainder stays queued, in ranked order.
    /// `impacts` carries the predicted liquidity impact per position id;
    /// missing entries rank as zero impact.
    pub fn drain_plan(
        &mut self,
        slots: usize,
        impacts: &HashMap<PositionId, Decimal>,
    ) -> Vec<QueueItem> {
        self.items.sort_by(|a, b| {
            let impact_a = impacts.get(&a.position_id).copied().unwrap_or(Decimal::ZERO);
            let impact_b = impacts.get(&b.position_id).copied().unwrap_or(Decimal::ZERO);
            a.enqueued_at
                .cmp(&b.enqueued_at)
                .then(a.priority.rank().cmp(&b.priority.rank()))
                .then(impact_a.cmp(&impact_b))
                .then(a.seq.cmp(&b.seq))
        });

        let take = slots.min(self.items.len());
        self.items.drain(..take).collect()
    }

    /// Drop the queue entry for a position id, if present
    pub fn remove(&mut self, position_id: PositionId) {
        self.items.retain(|item| item.position_id != position_id);
    }

    /// Drop entries enqueued more than `max_age` ago. Order status is not
    /// touched; stale entries simply leave the queue.
    pub fn purge_older_than(&mut self, max_age: Duration, now: Timestamp) -> usize {
        let before = self.items.len();
        self.items.retain(|item| now - item.enqueued_at <= max_age);
        before - self.items.len()
    }

    pub fn position_ids(&self) -> impl Iterator<Item = PositionId> + '_ {
        self.items.iter().map(|item| item.position_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
