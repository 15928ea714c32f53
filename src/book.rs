//! Instrument book: two side queues plus the opposite-side exclusion
//! protocol that gives one instrument's matching its ordering guarantees.
//!
//! A coordinator mutex and two counters (`buy_active`, `sell_active`)
//! gated by two condition variables enforce that a buy and a sell on the
//! same instrument never execute concurrently, while same-side operations
//! only serialize briefly on their side's queue mutex. Cancels bypass the
//! coordinator entirely — they touch one side's mutex only, never match,
//! and never block on the opposite side.

use crate::event::{Event, EventSink};
use crate::matching;
use crate::order_book::SideQueue;
use crate::timestamp::TimestampSource;
use crate::types::{Order, OrderId, Side};
use std::sync::{Arc, Condvar, Mutex};

#[derive(Default)]
struct Counters {
    buy_active: u32,
    sell_active: u32,
}

/// One instrument's resting orders and the concurrency state that
/// coordinates buy/sell/cancel flows against them. Created once by
/// [`crate::registry::InstrumentRegistry`] and shared by reference for the
/// life of the process.
pub struct InstrumentBook {
    name: Arc<str>,
    buy: Mutex<SideQueue>,
    sell: Mutex<SideQueue>,
    coordinator: Mutex<Counters>,
    buy_cond: Condvar,
    sell_cond: Condvar,
}

impl InstrumentBook {
    pub fn new(name: Arc<str>) -> Self {
        Self {
            name,
            buy: Mutex::new(SideQueue::new()),
            sell: Mutex::new(SideQueue::new()),
            coordinator: Mutex::new(Counters::default()),
            buy_cond: Condvar::new(),
            sell_cond: Condvar::new(),
        }
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// Submits a limit buy. Matches against resting sells, rests any
    /// remainder, and returns whether anything rested.
    pub fn submit_buy(
        &self,
        id: OrderId,
        price: u64,
        count: u64,
        timestamp: &dyn TimestampSource,
        sink: &dyn EventSink,
    ) -> bool {
        self.enter(Side::Buy);
        let rested = self.match_and_rest(Side::Buy, id, price, count, timestamp, sink);
        self.exit(Side::Buy);
        rested
    }

    /// Submits a limit sell. Symmetric to [`Self::submit_buy`].
    pub fn submit_sell(
        &self,
        id: OrderId,
        price: u64,
        count: u64,
        timestamp: &dyn TimestampSource,
        sink: &dyn EventSink,
    ) -> bool {
        self.enter(Side::Sell);
        let rested = self.match_and_rest(Side::Sell, id, price, count, timestamp, sink);
        self.exit(Side::Sell);
        rested
    }

    /// Removes `id` from the named side's queue if present. Takes only
    /// that side's mutex; never participates in the active-counter
    /// protocol — a cancel never matches and touches one side only.
    pub fn cancel(&self, id: OrderId, side: Side) -> bool {
        self.queue_for(side).lock().expect("side mutex poisoned").remove(id)
    }

    fn queue_for(&self, side: Side) -> &Mutex<SideQueue> {
        match side {
            Side::Buy => &self.buy,
            Side::Sell => &self.sell,
        }
    }

    /// Blocks until the opposite side has drained, then marks `side` active.
    fn enter(&self, side: Side) {
        let mut counters = self.coordinator.lock().expect("coordinator mutex poisoned");
        match side {
            Side::Buy => {
                while counters.sell_active > 0 {
                    counters = self.buy_cond.wait(counters).expect("coordinator mutex poisoned");
                }
                counters.buy_active += 1;
            }
            Side::Sell => {
                while counters.buy_active > 0 {
                    counters = self.sell_cond.wait(counters).expect("coordinator mutex poisoned");
                }
                counters.sell_active += 1;
            }
        }
    }

    /// Marks `side` inactive and, if it was the last active flow on that
    /// side, wakes waiters on the opposite side.
    fn exit(&self, side: Side) {
        let mut counters = self.coordinator.lock().expect("coordinator mutex poisoned");
        match side {
            Side::Buy => {
                counters.buy_active -= 1;
                if counters.buy_active == 0 {
                    self.sell_cond.notify_all();
                }
            }
            Side::Sell => {
                counters.sell_active -= 1;
                if counters.sell_active == 0 {
                    self.buy_cond.notify_all();
                }
            }
        }
    }

    /// Repeatedly crosses `side`'s incoming order against the opposite
    /// side's best resting order, emitting one `Executed` per fill, then
    /// rests any remainder and emits `Added`. The opposite side's mutex is
    /// taken only for the duration of a single [`matching::step`] call, so
    /// no lock is held while `sink` is called.
    fn match_and_rest(
        &self,
        side: Side,
        id: OrderId,
        price: u64,
        mut remaining: u64,
        timestamp: &dyn TimestampSource,
        sink: &dyn EventSink,
    ) -> bool {
        let opposite = self.queue_for(side.opposite());
        while remaining > 0 {
            let matched = {
                let mut opposite = opposite.lock().expect("side mutex poisoned");
                matching::step(&mut opposite, side, price, remaining)
            };
            let Some(matched) = matched else { break };
            remaining -= matched.count;
            sink.emit(Event::Executed {
                resting_id: matched.resting_id,
                incoming_id: id,
                execution_counter: matched.execution_counter,
                price: matched.price,
                count: matched.count,
                timestamp: timestamp.now(),
            });
        }

        if remaining == 0 {
            return false;
        }

        let rest_timestamp = {
            let mut own = self.queue_for(side).lock().expect("side mutex poisoned");
            let rest_timestamp = timestamp.now();
            own.insert(Order {
                id,
                price,
                count: remaining,
                execution_counter: 1,
                timestamp: rest_timestamp,
            });
            rest_timestamp
        };
        sink.emit(Event::Added {
            id,
            instrument: Arc::clone(&self.name),
            price,
            count: remaining,
            side,
            timestamp: rest_timestamp,
        });
        true
    }

    /// Resting orders on `side`, best-first. For tests and invariant checks.
    pub fn snapshot(&self, side: Side) -> Vec<Order> {
        self.queue_for(side)
            .lock()
            .expect("side mutex poisoned")
            .iter_ordered(side)
            .into_iter()
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InMemoryEventSink;
    use crate::timestamp::ManualTimestampSource;

    fn book() -> InstrumentBook {
        InstrumentBook::new(Arc::from("GOOG"))
    }

    #[test]
    fn full_cross_emits_added_then_executed_no_second_add() {
        let b = book();
        let ts = ManualTimestampSource::starting_at(1);
        let sink = InMemoryEventSink::new();
        assert!(b.submit_sell(OrderId(1), 100, 10, &ts, &sink));
        assert!(!b.submit_buy(OrderId(2), 100, 10, &ts, &sink));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        matches!(events[0], Event::Added { .. });
        match &events[1] {
            Event::Executed { resting_id, incoming_id, execution_counter, price, count, .. } => {
                assert_eq!(*resting_id, OrderId(1));
                assert_eq!(*incoming_id, OrderId(2));
                assert_eq!(*execution_counter, 1);
                assert_eq!(*price, 100);
                assert_eq!(*count, 10);
            }
            other => panic!("expected Executed, got {other:?}"),
        }
        assert!(b.snapshot(Side::Sell).is_empty());
        assert!(b.snapshot(Side::Buy).is_empty());
    }

    #[test]
    fn partial_fill_then_further_fill_increments_execution_counter() {
        let b = book();
        let ts = ManualTimestampSource::starting_at(1);
        let sink = InMemoryEventSink::new();
        b.submit_sell(OrderId(1), 50, 10, &ts, &sink);
        assert!(!b.submit_buy(OrderId(2), 55, 7, &ts, &sink));
        assert!(b.submit_buy(OrderId(3), 55, 5, &ts, &sink));

        assert!(b.snapshot(Side::Sell).is_empty());

        let buy_resting = b.snapshot(Side::Buy);
        assert_eq!(buy_resting.len(), 1);
        assert_eq!(buy_resting[0].id, OrderId(3));
        assert_eq!(buy_resting[0].count, 2);
    }

    #[test]
    fn non_crossing_orders_both_rest() {
        let b = book();
        let ts = ManualTimestampSource::starting_at(1);
        let sink = InMemoryEventSink::new();
        assert!(b.submit_buy(OrderId(1), 90, 5, &ts, &sink));
        assert!(b.submit_sell(OrderId(2), 100, 5, &ts, &sink));
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(e, Event::Added { .. })));
    }

    #[test]
    fn time_priority_matches_earliest_order_at_best_price() {
        let b = book();
        let ts = ManualTimestampSource::starting_at(1);
        let sink = InMemoryEventSink::new();
        b.submit_sell(OrderId(1), 10, 5, &ts, &sink);
        b.submit_sell(OrderId(2), 10, 5, &ts, &sink);
        b.submit_buy(OrderId(3), 10, 5, &ts, &sink);

        let resting = b.snapshot(Side::Sell);
        assert_eq!(resting.len(), 1);
        assert_eq!(resting[0].id, OrderId(2));
    }

    #[test]
    fn cancel_success_then_failure() {
        let b = book();
        let ts = ManualTimestampSource::starting_at(1);
        let sink = InMemoryEventSink::new();
        b.submit_buy(OrderId(1), 20, 5, &ts, &sink);
        assert!(b.cancel(OrderId(1), Side::Buy));
        assert!(!b.cancel(OrderId(1), Side::Buy));
    }
}
