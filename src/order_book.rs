//! One side's resting-order queue: a price level map kept in price-time order.
//!
//! A [`SideQueue`] holds every resting order for one side of one instrument.
//! Orders are grouped by price into a `BTreeMap`, and within a price level
//! they sit in a `VecDeque` in arrival order — since timestamps are assigned
//! inside the same critical section that appends to the level (see
//! [`crate::book`]), arrival order and timestamp order coincide, so the
//! front of the best level is always the earliest order at the best price.
//! Iterating a `BTreeMap`'s keys is already sorted, so there is no separate
//! re-sort step after insert; price-time order is kept by construction
//! rather than by re-sorting a flat list after every insert.

use crate::types::{Order, OrderId, Side};
use std::collections::{BTreeMap, VecDeque};

/// Resting orders for one side of one instrument, grouped by price.
///
/// Buy queues are read with prices visited highest-first; sell queues
/// lowest-first. The queue itself doesn't know which direction it is read
/// in — that's a property of how its owner (`InstrumentBook`) walks it.
#[derive(Debug, Default)]
pub struct SideQueue {
    levels: BTreeMap<u64, VecDeque<Order>>,
}

impl SideQueue {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Appends a resting order to its price level. Caller has already
    /// assigned `order.timestamp` inside the critical section that calls
    /// this, so FIFO order within the level is time order.
    pub fn insert(&mut self, order: Order) {
        self.levels.entry(order.price).or_default().push_back(order);
    }

    /// Removes the order with `id` from anywhere in the queue. Linear scan —
    /// a cancel may name any resting order, not just the one at the front.
    pub fn remove(&mut self, id: OrderId) -> bool {
        let mut empty_price = None;
        let mut found = false;
        for (&price, level) in self.levels.iter_mut() {
            if let Some(pos) = level.iter().position(|o| o.id == id) {
                level.remove(pos);
                found = true;
                if level.is_empty() {
                    empty_price = Some(price);
                }
                break;
            }
        }
        if let Some(price) = empty_price {
            self.levels.remove(&price);
        }
        found
    }

    /// The best-priced level for a queue read in `side`'s order: highest
    /// price for buy, lowest for sell.
    pub fn best_price(&self, side: Side) -> Option<u64> {
        match side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    /// Mutable access to the front order of the best level, for `side`'s
    /// ordering. `None` if the queue is empty.
    pub fn front_mut(&mut self, side: Side) -> Option<&mut Order> {
        let price = self.best_price(side)?;
        self.levels.get_mut(&price).and_then(|level| level.front_mut())
    }

    /// Removes the front order of the best level for `side`'s ordering,
    /// dropping the level if it becomes empty. Used once a matched order's
    /// `count` reaches zero.
    pub fn pop_front(&mut self, side: Side) {
        if let Some(price) = self.best_price(side) {
            if let Some(level) = self.levels.get_mut(&price) {
                level.pop_front();
                if level.is_empty() {
                    self.levels.remove(&price);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.values().map(VecDeque::len).sum()
    }

    /// All resting orders, best-first for `side`'s ordering, ties earliest
    /// first. Used by invariant checks and snapshots, not the hot path.
    pub fn iter_ordered(&self, side: Side) -> Vec<&Order> {
        let mut prices: Vec<u64> = self.levels.keys().copied().collect();
        if side == Side::Buy {
            prices.reverse();
        }
        prices
            .into_iter()
            .flat_map(|p| self.levels.get(&p).into_iter().flatten())
            .collect()
    }
}
