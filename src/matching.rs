//! Price-time priority matching: one step of crossing an incoming order
//! against the opposite side's best resting order.
//!
//! [`step`] is deliberately single-shot: it inspects and, if it crosses,
//! mutates exactly one resting order and returns. [`crate::book`] calls it
//! in a loop, taking the opposite side's queue mutex for the duration of
//! one `step` call only, so no lock is held while the book emits the
//! resulting `Executed` event.

use crate::order_book::SideQueue;
use crate::types::{OrderId, Side};

/// One resting order crossed by an incoming order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchStep {
    pub resting_id: OrderId,
    /// `execution_counter` the resting order carried going into this fill.
    pub execution_counter: u64,
    pub price: u64,
    pub count: u64,
    /// True if this fill exhausted the resting order's `count`.
    pub resting_removed: bool,
}

/// True if an incoming order on `side` at `incoming_price` crosses a
/// resting order at `resting_price` on the opposite side.
fn crosses(side: Side, incoming_price: u64, resting_price: u64) -> bool {
    match side {
        Side::Buy => resting_price <= incoming_price,
        Side::Sell => resting_price >= incoming_price,
    }
}

/// Attempts one match of an incoming order (`side`, `incoming_price`,
/// `remaining` quantity still unfilled) against `opposite`'s best resting
/// order. Returns `None` (no mutation) if `opposite` is empty or its best
/// price doesn't cross. Otherwise trades `min(head.count, remaining)`
/// units at the resting price: decrements the head's `count`, removes it
/// if it reaches zero, or else bumps its `execution_counter`.
pub fn step(opposite: &mut SideQueue, side: Side, incoming_price: u64, remaining: u64) -> Option<MatchStep> {
    debug_assert!(remaining > 0);
    let resting_side = side.opposite();
    let best_price = opposite.best_price(resting_side)?;
    if !crosses(side, incoming_price, best_price) {
        return None;
    }
    let front = opposite.front_mut(resting_side).expect("best_price implies a front order");
    let resting_id = front.id;
    let execution_counter = front.execution_counter;
    let price = front.price;
    let count = front.count.min(remaining);
    front.count -= count;
    let resting_removed = front.count == 0;
    if resting_removed {
        opposite.pop_front(resting_side);
    } else {
        front.execution_counter += 1;
    }
    Some(MatchStep {
        resting_id,
        execution_counter,
        price,
        count,
        resting_removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;

    fn resting(id: u32, price: u64, count: u64) -> Order {
        Order {
            id: OrderId(id),
            price,
            count,
            execution_counter: 1,
            timestamp: id as u64,
        }
    }

    #[test]
    fn buy_crosses_sell_at_or_below_incoming_price() {
        let mut sells = SideQueue::new();
        sells.insert(resting(1, 100, 10));
        let m = step(&mut sells, Side::Buy, 100, 10).expect("should cross");
        assert_eq!(m.resting_id, OrderId(1));
        assert_eq!(m.count, 10);
        assert_eq!(m.price, 100);
        assert!(m.resting_removed);
        assert!(sells.is_empty());
    }

    #[test]
    fn buy_does_not_cross_sell_priced_above() {
        let mut sells = SideQueue::new();
        sells.insert(resting(1, 101, 10));
        assert!(step(&mut sells, Side::Buy, 100, 10).is_none());
    }

    #[test]
    fn partial_fill_keeps_resting_order_and_bumps_counter() {
        let mut sells = SideQueue::new();
        sells.insert(resting(1, 50, 10));
        let m = step(&mut sells, Side::Buy, 55, 7).expect("should cross");
        assert_eq!(m.count, 7);
        assert_eq!(m.execution_counter, 1);
        assert!(!m.resting_removed);
        let remaining = sells.front_mut(Side::Sell).unwrap();
        assert_eq!(remaining.count, 3);
        assert_eq!(remaining.execution_counter, 2);
    }

    #[test]
    fn sell_crosses_buy_at_or_above_incoming_price() {
        let mut buys = SideQueue::new();
        buys.insert(resting(1, 100, 10));
        let m = step(&mut buys, Side::Sell, 100, 10).expect("should cross");
        assert_eq!(m.price, 100);
        assert_eq!(m.count, 10);
    }

    #[test]
    fn empty_opposite_side_never_crosses() {
        let mut sells = SideQueue::new();
        assert!(step(&mut sells, Side::Buy, 1_000_000, 5).is_none());
    }
}
