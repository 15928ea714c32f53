//! Instrument registry: lazy, concurrency-safe lookup by name.
//!
//! A hand-over-hand-locked singly linked list with a dummy head node whose
//! sentinel name no real instrument can have. A lookup walks the chain,
//! comparing each node's immutable name (no lock needed — it never changes
//! after construction) and only taking that node's own mutex to read or
//! install its successor. This keeps lookups for distinct names from ever
//! serializing on one global lock, at the cost of an O(n) walk for the nth
//! distinct instrument referenced — a deliberate trade for the simpler
//! chain over an O(1) concurrent map.

use crate::book::InstrumentBook;
use std::sync::{Arc, Mutex};

const SENTINEL_NAME: &str = "";

struct Node {
    name: Arc<str>,
    book: Arc<InstrumentBook>,
    next: Mutex<Option<Arc<Node>>>,
}

impl Node {
    fn new(name: Arc<str>) -> Self {
        let book = Arc::new(InstrumentBook::new(Arc::clone(&name)));
        Self {
            name,
            book,
            next: Mutex::new(None),
        }
    }
}

/// Maps instrument name to instrument book, creating entries on first
/// reference. Entries are never removed; a handed-out `Arc<InstrumentBook>`
/// is valid for the process's lifetime.
pub struct InstrumentRegistry {
    head: Arc<Node>,
}

impl InstrumentRegistry {
    pub fn new() -> Self {
        Self {
            head: Arc::new(Node::new(Arc::from(SENTINEL_NAME))),
        }
    }

    /// Returns the book for `name`, creating it if this is the first
    /// reference. Concurrent calls with the same name return the same
    /// book; calls for distinct names make progress independently.
    pub fn get_or_create(&self, name: &str) -> Arc<InstrumentBook> {
        debug_assert!(name != SENTINEL_NAME, "instrument names must be non-empty");
        let mut curr = Arc::clone(&self.head);
        loop {
            if curr.name.as_ref() == name {
                return Arc::clone(&curr.book);
            }
            let mut next_guard = curr.next.lock().expect("registry node mutex poisoned");
            match next_guard.as_ref() {
                Some(next) => {
                    let next = Arc::clone(next);
                    drop(next_guard);
                    curr = next;
                }
                None => {
                    let new_node = Arc::new(Node::new(Arc::from(name)));
                    let book = Arc::clone(&new_node.book);
                    *next_guard = Some(new_node);
                    return book;
                }
            }
        }
    }
}

impl Default for InstrumentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InMemoryEventSink;
    use crate::timestamp::ManualTimestampSource;
    use crate::types::{OrderId, Side};
    use std::sync::Arc as StdArc;
    use std::thread;

    #[test]
    fn same_name_returns_same_book() {
        let registry = InstrumentRegistry::new();
        let a = registry.get_or_create("GOOG");
        let b = registry.get_or_create("GOOG");
        assert!(StdArc::ptr_eq(&a, &b));
    }

    #[test]
    fn distinct_names_get_distinct_books() {
        let registry = InstrumentRegistry::new();
        let a = registry.get_or_create("GOOG");
        let b = registry.get_or_create("IBM");
        assert!(!StdArc::ptr_eq(&a, &b));
        assert_eq!(a.name().as_ref(), "GOOG");
        assert_eq!(b.name().as_ref(), "IBM");
    }

    #[test]
    fn concurrent_lookups_of_same_name_converge_on_one_book() {
        let registry = StdArc::new(InstrumentRegistry::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = StdArc::clone(&registry);
                thread::spawn(move || registry.get_or_create("AAPL"))
            })
            .collect();
        let books: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for book in &books[1..] {
            assert!(StdArc::ptr_eq(&books[0], book));
        }
    }

    #[test]
    fn instruments_do_not_share_queues() {
        let registry = InstrumentRegistry::new();
        let ts = ManualTimestampSource::starting_at(1);
        let sink = InMemoryEventSink::new();
        let goog = registry.get_or_create("GOOG");
        let ibm = registry.get_or_create("IBM");
        goog.submit_buy(OrderId(1), 100, 5, &ts, &sink);
        assert!(ibm.snapshot(Side::Buy).is_empty());
    }
}
