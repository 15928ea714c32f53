//! Event sink: the exchange's output contract.
//!
//! [`Event`] is emitted for every order rest, execution, and cancel attempt.
//! [`EventSink`] is the trait the core calls through — it never holds a lock
//! while calling it (see [`crate::book`]). Two implementations are provided:
//! one for real output, one for capturing events in tests.

use crate::types::{OrderId, Side};
use std::sync::{Arc, Mutex};

/// One exchange event: an order resting, a trade against a resting order, or
/// the result of a cancel attempt.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Event {
    /// An order rested on the book (in full or as the unfilled remainder of
    /// a partial cross).
    Added {
        id: OrderId,
        instrument: Arc<str>,
        price: u64,
        count: u64,
        side: Side,
        timestamp: u64,
    },
    /// A trade occurred against a resting order.
    Executed {
        resting_id: OrderId,
        incoming_id: OrderId,
        execution_counter: u64,
        price: u64,
        count: u64,
        timestamp: u64,
    },
    /// The result of a cancel attempt, successful or not.
    Deleted {
        id: OrderId,
        success: bool,
        timestamp: u64,
    },
}

/// Sink for exchange events. Implementations must be safe to call from any
/// connection's worker thread without external synchronization; the core
/// never holds a book or registry lock while calling `emit`.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Writes one JSON line per event to stdout.
pub struct StdoutEventSink;

impl EventSink for StdoutEventSink {
    fn emit(&self, event: Event) {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{}", line),
            Err(_) => {}
        }
    }
}

/// In-memory sink that records events in submission order. Clone shares the
/// same backing buffer; intended for tests.
#[derive(Clone)]
pub struct InMemoryEventSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("lock").clone()
    }

    pub fn clear(&self) {
        self.events.lock().expect("lock").clear();
    }
}

impl Default for InMemoryEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for InMemoryEventSink {
    fn emit(&self, event: Event) {
        self.events.lock().expect("lock").push(event);
    }
}
