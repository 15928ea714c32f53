//! Per-connection command loop and cancel-ownership table.
//!
//! Reads a framed command, resolves its instrument in the registry,
//! dispatches, and tracks which order ids this connection is allowed to
//! cancel. [`CommandSource`] is the one external collaborator left as a
//! contract — framing and reading bytes off a real connection is out of
//! scope for the core.

use crate::book::InstrumentBook;
use crate::event::{Event, EventSink};
use crate::registry::InstrumentRegistry;
use crate::timestamp::TimestampSource;
use crate::types::{Command, OrderId, Side};
use log::warn;
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of reading the next framed command from a connection.
pub enum ReadOutcome {
    Success(Command),
    EndOfFile,
    Error(String),
}

/// External collaborator: yields the framed commands for one connection.
/// Implementations own the actual I/O (socket, file, generator); the core
/// only calls `read_next`.
pub trait CommandSource {
    fn read_next(&mut self) -> ReadOutcome;
}

/// Runs one connection's command loop against a shared [`InstrumentRegistry`].
///
/// Owns the per-connection mapping from order id to (instrument, side) used
/// to validate cancels: an order is recorded here only once it actually
/// rests, and erased on successful cancel. An id submitted on one
/// connection is never cancellable from another `ConnectionHandler`.
pub struct ConnectionHandler<'a> {
    registry: &'a InstrumentRegistry,
    sink: &'a dyn EventSink,
    timestamp: &'a dyn TimestampSource,
    owned: HashMap<OrderId, (Arc<str>, Side)>,
}

impl<'a> ConnectionHandler<'a> {
    pub fn new(registry: &'a InstrumentRegistry, sink: &'a dyn EventSink, timestamp: &'a dyn TimestampSource) -> Self {
        Self {
            registry,
            sink,
            timestamp,
            owned: HashMap::new(),
        }
    }

    /// Drives `source` to completion: reads commands until end-of-stream or
    /// a read error, dispatching each one. A read error is logged once and
    /// ends only this connection's loop.
    pub fn run(&mut self, mut source: impl CommandSource) {
        loop {
            match source.read_next() {
                ReadOutcome::Success(cmd) => self.dispatch(cmd),
                ReadOutcome::EndOfFile => return,
                ReadOutcome::Error(message) => {
                    warn!("error reading input: {}", message);
                    return;
                }
            }
        }
    }

    fn dispatch(&mut self, cmd: Command) {
        match cmd {
            Command::Cancel { id } => self.handle_cancel(id),
            Command::Buy { id, instrument, price, count } => {
                self.handle_order(Side::Buy, id, instrument, price, count)
            }
            Command::Sell { id, instrument, price, count } => {
                self.handle_order(Side::Sell, id, instrument, price, count)
            }
        }
    }

    fn handle_cancel(&mut self, id: OrderId) {
        let owner = self.owned.get(&id).cloned();
        let success = match owner {
            Some((instrument, side)) => self.book_for(&instrument).cancel(id, side),
            None => false,
        };
        self.sink.emit(Event::Deleted {
            id,
            success,
            timestamp: self.timestamp.now(),
        });
        if success {
            self.owned.remove(&id);
        }
    }

    fn handle_order(&mut self, side: Side, id: OrderId, instrument: String, price: u64, count: u64) {
        let instrument: Arc<str> = Arc::from(instrument);
        let book = self.book_for(&instrument);
        let rested = match side {
            Side::Buy => book.submit_buy(id, price, count, self.timestamp, self.sink),
            Side::Sell => book.submit_sell(id, price, count, self.timestamp, self.sink),
        };
        if rested {
            self.owned.insert(id, (instrument, side));
        }
    }

    fn book_for(&self, instrument: &str) -> Arc<InstrumentBook> {
        self.registry.get_or_create(instrument)
    }
}
