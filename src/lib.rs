//! # Continuous-double-auction matching core
//!
//! The matching core of a continuous-double-auction exchange: per-
//! instrument price-time priority matching plus the concurrency protocol
//! that coordinates concurrent buy/sell/cancel flows, both within one
//! instrument and across the instrument set built up lazily by concurrent
//! readers.
//!
//! ## Entry points
//!
//! [`Engine`] is the top-level handle: construct one with an [`EventSink`]
//! and a [`TimestampSource`], then call [`Engine::accept`] once per
//! incoming connection, supplying a [`CommandSource`] that yields that
//! connection's framed commands.
//!
//! ```rust
//! use cda_matching_core::{
//!     CommandSource, ConnectionHandler, Event, InMemoryEventSink, ManualTimestampSource,
//!     ReadOutcome, Command, OrderId, InstrumentRegistry,
//! };
//!
//! let registry = InstrumentRegistry::new();
//! let sink = InMemoryEventSink::new();
//! let ts = ManualTimestampSource::starting_at(1);
//! let mut handler = ConnectionHandler::new(&registry, &sink, &ts);
//!
//! struct OneShot(Option<Command>);
//! impl CommandSource for OneShot {
//!     fn read_next(&mut self) -> ReadOutcome {
//!         match self.0.take() {
//!             Some(cmd) => ReadOutcome::Success(cmd),
//!             None => ReadOutcome::EndOfFile,
//!         }
//!     }
//! }
//!
//! handler.run(OneShot(Some(Command::Buy {
//!     id: OrderId(1),
//!     instrument: "GOOG".into(),
//!     price: 100,
//!     count: 10,
//! })));
//! assert!(matches!(sink.events()[0], Event::Added { .. }));
//! ```
//!
//! For lower-level access — e.g. a custom transport that wants to own
//! threads itself rather than going through [`Engine::accept`] — use
//! [`InstrumentRegistry`] and [`ConnectionHandler`] directly, as the
//! example above does.

pub mod book;
pub mod connection;
pub mod engine;
pub mod event;
pub mod market_data_gen;
pub mod matching;
pub mod order_book;
pub mod registry;
pub mod timestamp;
pub mod types;

pub use book::InstrumentBook;
pub use connection::{CommandSource, ConnectionHandler, ReadOutcome};
pub use engine::Engine;
pub use event::{Event, EventSink, InMemoryEventSink, StdoutEventSink};
pub use market_data_gen::{replay, Generator, GeneratorConfig, GeneratorSource};
pub use registry::InstrumentRegistry;
pub use timestamp::{ManualTimestampSource, MonotonicTimestampSource, TimestampSource};
pub use types::{Command, Order, OrderId, Side};
