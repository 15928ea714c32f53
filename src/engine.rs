//! Top-level engine: owns the instrument registry and accepts connections.
//!
//! One OS thread per connection, no central scheduler. This supplies the
//! thread-per-connection execution model the matching core runs under, but
//! does not open sockets or frame bytes itself; that remains an external
//! collaborator's job.

use crate::connection::{CommandSource, ConnectionHandler};
use crate::event::EventSink;
use crate::registry::InstrumentRegistry;
use crate::timestamp::TimestampSource;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Owns the process-wide instrument registry and the shared event sink and
/// timestamp source every instrument book uses. Construct once, then call
/// [`Engine::accept`] once per incoming connection.
pub struct Engine {
    registry: InstrumentRegistry,
    sink: Arc<dyn EventSink>,
    timestamp: Arc<dyn TimestampSource>,
}

impl Engine {
    pub fn new(sink: Arc<dyn EventSink>, timestamp: Arc<dyn TimestampSource>) -> Self {
        Self {
            registry: InstrumentRegistry::new(),
            sink,
            timestamp,
        }
    }

    /// Spawns a worker thread that runs a [`ConnectionHandler`] over
    /// `source` until end-of-stream or a read error. Unlike the original
    /// C++, which detaches the thread immediately, this returns the
    /// `JoinHandle` so callers (and tests) can choose to wait for it;
    /// dropping the handle without joining has the same effect as the
    /// original's detach.
    pub fn accept<S>(self: &Arc<Self>, source: S) -> JoinHandle<()>
    where
        S: CommandSource + Send + 'static,
    {
        let engine = Arc::clone(self);
        thread::spawn(move || {
            let mut handler = ConnectionHandler::new(&engine.registry, engine.sink.as_ref(), engine.timestamp.as_ref());
            handler.run(source);
        })
    }

    pub fn registry(&self) -> &InstrumentRegistry {
        &self.registry
    }
}
