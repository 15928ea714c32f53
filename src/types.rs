//! Core types for the matching core (charter data models).
//!
//! [`Order`] is a resting limit order; [`Side`] and [`Command`] carry the
//! framed input a `CommandSource` yields (see [`crate::connection`]).

/// Unique order identifier, assigned by the input source and assumed
/// globally unique across connections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OrderId(pub u32);

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side that this side matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// A resting limit order on one side of one instrument's book.
///
/// Invariant: `count > 0` for any order present in a queue. `execution_counter`
/// starts at 1 and is incremented on each partial fill against this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub price: u64,
    pub count: u64,
    pub execution_counter: u64,
    pub timestamp: u64,
}

/// A framed input command, as yielded by `CommandSource::read_next`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Command {
    Buy {
        id: OrderId,
        instrument: String,
        price: u64,
        count: u64,
    },
    Sell {
        id: OrderId,
        instrument: String,
        price: u64,
        count: u64,
    },
    Cancel {
        id: OrderId,
    },
}

impl Command {
    pub fn order_id(&self) -> OrderId {
        match self {
            Command::Buy { id, .. } | Command::Sell { id, .. } | Command::Cancel { id } => *id,
        }
    }
}
