//! Store Module
//!
//! Durable store access: transport traits, the SQLite backend, per-worker
//! connection lifecycle management and the keyed adapter on top.

mod adapter;
mod connection;
mod lifecycle;
mod pool;
mod sqlite;

pub use adapter::{DeleteOutcome, ReadOutcome, StoreAdapter};
pub use connection::{Connector, StoreConnection};
pub use lifecycle::{ConnectionHandle, ConnectionState, DEFAULT_PING_INTERVAL};
pub use pool::{HandlePool, PooledHandle};
pub use sqlite::{SqliteConnection, SqliteConnector};
