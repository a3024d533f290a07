//! Store Transport Traits
//!
//! The seam between the connection lifecycle manager and a concrete backend.

use crate::error::StoreError;

// == Store Connection ==
/// A single open connection to the durable store.
///
/// Methods take `&mut self`: a connection is owned by exactly one worker at a
/// time and is never shared.
pub trait StoreConnection: Send + 'static {
    /// Cheap round-trip used only to confirm the connection still works.
    fn ping(&mut self) -> Result<(), StoreError>;

    /// Inserts `key` or overwrites its existing value.
    fn upsert(&mut self, key: i64, value: &str) -> Result<(), StoreError>;

    /// Returns the value stored for `key`, if any.
    fn read(&mut self, key: i64) -> Result<Option<String>, StoreError>;

    /// Removes `key`, returning whether a record existed.
    fn delete(&mut self, key: i64) -> Result<bool, StoreError>;
}

// == Connector ==
/// Opens new connections to one store target.
pub trait Connector: Send + Sync + 'static {
    type Conn: StoreConnection;

    fn connect(&self) -> Result<Self::Conn, StoreError>;

    /// Human-readable target, for logs.
    fn target(&self) -> String;
}
