//! Persistent Store Adapter
//!
//! Runs keyed upsert/read/delete against the durable store through a
//! worker-owned connection and folds every failure into a plain result.

use std::time::Duration;

use tracing::warn;

use crate::error::StoreError;
use crate::store::{Connector, HandlePool, StoreConnection};

// == Read Outcome ==
/// Three-way result of a store read.
///
/// [`StoreAdapter::read`] collapses `NotFound` and `Unavailable` into `None`;
/// callers that care about the difference use [`StoreAdapter::fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Found(String),
    NotFound,
    /// No connection could be obtained, or the query failed
    Unavailable,
}

impl ReadOutcome {
    pub fn into_value(self) -> Option<String> {
        match self {
            ReadOutcome::Found(value) => Some(value),
            ReadOutcome::NotFound | ReadOutcome::Unavailable => None,
        }
    }
}

// == Delete Outcome ==
/// Three-way result of a store delete.
///
/// [`StoreAdapter::delete`] collapses this to "was a record removed";
/// [`StoreAdapter::remove`] keeps an unreachable store apart from an absent
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// No connection could be obtained, or the statement failed
    Unavailable,
}

impl DeleteOutcome {
    pub fn is_deleted(self) -> bool {
        self == DeleteOutcome::Deleted
    }
}

// == Store Adapter ==
/// Durable store access for integer keys.
///
/// Never panics or propagates on store failure: writes report `false`, reads
/// report `None`.
pub struct StoreAdapter<K: Connector> {
    connector: K,
    pool: HandlePool<K::Conn>,
    ping_interval: Duration,
}

impl<K: Connector> StoreAdapter<K> {
    // == Constructor ==
    /// Creates an adapter keeping up to `workers` idle connection handles.
    pub fn new(connector: K, workers: usize, ping_interval: Duration) -> Self {
        Self {
            connector,
            pool: HandlePool::new(workers),
            ping_interval,
        }
    }

    // == Upsert ==
    /// Inserts or overwrites `key`. False if unavailable or the write failed.
    pub fn upsert(&self, key: i64, value: &str) -> bool {
        self.with_connection("upsert", key, |conn| conn.upsert(key, value))
            .is_ok()
    }

    // == Read ==
    /// Returns the stored value; store failures read as absent.
    pub fn read(&self, key: i64) -> Option<String> {
        self.fetch(key).into_value()
    }

    // == Fetch ==
    /// Like [`read`](Self::read) but keeps "absent" and "unreachable" apart.
    pub fn fetch(&self, key: i64) -> ReadOutcome {
        match self.with_connection("read", key, |conn| conn.read(key)) {
            Ok(Some(value)) => ReadOutcome::Found(value),
            Ok(None) => ReadOutcome::NotFound,
            Err(_) => ReadOutcome::Unavailable,
        }
    }

    // == Delete ==
    /// Removes `key`. True only if a record existed and was removed.
    pub fn delete(&self, key: i64) -> bool {
        self.remove(key).is_deleted()
    }

    // == Remove ==
    /// Like [`delete`](Self::delete) but keeps "absent" and "unreachable" apart.
    pub fn remove(&self, key: i64) -> DeleteOutcome {
        match self.with_connection("delete", key, |conn| conn.delete(key)) {
            Ok(true) => DeleteOutcome::Deleted,
            Ok(false) => DeleteOutcome::NotFound,
            Err(_) => DeleteOutcome::Unavailable,
        }
    }

    // == Ping ==
    /// Reports whether the store can currently be reached.
    pub fn ping(&self) -> bool {
        let mut handle = self.pool.checkout();
        let result = match handle.acquire(&self.connector, self.ping_interval) {
            Some(conn) => conn.ping(),
            None => return false,
        };

        if let Err(err) = result {
            warn!(handle = handle.id(), error = %err, "store ping failed");
            handle.mark_suspect();
            return false;
        }
        true
    }

    pub fn connector(&self) -> &K {
        &self.connector
    }

    pub fn ping_interval(&self) -> Duration {
        self.ping_interval
    }

    /// Runs `op` on this worker's connection.
    ///
    /// A failed operation marks the handle so the next acquisition probes it.
    fn with_connection<T, F>(&self, op: &'static str, key: i64, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut K::Conn) -> Result<T, StoreError>,
    {
        let mut handle = self.pool.checkout();

        let result = match handle.acquire(&self.connector, self.ping_interval) {
            Some(conn) => f(conn),
            None => Err(StoreError::Unavailable),
        };

        if let Err(err) = &result {
            warn!(op, key, handle = handle.id(), error = %err, "store operation failed");
            if !matches!(err, StoreError::Unavailable) {
                handle.mark_suspect();
            }
        }
        result
    }
}
