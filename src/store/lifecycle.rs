//! Connection Lifecycle Module
//!
//! One worker's connection handle: opened lazily, probed once it goes stale,
//! and replaced when the probe fails.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::store::{Connector, StoreConnection};

// == Public Constants ==
/// How long a verified connection is trusted before the next probe
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(5);

// == Connection State ==
/// Observable state of a [`ConnectionHandle`] between acquisitions.
///
/// A dead connection is never kept: a failed probe immediately drops it and
/// either reopens (back to `Live`) or leaves the handle `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection; the next acquisition opens one
    Uninitialized,
    /// A connection that was live when last verified
    Live,
}

// == Connection Handle ==
/// A worker-owned store connection plus its last-verified timestamp.
#[derive(Debug)]
pub struct ConnectionHandle<C> {
    id: usize,
    conn: Option<C>,
    last_verified: Option<Instant>,
    connects: u64,
}

impl<C: StoreConnection> ConnectionHandle<C> {
    // == Constructor ==
    /// Creates an uninitialized handle. Nothing is opened until [`acquire`].
    ///
    /// [`acquire`]: ConnectionHandle::acquire
    pub fn new(id: usize) -> Self {
        Self {
            id,
            conn: None,
            last_verified: None,
            connects: 0,
        }
    }

    // == Acquire ==
    /// Returns a usable connection, or `None` if the store is unreachable.
    ///
    /// - No connection: open one.
    /// - Verified less than `ping_interval` ago: reuse without probing.
    /// - Otherwise: probe; on failure drop the connection and reopen.
    ///
    /// A `None` only fails the current call; the next acquisition starts over.
    pub fn acquire<K>(&mut self, connector: &K, ping_interval: Duration) -> Option<&mut C>
    where
        K: Connector<Conn = C>,
    {
        let now = Instant::now();

        match self.conn.take() {
            None => self.open(connector, now),
            Some(conn) if !self.is_due(now, ping_interval) => self.conn = Some(conn),
            Some(mut conn) => match conn.ping() {
                Ok(()) => {
                    debug!(handle = self.id, "liveness probe succeeded");
                    self.last_verified = Some(now);
                    self.conn = Some(conn);
                }
                Err(err) => {
                    warn!(handle = self.id, error = %err, "liveness probe failed, reconnecting");
                    drop(conn);
                    self.open(connector, now);
                }
            },
        }

        self.conn.as_mut()
    }

    // == Mark Suspect ==
    /// Forces a probe on the next acquisition, regardless of the clock.
    ///
    /// Called after an operation on this connection failed.
    pub fn mark_suspect(&mut self) {
        self.last_verified = None;
    }

    // == State ==
    pub fn state(&self) -> ConnectionState {
        match self.conn {
            Some(_) => ConnectionState::Live,
            None => ConnectionState::Uninitialized,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of connections this handle has successfully opened.
    pub fn connects(&self) -> u64 {
        self.connects
    }

    fn is_due(&self, now: Instant, ping_interval: Duration) -> bool {
        match self.last_verified {
            Some(at) => now.saturating_duration_since(at) >= ping_interval,
            None => true,
        }
    }

    fn open<K>(&mut self, connector: &K, now: Instant)
    where
        K: Connector<Conn = C>,
    {
        match connector.connect() {
            Ok(conn) => {
                self.connects += 1;
                info!(
                    handle = self.id,
                    target = %connector.target(),
                    reconnect = self.connects > 1,
                    "store connection opened"
                );
                self.conn = Some(conn);
                self.last_verified = Some(now);
            }
            Err(err) => {
                warn!(
                    handle = self.id,
                    target = %connector.target(),
                    error = %err,
                    "store connection unavailable"
                );
                self.conn = None;
                self.last_verified = None;
            }
        }
    }
}
