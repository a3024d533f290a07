//! Handle Pool Module
//!
//! Gives each concurrent worker its own connection handle through a
//! checkout/checkin discipline.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::store::{ConnectionHandle, StoreConnection};

// == Handle Pool ==
/// Idle connection handles waiting for a worker.
///
/// A checked-out handle belongs to exactly one worker until its guard drops.
/// The idle-list lock is only held to pop or push, never across store I/O.
#[derive(Debug)]
pub struct HandlePool<C> {
    idle: Mutex<Vec<ConnectionHandle<C>>>,
    max_idle: usize,
    next_id: AtomicUsize,
}

impl<C: StoreConnection> HandlePool<C> {
    // == Constructor ==
    /// Creates an empty pool keeping at most `max_idle` handles between uses.
    pub fn new(max_idle: usize) -> Self {
        let max_idle = max_idle.max(1);
        Self {
            idle: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
            next_id: AtomicUsize::new(0),
        }
    }

    // == Checkout ==
    /// Takes an idle handle, or creates an uninitialized one if none is idle.
    ///
    /// Never blocks on other workers.
    pub fn checkout(&self) -> PooledHandle<'_, C> {
        let handle = self.lock().pop().unwrap_or_else(|| {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            debug!(handle = id, "created connection handle");
            ConnectionHandle::new(id)
        });

        PooledHandle {
            pool: self,
            handle: Some(handle),
        }
    }

    /// Number of handles currently idle.
    pub fn idle_count(&self) -> usize {
        self.lock().len()
    }

    pub fn max_idle(&self) -> usize {
        self.max_idle
    }

    fn checkin(&self, handle: ConnectionHandle<C>) {
        let mut idle = self.lock();
        if idle.len() < self.max_idle {
            idle.push(handle);
        } else {
            debug!(handle = handle.id(), "dropping surplus connection handle");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ConnectionHandle<C>>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// == Pooled Handle ==
/// A checked-out handle; returns itself to the pool on drop.
pub struct PooledHandle<'a, C: StoreConnection> {
    pool: &'a HandlePool<C>,
    handle: Option<ConnectionHandle<C>>,
}

impl<C: StoreConnection> Deref for PooledHandle<'_, C> {
    type Target = ConnectionHandle<C>;

    fn deref(&self) -> &Self::Target {
        self.handle.as_ref().expect("handle is present until drop")
    }
}

impl<C: StoreConnection> DerefMut for PooledHandle<'_, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.handle.as_mut().expect("handle is present until drop")
    }
}

impl<C: StoreConnection> Drop for PooledHandle<'_, C> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.pool.checkin(handle);
        }
    }
}
