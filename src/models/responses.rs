//! Response DTOs for the key-value server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the CREATE operation (POST /create)
#[derive(Debug, Clone, Serialize)]
pub struct CreateResponse {
    /// Success message
    pub message: String,
    /// The key that was written
    pub key: i64,
}

impl CreateResponse {
    pub fn new(key: i64) -> Self {
        Self {
            message: format!("Key '{}' created", key),
            key,
        }
    }
}

/// Response body for the READ operation (GET /read/:key)
#[derive(Debug, Clone, Serialize)]
pub struct ReadResponse {
    pub key: i64,
    pub value: String,
}

impl ReadResponse {
    pub fn new(key: i64, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Response body for the DELETE operation (DELETE /delete/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: i64,
}

impl DeleteResponse {
    pub fn new(key: i64) -> Self {
        Self {
            message: format!("Key '{}' deleted", key),
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of reads answered by the cache
    pub hits: u64,
    /// Number of reads that went to the store
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Cache capacity
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            capacity: stats.capacity,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when the store cannot be reached
    pub status: String,
    /// "reachable" or "unreachable"
    pub store: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a HealthResponse for the given store reachability
    pub fn new(store_reachable: bool) -> Self {
        let (status, store) = if store_reachable {
            ("healthy", "reachable")
        } else {
            ("degraded", "unreachable")
        };
        Self {
            status: status.to_string(),
            store: store.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
