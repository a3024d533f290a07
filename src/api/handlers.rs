//! API Handlers
//!
//! HTTP request handlers for each endpoint. Store I/O is blocking, so every
//! service call runs on tokio's blocking pool; each blocking worker checks out
//! its own store connection.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    parse_key_str, CreateRequest, CreateResponse, DeleteResponse, HealthResponse, ReadResponse,
    StatsResponse,
};
use crate::service::KvService;
use crate::store::{DeleteOutcome, SqliteConnector};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Write-through service over the cache and the store
    pub service: Arc<KvService<SqliteConnector>>,
}

impl AppState {
    /// Creates a new AppState around the given service.
    pub fn new(service: KvService<SqliteConnector>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(KvService::from_config(config))
    }
}

/// Runs a blocking closure on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))
}

fn path_key(raw: &str) -> Result<i64> {
    parse_key_str(raw).ok_or_else(|| ApiError::InvalidRequest(format!("Invalid key '{}'", raw)))
}

/// Handler for POST /create
///
/// Writes the pair to the store, then to the cache.
pub async fn create_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<Json<CreateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }
    let key = req
        .parse_key()
        .ok_or_else(|| ApiError::InvalidRequest("Invalid key (expected integer)".to_string()))?;
    let value = req.value_string();

    let service = Arc::clone(&state.service);
    let stored = run_blocking(move || service.create(key, value)).await?;

    if stored {
        Ok(Json(CreateResponse::new(key)))
    } else {
        Err(ApiError::Store(format!("Failed to store key {}", key)))
    }
}

/// Handler for GET /read/:key
///
/// Answers from the cache, falling back to the store.
pub async fn read_handler(
    State(state): State<AppState>,
    Path(raw_key): Path<String>,
) -> Result<Json<ReadResponse>> {
    let key = path_key(&raw_key)?;

    let service = Arc::clone(&state.service);
    let value = run_blocking(move || service.read(key)).await?;

    value
        .map(|value| Json(ReadResponse::new(key, value)))
        .ok_or_else(|| ApiError::NotFound(key.to_string()))
}

/// Handler for DELETE /delete/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(raw_key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let key = path_key(&raw_key)?;

    let service = Arc::clone(&state.service);
    let outcome = run_blocking(move || service.remove(key)).await?;

    match outcome {
        DeleteOutcome::Deleted => Ok(Json(DeleteResponse::new(key))),
        DeleteOutcome::NotFound => Err(ApiError::NotFound(key.to_string())),
        DeleteOutcome::Unavailable => {
            Err(ApiError::Store(format!("Failed to delete key {}", key)))
        }
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.service.stats()))
}

/// Handler for GET /health
///
/// Always 200; the body reports whether the store answered a probe.
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let service = Arc::clone(&state.service);
    let reachable = run_blocking(move || service.store().ping()).await?;
    Ok(Json(HealthResponse::new(reachable)))
}
