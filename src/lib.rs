//! Mini KV - A write-through key-value cache server
//!
//! Serves integer-keyed string values from an in-memory LRU cache kept
//! coherent with a durable SQLite store that owns every write.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use api::AppState;
pub use config::Config;
pub use service::KvService;
