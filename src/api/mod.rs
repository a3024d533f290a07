//! API Module
//!
//! HTTP handlers and routing for the key-value server.
//!
//! # Endpoints
//! - `POST /create` - Create or update a key
//! - `GET /read/:key` - Read a key
//! - `DELETE /delete/:key` - Delete a key
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
