//! HTTP surface for the record store
//!
//! This module provides a `ServerBuilder` that wires a store into:
//! - CRUD and list routes under `/v1/edtoys`
//! - A healthcheck at `/v1/healthcheck`

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_routes;
