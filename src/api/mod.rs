//! HTTP API layer for the carrier gateway.
//!
//! Provides REST endpoints for rate quotes, shipment creation and
//! carrier authentication checks.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
