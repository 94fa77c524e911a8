//! Authentication for gateway clients.
//!
//! Callers present a configured API key via `X-API-Key` or
//! `Authorization: Bearer`.

mod api_key;
mod middleware;

pub use api_key::*;
pub use middleware::*;
