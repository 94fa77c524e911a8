//! Domain types for the carrier gateway.
//!
//! This module contains the shipment request, normalized rate quotes
//! and the service-name lookup tables.

mod rate;
mod service;
mod shipment;

pub use rate::*;
pub use service::*;
pub use shipment::*;
