//! Carrier API integration.
//!
//! The [`CarrierClient`] talks to the carrier's REST API and implements
//! both rate sources used by the aggregator as well as token acquisition
//! and shipment creation.

mod client;
mod payload;

pub use client::*;

use async_trait::async_trait;

use crate::domain::{ShipmentLabel, ShipmentRequest};
use crate::error::GatewayResult;

/// Obtains an access token from the carrier.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> GatewayResult<String>;
}

/// Creates a shipment and returns its label.
#[async_trait]
pub trait ShipmentCreator: Send + Sync {
    async fn create_shipment(&self, request: &ShipmentRequest) -> GatewayResult<ShipmentLabel>;
}
