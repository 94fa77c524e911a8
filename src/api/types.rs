//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AggregatedRates, FormField, RateQuote, ShipmentLabel, ShipmentRequest};

// ==================== Rates ====================

/// Rates for a shipment, cheapest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct RatesResponse {
    /// Quotes sorted ascending by total charges.
    pub rates: Vec<RateQuote>,
    /// The submitted form data, for re-rendering the form.
    pub form_data: ShipmentRequest,
    /// Set when ground-saver rates could not be fully retrieved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

impl From<AggregatedRates> for RatesResponse {
    fn from(aggregated: AggregatedRates) -> Self {
        Self {
            rates: aggregated.rates,
            form_data: aggregated.request,
            degraded: aggregated.degraded,
        }
    }
}

// ==================== Shipments ====================

/// Shipment form description.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentFormResponse {
    pub fields: Vec<FormField>,
}

/// Response after creating a shipment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateShipmentResponse {
    #[serde(flatten)]
    pub label: ShipmentLabel,
}

// ==================== Carrier auth ====================

/// Carrier token check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// "ok" when the carrier issued a token.
    pub status: String,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Timestamp.
    pub timestamp: String,
}
