//! Rate quote domain types.
//!
//! A [`RateQuote`] is the normalized record produced from every quote
//! source. Quotes are built per request and never mutated afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ShipmentRequest;

/// A single normalized rate quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RateQuote {
    /// Carrier service identifier.
    pub service_code: String,
    /// Human-readable service name.
    pub service: String,
    /// Price in `currency` units.
    pub total_charges: Decimal,
    /// Currency code.
    pub currency: String,
    /// Guaranteed transit days; absent when delivery is not guaranteed.
    pub delivery_days: Option<u32>,
}

impl RateQuote {
    /// Build a quote whose price and currency come from one [`PriceSource`].
    pub fn new(
        service_code: impl Into<String>,
        service: impl Into<String>,
        price: PriceSource,
        delivery_days: Option<u32>,
    ) -> Self {
        let (total_charges, currency) = price.into_parts();
        Self {
            service_code: service_code.into(),
            service: service.into(),
            total_charges,
            currency,
            delivery_days,
        }
    }
}

/// Where a quote's price was taken from.
///
/// Resolved once per raw carrier record; value and currency always travel
/// together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSource {
    /// Account-specific negotiated price.
    Negotiated { value: Decimal, currency: String },
    /// Public list price.
    Published { value: Decimal, currency: String },
}

impl PriceSource {
    pub fn value(&self) -> Decimal {
        match self {
            PriceSource::Negotiated { value, .. } | PriceSource::Published { value, .. } => *value,
        }
    }

    pub fn currency(&self) -> &str {
        match self {
            PriceSource::Negotiated { currency, .. } | PriceSource::Published { currency, .. } => {
                currency
            }
        }
    }

    pub fn is_negotiated(&self) -> bool {
        matches!(self, PriceSource::Negotiated { .. })
    }

    pub fn into_parts(self) -> (Decimal, String) {
        match self {
            PriceSource::Negotiated { value, currency }
            | PriceSource::Published { value, currency } => (value, currency),
        }
    }
}

/// Output of one rate aggregation.
#[derive(Debug, Clone)]
pub struct AggregatedRates {
    /// Quotes sorted ascending by `total_charges`.
    pub rates: Vec<RateQuote>,
    /// The request the rates were computed for.
    pub request: ShipmentRequest,
    /// Why the secondary source contributed fewer quotes than it could have.
    pub degraded: Option<String>,
}

impl AggregatedRates {
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    /// Cheapest quote, if any.
    pub fn cheapest(&self) -> Option<&RateQuote> {
        self.rates.first()
    }
}
