//! Raw carrier rate response structures.
//!
//! Mirrors the carrier's rating JSON closely enough to pull out service
//! codes, charges and guaranteed transit days. Everything the normalizer
//! doesn't need is ignored.

use serde::Deserialize;

/// Top-level rating response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRateResponse {
    #[serde(default)]
    pub rate_response: Option<RateResponseBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RateResponseBody {
    #[serde(default)]
    pub rated_shipment: Option<OneOrMany<RatedShipment>>,
}

/// The carrier sends a bare object when there is exactly one element.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// One candidate rate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RatedShipment {
    pub service: ServiceRef,
    #[serde(default)]
    pub negotiated_rate_charges: Option<NegotiatedRateCharges>,
    #[serde(default)]
    pub total_charges: Option<Charge>,
    #[serde(default)]
    pub guaranteed_delivery: Option<GuaranteedDelivery>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRef {
    pub code: Scalar,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NegotiatedRateCharges {
    #[serde(default)]
    pub total_charge: Option<Charge>,
}

/// A monetary amount with its currency.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Charge {
    pub currency_code: String,
    pub monetary_value: Scalar,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GuaranteedDelivery {
    #[serde(default)]
    pub business_days_in_transit: Option<Scalar>,
}

/// A value the carrier may send either quoted or as a bare number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Text(s) => s.trim().to_string(),
            Scalar::Number(n) => n.to_string(),
        }
    }
}

impl RawRateResponse {
    /// Whether the body carries a `RateResponse.RatedShipment` element.
    pub fn is_well_formed(&self) -> bool {
        self.rate_response
            .as_ref()
            .is_some_and(|body| body.rated_shipment.is_some())
    }

    /// Rated shipments, or `None` when the body lacks the expected structure.
    pub fn rated_shipments(self) -> Option<Vec<RatedShipment>> {
        self.rate_response?
            .rated_shipment
            .map(OneOrMany::into_vec)
    }

    /// Combine rated shipments from several responses into one.
    pub fn merge(responses: impl IntoIterator<Item = RawRateResponse>) -> Self {
        let shipments: Vec<RatedShipment> = responses
            .into_iter()
            .filter_map(RawRateResponse::rated_shipments)
            .flatten()
            .collect();

        Self {
            rate_response: Some(RateResponseBody {
                rated_shipment: Some(OneOrMany::Many(shipments)),
            }),
        }
    }
}
