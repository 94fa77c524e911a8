//! Quote source traits consumed by the aggregator.

use async_trait::async_trait;

use crate::domain::{RateQuote, ShipmentRequest};
use crate::engine::raw::RawRateResponse;
use crate::error::{GatewayError, GatewayResult};

/// Source of already-normalized rates ("shop" rates).
#[async_trait]
pub trait PrimaryRateSource: Send + Sync {
    /// Fetch every service's rate for the shipment.
    async fn shop_rates(&self, request: &ShipmentRequest) -> GatewayResult<Vec<RateQuote>>;
}

/// Ground-saver rates from one lookup.
///
/// `failure` is set when some services could not be rated. The records in
/// `response` are still usable.
#[derive(Debug)]
pub struct GroundSaverRates {
    pub response: RawRateResponse,
    pub failure: Option<GatewayError>,
}

impl From<RawRateResponse> for GroundSaverRates {
    fn from(response: RawRateResponse) -> Self {
        Self {
            response,
            failure: None,
        }
    }
}

/// Source of raw ground-saver rates.
///
/// `Ok(None)` means the carrier has no ground-saver service for this
/// shipment, which is not a failure.
#[async_trait]
pub trait SecondaryRateSource: Send + Sync {
    async fn ground_saver_rates(
        &self,
        request: &ShipmentRequest,
    ) -> GatewayResult<Option<GroundSaverRates>>;
}
