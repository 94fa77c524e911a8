//! Rate Aggregator - merges quotes from the primary and secondary sources.
//!
//! The primary source is authoritative: if it fails, nothing is returned.
//! The secondary source is best-effort: any failure there shrinks the
//! result and is reported through [`AggregatedRates::degraded`].

use crate::domain::{AggregatedRates, RateQuote, ServiceNameTable, ShipmentRequest};
use crate::engine::normalize::normalize_all;
use crate::engine::{GroundSaverRates, PrimaryRateSource, SecondaryRateSource};
use crate::error::{GatewayError, GatewayResult};

/// Secondary quotes together with the reason some were lost, if any.
#[derive(Debug, Default)]
struct SecondaryOutcome {
    quotes: Vec<RateQuote>,
    degraded: Option<String>,
}

/// Aggregates rates from two quote sources into one price-ordered list.
pub struct RateAggregator {
    primary: Box<dyn PrimaryRateSource>,
    secondary: Box<dyn SecondaryRateSource>,
    secondary_names: ServiceNameTable,
}

impl RateAggregator {
    /// Create an aggregator using the ground-saver name table for secondary quotes.
    pub fn new(
        primary: Box<dyn PrimaryRateSource>,
        secondary: Box<dyn SecondaryRateSource>,
    ) -> Self {
        Self {
            primary,
            secondary,
            secondary_names: ServiceNameTable::ground_saver(),
        }
    }

    /// Fetch, normalize, merge and sort rates for `request`.
    ///
    /// Both sources are queried concurrently. The result is sorted ascending
    /// by `total_charges`; equal prices keep primary-before-secondary order.
    pub async fn aggregate(&self, request: ShipmentRequest) -> GatewayResult<AggregatedRates> {
        let (primary, secondary) = tokio::join!(
            self.primary.shop_rates(&request),
            self.secondary.ground_saver_rates(&request)
        );

        let mut rates = primary.inspect_err(|e| {
            tracing::debug!(error = %e, "Primary rate source failed");
        })?;
        let primary_count = rates.len();

        let secondary = self.normalize_secondary(secondary);
        let secondary_count = secondary.quotes.len();

        rates.extend(secondary.quotes);
        sort_by_price(&mut rates);

        tracing::info!(
            primary = primary_count,
            secondary = secondary_count,
            total = rates.len(),
            degraded = secondary.degraded.is_some(),
            "Rates aggregated"
        );

        Ok(AggregatedRates {
            rates,
            request,
            degraded: secondary.degraded,
        })
    }

    fn normalize_secondary(
        &self,
        result: GatewayResult<Option<GroundSaverRates>>,
    ) -> SecondaryOutcome {
        let rates = match result {
            Ok(Some(rates)) => rates,
            Ok(None) => return SecondaryOutcome::default(),
            Err(e) => return degraded_outcome(Vec::new(), vec![e.to_string()]),
        };

        let mut reasons: Vec<String> = rates.failure.iter().map(ToString::to_string).collect();

        let Some(shipments) = rates.response.rated_shipments() else {
            let e = GatewayError::MalformedResponse(
                "ground saver response has no RatedShipment".to_string(),
            );
            reasons.push(e.to_string());
            return degraded_outcome(Vec::new(), reasons);
        };

        let normalized = normalize_all(&shipments, &self.secondary_names);
        if !normalized.rejected.is_empty() {
            let rejected: Vec<String> =
                normalized.rejected.iter().map(ToString::to_string).collect();
            let e = GatewayError::MalformedResponse(format!(
                "{} ground saver rate(s) unreadable: {}",
                rejected.len(),
                rejected.join("; ")
            ));
            reasons.push(e.to_string());
        }

        if reasons.is_empty() {
            return SecondaryOutcome {
                quotes: normalized.quotes,
                degraded: None,
            };
        }
        degraded_outcome(normalized.quotes, reasons)
    }
}

fn degraded_outcome(quotes: Vec<RateQuote>, reasons: Vec<String>) -> SecondaryOutcome {
    let reason = reasons.join("; ");
    tracing::warn!(reason = %reason, kept = quotes.len(), "Ground saver rates degraded");
    SecondaryOutcome {
        quotes,
        degraded: Some(reason),
    }
}

/// Stable ascending sort on the numeric price.
pub fn sort_by_price(rates: &mut [RateQuote]) {
    rates.sort_by(|a, b| a.total_charges.cmp(&b.total_charges));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceSource;
    use crate::engine::raw::RawRateResponse;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    struct FixedPrimary(GatewayResult<Vec<RateQuote>>);

    #[async_trait]
    impl PrimaryRateSource for FixedPrimary {
        async fn shop_rates(&self, _request: &ShipmentRequest) -> GatewayResult<Vec<RateQuote>> {
            match &self.0 {
                Ok(rates) => Ok(rates.clone()),
                Err(e) => Err(GatewayError::Transport(e.to_string())),
            }
        }
    }

    enum FixedSecondary {
        Raw(serde_json::Value),
        Partial(serde_json::Value),
        NoMatch,
        Fail,
    }

    fn raw(value: &serde_json::Value) -> RawRateResponse {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    #[async_trait]
    impl SecondaryRateSource for FixedSecondary {
        async fn ground_saver_rates(
            &self,
            _request: &ShipmentRequest,
        ) -> GatewayResult<Option<GroundSaverRates>> {
            match self {
                FixedSecondary::Raw(value) => Ok(Some(raw(value).into())),
                FixedSecondary::Partial(value) => Ok(Some(GroundSaverRates {
                    response: raw(value),
                    failure: Some(GatewayError::Transport(
                        "carrier returned 503 Service Unavailable".to_string(),
                    )),
                })),
                FixedSecondary::NoMatch => Ok(None),
                FixedSecondary::Fail => Err(GatewayError::Auth("token rejected".to_string())),
            }
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn quote(code: &str, price: &str) -> RateQuote {
        RateQuote::new(
            code,
            ServiceNameTable::standard().resolve(code),
            PriceSource::Published {
                value: dec(price),
                currency: "USD".to_string(),
            },
            Some(3),
        )
    }

    fn ground_saver(code: &str, published: &str) -> serde_json::Value {
        json!({
            "Service": { "Code": code },
            "TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": published }
        })
    }

    fn rated(shipments: Vec<serde_json::Value>) -> FixedSecondary {
        FixedSecondary::Raw(json!({ "RateResponse": { "RatedShipment": shipments } }))
    }

    fn aggregator(primary: Vec<RateQuote>, secondary: FixedSecondary) -> RateAggregator {
        RateAggregator::new(Box::new(FixedPrimary(Ok(primary))), Box::new(secondary))
    }

    fn request() -> ShipmentRequest {
        ShipmentRequest::from(json!({ "shipper_postal_code": "30301", "weight": "2" }))
    }

    #[tokio::test]
    async fn test_merges_and_sorts_by_price() {
        let agg = aggregator(vec![quote("03", "20")], rated(vec![ground_saver("93", "15")]));

        let result = agg.aggregate(request()).await.unwrap();
        let prices: Vec<Decimal> = result.rates.iter().map(|r| r.total_charges).collect();
        assert_eq!(prices, vec![dec("15"), dec("20")]);
        assert_eq!(result.cheapest().unwrap().service, "Ground Saver");
        assert!(!result.is_degraded());
    }

    #[tokio::test]
    async fn test_numeric_not_lexicographic_order() {
        let agg = aggregator(
            vec![quote("01", "100.00"), quote("03", "9.00")],
            rated(vec![ground_saver("93", "10.00")]),
        );

        let result = agg.aggregate(request()).await.unwrap();
        let prices: Vec<Decimal> = result.rates.iter().map(|r| r.total_charges).collect();
        assert_eq!(prices, vec![dec("9.00"), dec("10.00"), dec("100.00")]);
        assert!(result.rates.windows(2).all(|w| w[0].total_charges <= w[1].total_charges));
    }

    #[tokio::test]
    async fn test_equal_prices_keep_insertion_order() {
        let agg = aggregator(
            vec![quote("03", "12.00"), quote("12", "12.00")],
            rated(vec![ground_saver("93", "12"), ground_saver("92", "12.0")]),
        );

        let result = agg.aggregate(request()).await.unwrap();
        let codes: Vec<&str> = result.rates.iter().map(|r| r.service_code.as_str()).collect();
        assert_eq!(codes, vec!["03", "12", "93", "92"]);
    }

    #[tokio::test]
    async fn test_negotiated_ground_saver() {
        let agg = aggregator(
            vec![],
            rated(vec![json!({
                "Service": { "Code": "93" },
                "NegotiatedRateCharges": {
                    "TotalCharge": { "CurrencyCode": "USD", "MonetaryValue": "10.50" }
                },
                "TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "12.00" }
            })]),
        );

        let result = agg.aggregate(request()).await.unwrap();
        assert_eq!(result.rates.len(), 1);
        let rate = &result.rates[0];
        assert_eq!(rate.total_charges, dec("10.50"));
        assert_eq!(rate.currency, "USD");
        assert_eq!(rate.service, "Ground Saver");
        assert_eq!(rate.delivery_days, None);
    }

    #[tokio::test]
    async fn test_no_match_secondary_is_not_degraded() {
        let primary = vec![quote("03", "11.00")];
        let agg = aggregator(primary.clone(), FixedSecondary::NoMatch);

        let result = agg.aggregate(request()).await.unwrap();
        assert_eq!(result.rates, primary);
        assert!(!result.is_degraded());
    }

    #[tokio::test]
    async fn test_failed_secondary_degrades() {
        let primary = vec![quote("03", "11.00")];
        let agg = aggregator(primary.clone(), FixedSecondary::Fail);

        let result = agg.aggregate(request()).await.unwrap();
        assert_eq!(result.rates, primary);
        assert!(result.degraded.unwrap().contains("authentication"));
    }

    #[tokio::test]
    async fn test_malformed_secondary_degrades() {
        let primary = vec![quote("03", "11.00")];
        let agg = aggregator(
            primary.clone(),
            FixedSecondary::Raw(json!({ "unexpected": true })),
        );

        let result = agg.aggregate(request()).await.unwrap();
        assert_eq!(result.rates, primary);
        assert!(result.is_degraded());
    }

    #[tokio::test]
    async fn test_unreadable_record_dropped_and_reported() {
        let agg = aggregator(
            vec![quote("03", "11.00")],
            rated(vec![ground_saver("93", "n/a"), ground_saver("92", "6.00")]),
        );

        let result = agg.aggregate(request()).await.unwrap();
        let codes: Vec<&str> = result.rates.iter().map(|r| r.service_code.as_str()).collect();
        assert_eq!(codes, vec!["92", "03"]);
        assert!(result.degraded.unwrap().contains("n/a"));
    }

    #[tokio::test]
    async fn test_partial_secondary_keeps_good_quotes() {
        let agg = aggregator(
            vec![quote("03", "11.00")],
            FixedSecondary::Partial(json!({
                "RateResponse": { "RatedShipment": [ground_saver("93", "9.40")] }
            })),
        );

        let result = agg.aggregate(request()).await.unwrap();
        let codes: Vec<&str> = result.rates.iter().map(|r| r.service_code.as_str()).collect();
        assert_eq!(codes, vec!["93", "03"]);
        assert!(result.degraded.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_primary_failure_aborts() {
        let agg = RateAggregator::new(
            Box::new(FixedPrimary(Err(GatewayError::Transport("timeout".to_string())))),
            Box::new(rated(vec![ground_saver("93", "15")])),
        );

        let err = agg.aggregate(request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[tokio::test]
    async fn test_request_is_echoed() {
        let agg = aggregator(vec![], FixedSecondary::NoMatch);
        let result = agg.aggregate(request()).await.unwrap();
        assert_eq!(result.request, request());
        assert!(result.rates.is_empty());
    }
}
