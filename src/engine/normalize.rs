//! Normalization of raw carrier rates into [`RateQuote`]s.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{PriceSource, RateQuote, ServiceNameTable};
use crate::engine::raw::{Charge, RatedShipment};

/// Why a raw rated shipment could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("service {code}: no price block")]
    MissingPrice { code: String },

    #[error("service {code}: invalid amount '{value}'")]
    InvalidAmount { code: String, value: String },
}

/// Quotes that normalized cleanly plus the records that did not.
#[derive(Debug, Default)]
pub struct Normalized {
    pub quotes: Vec<RateQuote>,
    pub rejected: Vec<NormalizeError>,
}

/// Pick the price for a rated shipment.
///
/// A negotiated total wins outright; otherwise the published total is used.
/// Fields are never mixed between the two blocks.
pub fn resolve_price(shipment: &RatedShipment) -> Result<PriceSource, NormalizeError> {
    let code = shipment.service.code.as_text();

    let negotiated = shipment
        .negotiated_rate_charges
        .as_ref()
        .and_then(|n| n.total_charge.as_ref());

    match (negotiated, &shipment.total_charges) {
        (Some(charge), _) => {
            let (value, currency) = parse_charge(&code, charge)?;
            Ok(PriceSource::Negotiated { value, currency })
        }
        (None, Some(charge)) => {
            let (value, currency) = parse_charge(&code, charge)?;
            Ok(PriceSource::Published { value, currency })
        }
        (None, None) => Err(NormalizeError::MissingPrice { code }),
    }
}

fn parse_charge(code: &str, charge: &Charge) -> Result<(Decimal, String), NormalizeError> {
    let raw = charge.monetary_value.as_text();
    let value = Decimal::from_str(&raw).map_err(|_| NormalizeError::InvalidAmount {
        code: code.to_string(),
        value: raw.clone(),
    })?;
    Ok((value, charge.currency_code.trim().to_string()))
}

/// Guaranteed transit days, `None` when delivery is not guaranteed.
///
/// Whole numbers written as decimals ("1.0") are accepted. Anything else is
/// logged and treated as not guaranteed.
pub fn delivery_days(shipment: &RatedShipment) -> Option<u32> {
    let days = shipment
        .guaranteed_delivery
        .as_ref()?
        .business_days_in_transit
        .as_ref()?;

    let raw = days.as_text();
    let parsed = Decimal::from_str(raw.trim())
        .ok()
        .filter(|d| d.fract().is_zero())
        .and_then(|d| d.to_u32());

    if parsed.is_none() {
        tracing::warn!(
            service_code = %shipment.service.code.as_text(),
            value = %raw,
            "Ignoring unreadable transit days"
        );
    }
    parsed
}

/// Normalize a single rated shipment using `names` for the display name.
pub fn normalize_shipment(
    shipment: &RatedShipment,
    names: &ServiceNameTable,
) -> Result<RateQuote, NormalizeError> {
    let code = shipment.service.code.as_text();
    let price = resolve_price(shipment)?;
    let days = delivery_days(shipment);
    let service = names.resolve(&code);

    tracing::trace!(
        service_code = %code,
        negotiated = price.is_negotiated(),
        value = %price.value(),
        currency = %price.currency(),
        "Rate normalized"
    );
    Ok(RateQuote::new(code, service, price, days))
}

/// Normalize every rated shipment, keeping failures apart from successes.
pub fn normalize_all(shipments: &[RatedShipment], names: &ServiceNameTable) -> Normalized {
    shipments
        .iter()
        .map(|s| normalize_shipment(s, names))
        .fold(Normalized::default(), |mut acc, result| {
            match result {
                Ok(quote) => acc.quotes.push(quote),
                Err(e) => acc.rejected.push(e),
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shipment(value: serde_json::Value) -> RatedShipment {
        serde_json::from_value(value).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_negotiated_price_wins() {
        let s = shipment(json!({
            "Service": { "Code": "93" },
            "NegotiatedRateCharges": {
                "TotalCharge": { "CurrencyCode": "USD", "MonetaryValue": "10.50" }
            },
            "TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "12.00" }
        }));

        let quote = normalize_shipment(&s, &ServiceNameTable::ground_saver()).unwrap();
        assert_eq!(quote.service_code, "93");
        assert_eq!(quote.service, "Ground Saver");
        assert_eq!(quote.total_charges, dec("10.50"));
        assert_eq!(quote.currency, "USD");
        assert!(resolve_price(&s).unwrap().is_negotiated());
    }

    #[test]
    fn test_published_price_fallback() {
        let s = shipment(json!({
            "Service": { "Code": "92" },
            "TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "7.80" }
        }));

        let quote = normalize_shipment(&s, &ServiceNameTable::ground_saver()).unwrap();
        assert_eq!(quote.service, "Ground Saver (Under 1lb)");
        assert_eq!(quote.total_charges, dec("7.80"));
        assert!(!resolve_price(&s).unwrap().is_negotiated());
    }

    #[test]
    fn test_currency_never_mixed() {
        let s = shipment(json!({
            "Service": { "Code": "93" },
            "NegotiatedRateCharges": {
                "TotalCharge": { "CurrencyCode": "CAD", "MonetaryValue": "14.00" }
            },
            "TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "12.00" }
        }));

        let price = resolve_price(&s).unwrap();
        assert_eq!(price.value(), dec("14.00"));
        assert_eq!(price.currency(), "CAD");
    }

    #[test]
    fn test_empty_negotiated_block_falls_back() {
        let s = shipment(json!({
            "Service": { "Code": "93" },
            "NegotiatedRateCharges": {},
            "TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "12.00" }
        }));

        let price = resolve_price(&s).unwrap();
        assert!(!price.is_negotiated());
        assert_eq!(price.value(), dec("12.00"));
    }

    #[test]
    fn test_delivery_days_absent_is_none() {
        let s = shipment(json!({
            "Service": { "Code": "93" },
            "TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "12.00" }
        }));
        assert_eq!(delivery_days(&s), None);

        let s = shipment(json!({
            "Service": { "Code": "93" },
            "TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "12.00" },
            "GuaranteedDelivery": { "BusinessDaysInTransit": "4" }
        }));
        assert_eq!(delivery_days(&s), Some(4));
    }

    fn with_transit_days(days: serde_json::Value) -> RatedShipment {
        shipment(json!({
            "Service": { "Code": "01" },
            "TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "61.35" },
            "GuaranteedDelivery": { "BusinessDaysInTransit": days }
        }))
    }

    #[test]
    fn test_whole_decimal_transit_days_accepted() {
        assert_eq!(delivery_days(&with_transit_days(json!("1.0"))), Some(1));
        assert_eq!(delivery_days(&with_transit_days(json!(2.0))), Some(2));
        assert_eq!(delivery_days(&with_transit_days(json!(3))), Some(3));
    }

    #[test]
    fn test_unreadable_transit_days_do_not_reject_the_rate() {
        for days in [json!("1.5"), json!("soon"), json!("-2"), json!("")] {
            let s = with_transit_days(days.clone());
            assert_eq!(delivery_days(&s), None, "{days}");

            let quote = normalize_shipment(&s, &ServiceNameTable::standard()).unwrap();
            assert_eq!(quote.total_charges, dec("61.35"));
            assert_eq!(quote.delivery_days, None);
        }
    }

    #[test]
    fn test_malformed_records_are_rejected() {
        let shipments = vec![
            shipment(json!({
                "Service": { "Code": "93" },
                "TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "abc" }
            })),
            shipment(json!({ "Service": { "Code": "92" } })),
            shipment(json!({
                "Service": { "Code": "93" },
                "TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "9.00" }
            })),
        ];

        let normalized = normalize_all(&shipments, &ServiceNameTable::ground_saver());
        assert_eq!(normalized.quotes.len(), 1);
        assert_eq!(normalized.rejected.len(), 2);
        assert_eq!(
            normalized.rejected[1],
            NormalizeError::MissingPrice {
                code: "92".to_string()
            }
        );
    }
}
