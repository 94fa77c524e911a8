//! Carrier request bodies built from a shipment request.

use serde_json::{json, Value};

use crate::config::CarrierConfig;
use crate::domain::ShipmentRequest;
use crate::error::{GatewayError, GatewayResult};

const DEFAULT_COUNTRY: &str = "US";
const CUSTOMER_PACKAGING: &str = "02";

/// Which side of the shipment an address belongs to.
#[derive(Debug, Clone, Copy)]
enum Party {
    Shipper,
    Recipient,
}

impl Party {
    fn prefix(self) -> &'static str {
        match self {
            Party::Shipper => "shipper",
            Party::Recipient => "recipient",
        }
    }
}

fn party_field(request: &ShipmentRequest, party: Party, field: &str) -> String {
    request
        .text(&format!("{}_{}", party.prefix(), field))
        .unwrap_or_default()
}

fn address(request: &ShipmentRequest, party: Party) -> Value {
    let country = request
        .text(&format!("{}_country", party.prefix()))
        .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

    json!({
        "AddressLine": [party_field(request, party, "address")],
        "City": party_field(request, party, "city"),
        "StateProvinceCode": party_field(request, party, "state"),
        "PostalCode": party_field(request, party, "postal_code"),
        "CountryCode": country,
    })
}

fn party(request: &ShipmentRequest, party: Party) -> Value {
    json!({
        "Name": party_field(request, party, "name"),
        "Address": address(request, party),
    })
}

fn shipper(request: &ShipmentRequest, config: &CarrierConfig) -> Value {
    let mut shipper = party(request, Party::Shipper);
    if let Some(account) = &config.account_number {
        shipper["ShipperNumber"] = json!(account);
    }
    shipper
}

fn package(request: &ShipmentRequest, packaging_key: &str) -> Value {
    let mut package = json!({
        "PackageWeight": {
            "UnitOfMeasurement": { "Code": "LBS" },
            "Weight": request.text("weight").unwrap_or_else(|| "1".to_string()),
        },
    });
    package[packaging_key] = json!({ "Code": CUSTOMER_PACKAGING });

    let dims: Vec<Option<String>> = ["length", "width", "height"]
        .iter()
        .map(|k| request.text(k))
        .collect();
    if let [Some(length), Some(width), Some(height)] = dims.as_slice() {
        package["Dimensions"] = json!({
            "UnitOfMeasurement": { "Code": "IN" },
            "Length": length,
            "Width": width,
            "Height": height,
        });
    }

    package
}

/// Rating request. `service_code` is required for the `Rate` option and
/// omitted for `Shop`.
pub fn rate_request(
    request: &ShipmentRequest,
    config: &CarrierConfig,
    service_code: Option<&str>,
) -> Value {
    let option = if service_code.is_some() { "Rate" } else { "Shop" };

    let mut shipment = json!({
        "Shipper": shipper(request, config),
        "ShipFrom": party(request, Party::Shipper),
        "ShipTo": party(request, Party::Recipient),
        "Package": package(request, "PackagingType"),
    });
    if let Some(code) = service_code {
        shipment["Service"] = json!({ "Code": code });
    }
    if config.account_number.is_some() {
        shipment["ShipmentRatingOptions"] = json!({ "NegotiatedRatesIndicator": "Y" });
    }

    json!({
        "RateRequest": {
            "Request": { "RequestOption": option },
            "Shipment": shipment,
        }
    })
}

/// Ship request for the service the caller picked.
pub fn ship_request(request: &ShipmentRequest, config: &CarrierConfig) -> GatewayResult<Value> {
    let service_code = request
        .text("service_code")
        .ok_or_else(|| GatewayError::BadRequest("service_code is required".to_string()))?;
    let account = config.account_number.as_deref().ok_or_else(|| {
        GatewayError::Config("carrier.account_number is required to create shipments".to_string())
    })?;

    Ok(json!({
        "ShipmentRequest": {
            "Request": { "RequestOption": "nonvalidate" },
            "Shipment": {
                "Description": "Package",
                "Shipper": shipper(request, config),
                "ShipFrom": party(request, Party::Shipper),
                "ShipTo": party(request, Party::Recipient),
                "PaymentInformation": {
                    "ShipmentCharge": {
                        "Type": "01",
                        "BillShipper": { "AccountNumber": account },
                    }
                },
                "Service": { "Code": service_code },
                "Package": package(request, "Packaging"),
            },
            "LabelSpecification": {
                "LabelImageFormat": { "Code": "GIF" },
            },
        }
    }))
}
