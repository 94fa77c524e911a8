//! Shipment request and label types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Shipment parameters as submitted by the caller.
///
/// Opaque to the rate aggregator: the map is forwarded unchanged to the
/// quote sources and echoed back with the rates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct ShipmentRequest(Map<String, Value>);

impl ShipmentRequest {
    /// Read a field as text. Numbers are rendered, blank strings count as missing.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Value> for ShipmentRequest {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// Result of a successful shipment creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShipmentLabel {
    /// Carrier tracking number.
    pub tracking_number: String,
    /// Human-readable service name.
    pub service_name: String,
    /// Label image as a `data:` URL.
    pub label_url: String,
}

/// Kind of input a form field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
}

/// A field of the shipment form.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// Fields of the shipment form, in display order.
pub fn shipment_form() -> Vec<FormField> {
    SHIPMENT_FORM
        .iter()
        .map(|&(name, label, kind, required)| FormField {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required,
        })
        .collect()
}

const SHIPMENT_FORM: &[(&str, &str, FieldKind, bool)] = &[
    ("shipper_name", "Shipper name", FieldKind::Text, true),
    ("shipper_address", "Shipper address", FieldKind::Text, true),
    ("shipper_city", "Shipper city", FieldKind::Text, true),
    ("shipper_state", "Shipper state", FieldKind::Text, true),
    ("shipper_postal_code", "Shipper postal code", FieldKind::Text, true),
    ("shipper_country", "Shipper country", FieldKind::Text, false),
    ("recipient_name", "Recipient name", FieldKind::Text, true),
    ("recipient_address", "Recipient address", FieldKind::Text, true),
    ("recipient_city", "Recipient city", FieldKind::Text, true),
    ("recipient_state", "Recipient state", FieldKind::Text, true),
    ("recipient_postal_code", "Recipient postal code", FieldKind::Text, true),
    ("recipient_country", "Recipient country", FieldKind::Text, false),
    ("weight", "Weight (lbs)", FieldKind::Number, true),
    ("length", "Length (in)", FieldKind::Number, false),
    ("width", "Width (in)", FieldKind::Number, false),
    ("height", "Height (in)", FieldKind::Number, false),
    ("service_code", "Service", FieldKind::Text, false),
];
