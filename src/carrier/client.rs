//! HTTP client for the carrier REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::carrier::payload;
use crate::carrier::{ShipmentCreator, TokenProvider};
use crate::config::CarrierConfig;
use crate::domain::{RateQuote, ServiceNameTable, ShipmentLabel, ShipmentRequest};
use crate::engine::normalize::normalize_all;
use crate::engine::raw::{OneOrMany, RawRateResponse};
use crate::engine::{GroundSaverRates, PrimaryRateSource, SecondaryRateSource};
use crate::error::{GatewayError, GatewayResult};

const TOKEN_PATH: &str = "/security/v1/oauth/token";

/// OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Error envelope the carrier returns on rejected requests.
#[derive(Debug, Deserialize)]
struct CarrierErrorBody {
    response: CarrierErrors,
}

#[derive(Debug, Deserialize)]
struct CarrierErrors {
    #[serde(default)]
    errors: Vec<CarrierErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct CarrierErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Ship response, reduced to what the label needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ShipResponse {
    shipment_response: ShipResponseBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ShipResponseBody {
    shipment_results: ShipmentResults,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ShipmentResults {
    #[serde(default)]
    shipment_identification_number: Option<String>,
    package_results: OneOrMany<PackageResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PackageResult {
    #[serde(default)]
    tracking_number: Option<String>,
    #[serde(default)]
    shipping_label: Option<ShippingLabel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ShippingLabel {
    graphic_image: String,
}

/// Client for the carrier's OAuth, rating and shipping endpoints.
///
/// Each operation fetches a fresh token; nothing is cached.
#[derive(Clone)]
pub struct CarrierClient {
    config: CarrierConfig,
    http: Client,
    names: ServiceNameTable,
}

impl CarrierClient {
    /// Create a new client with the configured timeout.
    pub fn new(config: CarrierConfig) -> GatewayResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http,
            names: ServiceNameTable::standard(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn rating_path(&self, option: &str) -> String {
        format!("/api/rating/{}/{}", self.config.rating_version, option)
    }

    /// Client-credentials token request.
    async fn fetch_token(&self) -> GatewayResult<String> {
        let response = self
            .http
            .post(self.url(TOKEN_PATH))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = error_message(response).await;
            return Err(GatewayError::Auth(format!(
                "token request rejected ({}): {}",
                status, message
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Auth(format!("unreadable token response: {}", e)))?;

        tracing::debug!("Carrier access token acquired");
        Ok(token.access_token)
    }

    async fn post(&self, path: &str, token: &str, body: &Value) -> GatewayResult<Response> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        tracing::debug!(path = %path, status = %response.status(), "Carrier responded");
        Ok(response)
    }

    /// Rate a single ground-saver service. `None` when the carrier doesn't
    /// offer it for this shipment.
    async fn rate_service(
        &self,
        request: &ShipmentRequest,
        token: &str,
        code: &str,
    ) -> GatewayResult<Option<RawRateResponse>> {
        let body = payload::rate_request(request, &self.config, Some(code));
        let response = self.post(&self.rating_path("Rate"), token, &body).await?;

        // 400 means the service isn't offered for this shipment
        if response.status() == StatusCode::BAD_REQUEST {
            let message = error_message(response).await;
            tracing::debug!(service_code = %code, message = %message, "Ground saver service not offered");
            return Ok(None);
        }

        let raw: RawRateResponse = decode(response).await?;
        if !raw.is_well_formed() {
            return Err(GatewayError::MalformedResponse(format!(
                "rate response for service {} has no RatedShipment",
                code
            )));
        }
        Ok(Some(raw))
    }
}

/// Decode a successful carrier response, classifying failures.
async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        let message = error_message(response).await;
        return Err(GatewayError::Auth(format!("{}: {}", status, message)));
    }

    if !status.is_success() {
        let message = error_message(response).await;
        return Err(GatewayError::Transport(format!(
            "carrier returned {}: {}",
            status, message
        )));
    }

    response
        .json()
        .await
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
}

/// Best-effort description of a rejected request.
async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<CarrierErrorBody>(&body) {
        Ok(parsed) => parsed
            .response
            .errors
            .iter()
            .map(|e| format!("{} {}", e.code, e.message).trim().to_string())
            .collect::<Vec<_>>()
            .join("; "),
        Err(_) => body.chars().take(200).collect(),
    }
}

#[async_trait]
impl TokenProvider for CarrierClient {
    async fn access_token(&self) -> GatewayResult<String> {
        self.fetch_token().await
    }
}

#[async_trait]
impl PrimaryRateSource for CarrierClient {
    async fn shop_rates(&self, request: &ShipmentRequest) -> GatewayResult<Vec<RateQuote>> {
        let token = self.fetch_token().await?;
        let body = payload::rate_request(request, &self.config, None);
        let response = self.post(&self.rating_path("Shop"), &token, &body).await?;
        let raw: RawRateResponse = decode(response).await?;

        let shipments = raw.rated_shipments().ok_or_else(|| {
            GatewayError::MalformedResponse("shop response has no RatedShipment".to_string())
        })?;

        let normalized = normalize_all(&shipments, &self.names);
        if let Some(e) = normalized.rejected.first() {
            return Err(GatewayError::MalformedResponse(e.to_string()));
        }

        Ok(normalized.quotes)
    }
}

#[async_trait]
impl SecondaryRateSource for CarrierClient {
    async fn ground_saver_rates(
        &self,
        request: &ShipmentRequest,
    ) -> GatewayResult<Option<GroundSaverRates>> {
        let token = self.fetch_token().await?;
        let mut responses = Vec::new();
        let mut failure = None;

        for code in &self.config.ground_saver_codes {
            match self.rate_service(request, &token, code).await {
                Ok(Some(raw)) => responses.push(raw),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(service_code = %code, error = %e, "Ground saver rate failed");
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        if responses.is_empty() {
            return match failure {
                Some(e) => Err(e),
                None => Ok(None),
            };
        }

        Ok(Some(GroundSaverRates {
            response: RawRateResponse::merge(responses),
            failure,
        }))
    }
}

#[async_trait]
impl ShipmentCreator for CarrierClient {
    async fn create_shipment(&self, request: &ShipmentRequest) -> GatewayResult<ShipmentLabel> {
        let body = payload::ship_request(request, &self.config)?;
        let token = self.fetch_token().await?;
        let path = format!("/api/shipments/{}/ship", self.config.shipping_version);
        let response = self.post(&path, &token, &body).await?;
        let shipped: ShipResponse = decode(response).await?;

        let results = shipped.shipment_response.shipment_results;
        let package = results
            .package_results
            .into_vec()
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::MalformedResponse("no package results".to_string()))?;

        let label = package
            .shipping_label
            .ok_or_else(|| GatewayError::MalformedResponse("no shipping label".to_string()))?;
        let tracking_number = package
            .tracking_number
            .or(results.shipment_identification_number)
            .ok_or_else(|| GatewayError::MalformedResponse("no tracking number".to_string()))?;

        let service_code = request.text("service_code").unwrap_or_default();

        Ok(ShipmentLabel {
            tracking_number,
            service_name: self.names.resolve(&service_code),
            label_url: format!("data:image/gif;base64,{}", label.graphic_image),
        })
    }
}
