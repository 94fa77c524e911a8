//! HTTP request handlers.

use axum::{extract::State, Extension, Json};

use crate::api::types::*;
use crate::auth::ApiClient;
use crate::domain::{shipment_form, ShipmentRequest};
use crate::error::GatewayResult;
use crate::AppState;

fn caller(client: &Option<Extension<ApiClient>>) -> &str {
    client
        .as_ref()
        .map(|Extension(c)| c.client_id.as_str())
        .unwrap_or("anonymous")
}

/// Describe the shipment form.
///
/// GET /v1/shipments/form
#[utoipa::path(
    get,
    path = "/v1/shipments/form",
    responses(
        (status = 200, description = "Shipment form fields", body = ShipmentFormResponse)
    ),
    tag = "shipments"
)]
pub async fn shipment_form_fields() -> Json<ShipmentFormResponse> {
    Json(ShipmentFormResponse {
        fields: shipment_form(),
    })
}

/// Get all rates for a shipment, cheapest first.
///
/// POST /v1/rates
#[utoipa::path(
    post,
    path = "/v1/rates",
    request_body = ShipmentRequest,
    responses(
        (status = 200, description = "Rates retrieved", body = RatesResponse),
        (status = 401, description = "Missing or invalid API key"),
        (status = 502, description = "Carrier error")
    ),
    tag = "rates"
)]
pub async fn get_rates(
    State(state): State<AppState>,
    client: Option<Extension<ApiClient>>,
    Json(request): Json<ShipmentRequest>,
) -> GatewayResult<Json<RatesResponse>> {
    tracing::info!(
        client_id = %caller(&client),
        fields = request.fields().len(),
        "Rate request received"
    );

    let aggregated = state
        .aggregator
        .aggregate(request)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "Error getting rates");
        })
        .map_err(|e| e.during("Error getting rates"))?;

    if let Some(cheapest) = aggregated.cheapest() {
        tracing::info!(
            count = aggregated.rates.len(),
            degraded = aggregated.is_degraded(),
            cheapest_service = %cheapest.service,
            cheapest_charges = %cheapest.total_charges,
            "Rates returned"
        );
    }

    Ok(Json(aggregated.into()))
}

/// Create a shipment and generate its label.
///
/// POST /v1/shipments
#[utoipa::path(
    post,
    path = "/v1/shipments",
    request_body = ShipmentRequest,
    responses(
        (status = 200, description = "Shipment created", body = CreateShipmentResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 502, description = "Carrier error")
    ),
    tag = "shipments"
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    client: Option<Extension<ApiClient>>,
    Json(request): Json<ShipmentRequest>,
) -> GatewayResult<Json<CreateShipmentResponse>> {
    let label = state
        .shipments
        .create_shipment(&request)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "Shipment creation failed");
        })
        .map_err(|e| e.during("Shipment creation failed"))?;

    tracing::info!(
        client_id = %caller(&client),
        tracking_number = %label.tracking_number,
        service = %label.service_name,
        "Shipment created"
    );

    Ok(Json(CreateShipmentResponse { label }))
}

/// Verify an access token can be obtained from the carrier.
/// The token itself is never returned.
///
/// GET /v1/auth/token
#[utoipa::path(
    get,
    path = "/v1/auth/token",
    responses(
        (status = 200, description = "Token obtained", body = TokenResponse),
        (status = 502, description = "Carrier authentication failed")
    ),
    tag = "auth"
)]
pub async fn test_authentication(State(state): State<AppState>) -> GatewayResult<Json<TokenResponse>> {
    state.tokens.access_token().await?;
    tracing::info!("Carrier authentication check passed");
    Ok(Json(TokenResponse {
        status: "ok".to_string(),
    }))
}

/// Health check endpoint.
///
/// GET /v1/health
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
