//! Route definitions for the API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::{require_api_key, ApiKeyValidator};
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::shipment_form_fields,
        handlers::get_rates,
        handlers::create_shipment,
        handlers::test_authentication,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::RatesResponse,
        crate::api::types::ShipmentFormResponse,
        crate::api::types::CreateShipmentResponse,
        crate::api::types::TokenResponse,
        crate::api::types::HealthResponse,
        crate::domain::ShipmentRequest,
        crate::domain::RateQuote,
        crate::domain::ShipmentLabel,
        crate::domain::FormField,
        crate::domain::FieldKind,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "rates", description = "Rate quotes"),
        (name = "shipments", description = "Shipment creation and form"),
        (name = "auth", description = "Carrier authentication check"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Carrier Gateway API",
        version = "0.1.0",
        description = "Aggregates carrier rate quotes and creates shipment labels",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router. Carrier-facing routes require an API key when
/// `auth_enabled` is set.
pub fn build_router(state: AppState, auth_enabled: bool, validator: ApiKeyValidator) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut carrier_routes = Router::new()
        .route("/v1/rates", post(handlers::get_rates))
        .route("/v1/shipments", post(handlers::create_shipment))
        .route("/v1/auth/token", get(handlers::test_authentication))
        .with_state(state);

    if auth_enabled {
        carrier_routes =
            carrier_routes.layer(middleware::from_fn_with_state(validator, require_api_key));
    }

    let public_routes = Router::new()
        .route("/v1/health", get(handlers::health_check))
        .route("/v1/shipments/form", get(handlers::shipment_form_fields));

    Router::new()
        .merge(carrier_routes)
        .merge(public_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
