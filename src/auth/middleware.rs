//! Authentication middleware for axum.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::ApiKeyValidator;
use crate::error::GatewayError;

/// Extract and validate the API key from the request.
///
/// Looks for `X-API-Key` header or `Authorization: Bearer <key>` header.
/// On success the matching [`crate::auth::ApiClient`] is added to the
/// request extensions.
pub async fn require_api_key(
    State(validator): State<ApiKeyValidator>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, GatewayError> {
    let headers = request.headers();
    let api_key = headers
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
        })
        .map(String::from)
        .ok_or_else(|| GatewayError::Unauthorized("Missing API key".to_string()))?;

    let client = validator.validate(&api_key).ok_or_else(|| {
        let key_prefix: String = api_key.chars().take(8).collect();
        tracing::warn!(key_prefix = %key_prefix, "Invalid API key attempted");
        GatewayError::Unauthorized("Invalid API key".to_string())
    })?;

    tracing::debug!(key_id = %client.key_id, client = %client.name, "API key accepted");
    request.extensions_mut().insert(client);

    Ok(next.run(request).await)
}
