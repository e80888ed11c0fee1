use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::Value;

use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::util::signature_util::WebhookHeaders;
use crate::errors::AppError;

pub struct WebhookController;

impl WebhookController {
    /// Signed delivery from the identity provider; the raw body is needed for the HMAC.
    pub async fn identity(
        State(state): State<AppState>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        let signed = WebhookHeaders {
            id: header(&headers, "svix-id"),
            timestamp: header(&headers, "svix-timestamp"),
            signature: header(&headers, "svix-signature"),
        };
        to_json(state.user_service.handle_identity_webhook(signed, &body).await)
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
