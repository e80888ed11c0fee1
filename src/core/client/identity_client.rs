use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;

/// User record as the identity provider returns it (REST API and webhooks).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IdentityUserPayload {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<IdentityEmail>,
    pub primary_email_address_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<IdentityPhone>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub public_metadata: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IdentityEmail {
    pub id: Option<String>,
    pub email_address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IdentityPhone {
    pub phone_number: String,
}

/// Lookup of user profiles held by the external identity provider.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// `Ok(None)` when the provider does not know the user.
    async fn fetch_user(&self, user_id: &str) -> Result<Option<IdentityUserPayload>>;
}

pub struct HttpIdentityDirectory {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpIdentityDirectory {
    const ATTEMPTS: usize = 2;

    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl IdentityDirectory for HttpIdentityDirectory {
    async fn fetch_user(&self, user_id: &str) -> Result<Option<IdentityUserPayload>> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(AppError::ServiceUnavailable(
                "identity API key is not configured".into(),
            )
            .into());
        };

        let url = format!("{}/users/{}", self.base_url, urlencoding::encode(user_id));
        let mut last_status: Option<StatusCode> = None;

        for attempt in 1..=Self::ATTEMPTS {
            debug!(attempt, %url, "Fetching user from identity provider");
            let resp = self
                .client
                .get(&url)
                .bearer_auth(key)
                .send()
                .await
                .map_err(|e| AppError::UpstreamError(format!("request failed: {e}")))?;

            let status = resp.status();
            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if status.is_success() {
                let user = resp
                    .json::<IdentityUserPayload>()
                    .await
                    .map_err(|e| AppError::UpstreamError(format!("invalid user payload: {e}")))?;
                return Ok(Some(user));
            }

            warn!(attempt, %status, "Identity provider returned an error");
            last_status = Some(status);
        }

        Err(AppError::UpstreamError(format!(
            "identity provider failed after retries (last status: {:?})",
            last_status
        ))
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Status codes to answer with, in order, plus the number of calls seen.
    type Script = (Arc<Vec<u16>>, Arc<AtomicUsize>);

    async fn scripted_user(State((codes, hits)): State<Script>, Path(id): Path<String>) -> Response {
        let n = hits.fetch_add(1, Ordering::SeqCst);
        let status = StatusCode::from_u16(codes.get(n).copied().unwrap_or(500)).unwrap();
        if status.is_success() {
            let user = IdentityUserPayload {
                id,
                ..Default::default()
            };
            (status, Json(user)).into_response()
        } else {
            status.into_response()
        }
    }

    async fn scripted_provider(codes: &[u16]) -> (HttpIdentityDirectory, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/v1/users/{id}", get(scripted_user))
            .with_state((Arc::new(codes.to_vec()), hits.clone()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let dir = HttpIdentityDirectory::new(format!("http://{addr}/v1"), Some("sk_test".into()));
        (dir, hits)
    }

    #[tokio::test]
    async fn server_error_is_retried_once() {
        let (dir, hits) = scripted_provider(&[500, 200]).await;
        let user = dir.fetch_user("user_1").await.unwrap().unwrap();
        assert_eq!(user.id, "user_1");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn persistent_failure_is_upstream_error() {
        let (dir, hits) = scripted_provider(&[500, 503]).await;
        let err = dir.fetch_user("user_1").await.unwrap_err();
        let app = err.downcast::<AppError>().unwrap();
        assert!(matches!(app, AppError::UpstreamError(_)));
        assert_eq!(app.status(), axum::http::StatusCode::BAD_GATEWAY);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unknown_user_is_none_without_retry() {
        let (dir, hits) = scripted_provider(&[404]).await;
        assert!(dir.fetch_user("ghost").await.unwrap().is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_api_key_is_service_unavailable() {
        let dir = HttpIdentityDirectory::new("http://127.0.0.1:9/v1/", None);
        let err = dir.fetch_user("user_1").await.unwrap_err();
        let app = err.downcast::<AppError>().unwrap();
        assert!(matches!(app, AppError::ServiceUnavailable(_)));
    }

    #[test]
    fn payload_tolerates_missing_collections() {
        let user: IdentityUserPayload =
            serde_json::from_str(r#"{"id":"user_1","first_name":"Asha"}"#).unwrap();
        assert!(user.email_addresses.is_empty());
        assert!(user.public_metadata.is_null());
    }
}
