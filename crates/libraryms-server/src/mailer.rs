//! Resend transactional email client.
//!
//! Implements [`Mailer`] by posting to the provider's `/emails` endpoint.
//! Each call is a single attempt with no timeout of its own; a slow provider
//! only holds up the request that is waiting on it.

use async_trait::async_trait;
use tracing::debug;

use libraryms_core::error::MailError;
use libraryms_core::mail::{MailReceipt, Mailer, OutboundEmail};

use crate::config::MailConfig;

/// A [`Mailer`] backed by the Resend HTTP API.
#[derive(Clone)]
pub struct ResendMailer {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for ResendMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendMailer")
            .field("api_url", &self.api_url)
            .field("configured", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl ResendMailer {
    #[must_use]
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_owned(),
            api_key,
        }
    }

    #[must_use]
    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(config.api_url.clone(), config.api_key.clone())
    }

    /// Whether an API key is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<MailReceipt, MailError> {
        let api_key = self.api_key.as_deref().ok_or(MailError::NotConfigured)?;

        let resp = self
            .http
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| MailError::Transport {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let receipt: MailReceipt = resp.json().await.map_err(|e| MailError::InvalidResponse {
            reason: e.to_string(),
        })?;

        debug!(id = %receipt.id, "email accepted by provider");
        Ok(receipt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Start a fake provider answering `/emails` with `status` and `body`.
    async fn fake_provider(status: StatusCode, body: Value) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let recorder = Arc::clone(&seen);

        let app = Router::new().route(
            "/emails",
            post(move |headers: HeaderMap, Json(payload): Json<Value>| {
                let recorder = Arc::clone(&recorder);
                let body = body.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_owned);
                    recorder.lock().unwrap().push((auth, payload));
                    (status, Json(body))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/"), seen)
    }

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "LibraryMS <no-reply@example.com>".to_owned(),
            to: vec!["ops@example.com".to_owned()],
            subject: "[BUG] Crash".to_owned(),
            html: "<p>boom</p>".to_owned(),
            reply_to: Some("reader@example.com".to_owned()),
        }
    }

    #[tokio::test]
    async fn posts_email_with_bearer_key() {
        let (url, seen) = fake_provider(StatusCode::OK, json!({ "id": "msg_123" })).await;
        let mailer = ResendMailer::new(url, Some("re_test".to_owned()));

        let receipt = mailer.send(&email()).await.unwrap();
        assert_eq!(receipt.id, "msg_123");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (auth, payload) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer re_test"));
        assert_eq!(payload["subject"], "[BUG] Crash");
        assert_eq!(payload["reply_to"], "reader@example.com");
        assert_eq!(payload["to"], json!(["ops@example.com"]));
    }

    #[tokio::test]
    async fn provider_rejection_is_an_error() {
        let (url, _) = fake_provider(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "message": "invalid from address" }),
        )
        .await;
        let mailer = ResendMailer::new(url, Some("re_test".to_owned()));

        let err = mailer.send(&email()).await.unwrap_err();
        match err {
            MailError::Rejected { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("invalid from address"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_fails_without_a_request() {
        let (url, seen) = fake_provider(StatusCode::OK, json!({ "id": "x" })).await;
        let mailer = ResendMailer::new(url, None);

        assert!(!mailer.is_configured());
        assert!(matches!(
            mailer.send(&email()).await,
            Err(MailError::NotConfigured)
        ));
        assert!(seen.lock().unwrap().is_empty());
    }
}
