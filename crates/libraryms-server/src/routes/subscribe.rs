//! Newsletter relay: `POST /api/subscribe`
//!
//! Sends the operator a one-off notice naming the new subscriber. Nothing is
//! stored; posting the same address twice sends two notices.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, info};

use libraryms_core::error::ValidationError;
use libraryms_core::subscription::SubscribeForm;

use crate::error::AppError;
use crate::state::AppState;

/// Client-facing message for a failed send.
pub const SEND_FAILED: &str = "Failed to send email";

/// Build the subscription router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/subscribe", post(subscribe))
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
}

async fn subscribe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubscribeForm>, JsonRejection>,
) -> Result<Json<SubscribeResponse>, AppError> {
    let Json(form) = payload.map_err(|rejection| {
        debug!(error = %rejection, "unreadable subscription payload");
        ValidationError::MissingEmail
    })?;

    let request = form.validate()?;
    let email = request.to_email(&state.subscribe_from, &state.operator_email);

    let receipt = state
        .mailer
        .send(&email)
        .await
        .map_err(|e| AppError::upstream(SEND_FAILED, e))?;

    info!(id = %receipt.id, "subscription notice relayed");

    Ok(Json(SubscribeResponse { success: true }))
}
