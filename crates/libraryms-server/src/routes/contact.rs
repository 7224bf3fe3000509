//! Contact form relay: `POST /api/contact`
//!
//! Validates the five form fields and forwards one email to the operator
//! inbox with the sender as reply-to.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, info};

use libraryms_core::contact::ContactForm;
use libraryms_core::error::ValidationError;
use libraryms_core::mail::MailReceipt;

use crate::error::AppError;
use crate::state::AppState;

/// Client-facing message for a failed send.
pub const SEND_FAILED: &str = "Email failed to send";

/// Build the contact router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/contact", post(submit_contact))
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    /// The provider's acknowledgement.
    pub data: MailReceipt,
}

async fn submit_contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<ContactResponse>, AppError> {
    let Json(form) = payload.map_err(|rejection| {
        debug!(error = %rejection, "unreadable contact payload");
        ValidationError::MissingFields
    })?;

    let message = form.validate(state.strict_categories)?;
    let email = message.to_email(&state.contact_from, &state.operator_email);

    let receipt = state
        .mailer
        .send(&email)
        .await
        .map_err(|e| AppError::upstream(SEND_FAILED, e))?;

    info!(
        id = %receipt.id,
        category = %message.category,
        "contact message relayed"
    );

    Ok(Json(ContactResponse {
        success: true,
        data: receipt,
    }))
}
