//! Shared application state for the `LibraryMS` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. Nothing in it changes after startup; handlers
//! share no mutable state.

use std::sync::Arc;

use libraryms_core::mail::Mailer;

use crate::config::{MailConfig, ServerConfig};

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Delivers relay emails.
    pub mailer: Arc<dyn Mailer>,
    /// Inbox receiving contact messages and subscription notices.
    pub operator_email: String,
    /// Sender identity for contact messages.
    pub contact_from: String,
    /// Sender identity for subscription notices.
    pub subscribe_from: String,
    /// Reject contact categories the form does not offer.
    pub strict_categories: bool,
}

impl AppState {
    /// Build the state from configuration and a mailer.
    #[must_use]
    pub fn new(config: &ServerConfig, mailer: Arc<dyn Mailer>) -> Self {
        let MailConfig {
            operator_email,
            contact_from,
            subscribe_from,
            ..
        } = config.mail.clone();

        Self {
            mailer,
            operator_email,
            contact_from,
            subscribe_from,
            strict_categories: config.strict_categories,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("operator_email", &self.operator_email)
            .field("strict_categories", &self.strict_categories)
            .finish_non_exhaustive()
    }
}
