//! Newsletter subscription relay payloads.
//!
//! "Subscribing" only notifies the site operator; no subscriber list exists.

use serde::Deserialize;

use crate::error::ValidationError;
use crate::mail::{OutboundEmail, escape_html};

/// Subject of the operator notification.
pub const NOTIFICATION_SUBJECT: &str = "New LibraryMS Subscription";

/// Raw subscription payload as posted by the footer form.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: Option<String>,
}

/// A validated subscription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    pub email: String,
}

impl SubscribeForm {
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingEmail`] if `email` is missing or empty.
    pub fn validate(self) -> Result<SubscriptionRequest, ValidationError> {
        self.email
            .filter(|email| !email.is_empty())
            .map(|email| SubscriptionRequest { email })
            .ok_or(ValidationError::MissingEmail)
    }
}

impl SubscriptionRequest {
    /// Render the notification sent to the operator inbox.
    #[must_use]
    pub fn to_email(&self, from: &str, to: &str) -> OutboundEmail {
        OutboundEmail {
            from: from.to_owned(),
            to: vec![to.to_owned()],
            subject: NOTIFICATION_SUBJECT.to_owned(),
            html: format!(
                "<p>A new user has subscribed to the newsletter:</p>\
                 <p><strong>Email:</strong> {}</p>",
                escape_html(&self.email)
            ),
            reply_to: None,
        }
    }
}
