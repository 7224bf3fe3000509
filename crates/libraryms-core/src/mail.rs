//! Outbound email boundary.
//!
//! The relay handlers build an [`OutboundEmail`] and hand it to a [`Mailer`].
//! The only production implementation talks to a transactional email
//! provider over HTTP and lives in the server crate; tests substitute a
//! recording mailer.

use serde::{Deserialize, Serialize};

use crate::error::MailError;

/// A fully rendered email ready for the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    /// Sender identity, e.g. `LibraryMS <no-reply@example.com>`.
    pub from: String,
    /// Recipients.
    pub to: Vec<String>,
    pub subject: String,
    /// HTML body. Any user-supplied text in it is already escaped.
    pub html: String,
    /// Address replies should go to, when it differs from the sender.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// The provider's acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailReceipt {
    /// Provider-assigned message identifier.
    pub id: String,
}

/// Something that can deliver an [`OutboundEmail`].
///
/// Implementations must be safe to share across request handlers. A send is
/// attempted exactly once; callers do not retry.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Deliver one email and return the provider's receipt.
    ///
    /// # Errors
    ///
    /// Returns a [`MailError`] describing why the provider did not accept the
    /// message.
    async fn send(&self, email: &OutboundEmail) -> Result<MailReceipt, MailError>;
}

/// Escape text for embedding in an HTML email body.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape free text and turn its line breaks into `<br>`.
#[must_use]
pub fn text_to_html(input: &str) -> String {
    escape_html(input)
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn newlines_become_breaks() {
        assert_eq!(text_to_html("one\ntwo\r\nthree"), "one<br>two<br>three");
    }

    #[test]
    fn reply_to_omitted_when_absent() {
        let email = OutboundEmail {
            from: "a@example.com".to_owned(),
            to: vec!["b@example.com".to_owned()],
            subject: "hi".to_owned(),
            html: "<p>hi</p>".to_owned(),
            reply_to: None,
        };
        let json = serde_json::to_value(&email).unwrap();
        assert!(json.get("reply_to").is_none());
        assert_eq!(json["to"][0], "b@example.com");
    }
}
