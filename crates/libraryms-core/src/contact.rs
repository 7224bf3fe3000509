//! Contact form relay payloads.
//!
//! A [`ContactForm`] is whatever the client posted. Validation turns it into a
//! [`ContactMessage`] (every field present and non-empty), which renders into
//! exactly one [`OutboundEmail`] for the site operator.

use std::fmt;

use serde::Deserialize;

use crate::error::ValidationError;
use crate::mail::{OutboundEmail, escape_html, text_to_html};

/// Raw contact form as posted by the client. Every field is optional here;
/// presence is checked by [`ContactForm::validate`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Topic the sender picked on the contact form.
///
/// The form offers six topics. Any other non-empty value is kept verbatim in
/// [`ContactCategory::Other`] unless strict checking is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactCategory {
    General,
    Technical,
    Account,
    Feature,
    Bug,
    Partnership,
    Other(String),
}

impl ContactCategory {
    /// All topics the contact form offers, in display order.
    pub const KNOWN: [Self; 6] = [
        Self::General,
        Self::Technical,
        Self::Account,
        Self::Feature,
        Self::Bug,
        Self::Partnership,
    ];

    /// Parse a category value. Known topics match case-insensitively;
    /// anything else becomes [`ContactCategory::Other`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "general" => Self::General,
            "technical" => Self::Technical,
            "account" => Self::Account,
            "feature" => Self::Feature,
            "bug" => Self::Bug,
            "partnership" => Self::Partnership,
            _ => Self::Other(raw.to_owned()),
        }
    }

    /// Wire value of the category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::General => "general",
            Self::Technical => "technical",
            Self::Account => "account",
            Self::Feature => "feature",
            Self::Bug => "bug",
            Self::Partnership => "partnership",
            Self::Other(raw) => raw,
        }
    }

    /// Human-readable label shown on the contact form.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::General => "General Inquiry",
            Self::Technical => "Technical Support",
            Self::Account => "Account Issues",
            Self::Feature => "Feature Request",
            Self::Bug => "Bug Report",
            Self::Partnership => "Partnership",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for ContactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated contact message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub category: ContactCategory,
    pub message: String,
}

fn required(field: Option<String>) -> Result<String, ValidationError> {
    field
        .filter(|value| !value.is_empty())
        .ok_or(ValidationError::MissingFields)
}

impl ContactForm {
    /// Check that every field is present and non-empty.
    ///
    /// With `strict_categories` set, a category outside
    /// [`ContactCategory::KNOWN`] is rejected as well.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingFields`] if any field is missing or empty.
    /// - [`ValidationError::UnknownCategory`] in strict mode for an
    ///   unrecognised category.
    pub fn validate(self, strict_categories: bool) -> Result<ContactMessage, ValidationError> {
        let name = required(self.name)?;
        let email = required(self.email)?;
        let subject = required(self.subject)?;
        let category = ContactCategory::parse(&required(self.category)?);
        let message = required(self.message)?;

        if strict_categories && !category.is_known() {
            return Err(ValidationError::UnknownCategory {
                category: category.as_str().to_owned(),
            });
        }

        Ok(ContactMessage {
            name,
            email,
            subject,
            category,
            message,
        })
    }
}

impl ContactMessage {
    /// Subject line of the operator email: `[<CATEGORY>] <subject>`.
    #[must_use]
    pub fn email_subject(&self) -> String {
        format!("[{}] {}", self.category.as_str().to_uppercase(), self.subject)
    }

    /// Render the operator email. Replies go straight to the sender.
    #[must_use]
    pub fn to_email(&self, from: &str, to: &str) -> OutboundEmail {
        let html = format!(
            "<div>\
             <h2>📬 New Message from {name}</h2>\
             <p><strong>Email:</strong> {email}</p>\
             <p><strong>Category:</strong> {category}</p>\
             <p><strong>Subject:</strong> {subject}</p>\
             <p><strong>Message:</strong><br>{message}</p>\
             </div>",
            name = escape_html(&self.name),
            email = escape_html(&self.email),
            category = escape_html(self.category.as_str()),
            subject = escape_html(&self.subject),
            message = text_to_html(&self.message),
        );

        OutboundEmail {
            from: from.to_owned(),
            to: vec![to.to_owned()],
            subject: self.email_subject(),
            html,
            reply_to: Some(self.email.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: Some("Ada".to_owned()),
            email: Some("ada@example.com".to_owned()),
            subject: Some("Broken link".to_owned()),
            category: Some("technical".to_owned()),
            message: Some("The link\nis broken".to_owned()),
        }
    }

    #[test]
    fn complete_form_validates() {
        let msg = form().validate(false).unwrap();
        assert_eq!(msg.category, ContactCategory::Technical);
        assert_eq!(msg.email_subject(), "[TECHNICAL] Broken link");
    }

    #[test]
    fn each_missing_field_is_rejected() {
        let blankers: [fn(&mut ContactForm); 5] = [
            |f| f.name = None,
            |f| f.email = Some(String::new()),
            |f| f.subject = None,
            |f| f.category = Some(String::new()),
            |f| f.message = None,
        ];
        for blank in blankers {
            let mut f = form();
            blank(&mut f);
            assert_eq!(f.validate(false), Err(ValidationError::MissingFields));
        }
    }

    #[test]
    fn whitespace_counts_as_present() {
        let mut f = form();
        f.subject = Some("  ".to_owned());
        assert!(f.validate(false).is_ok());
    }

    #[test]
    fn unknown_category_kept_verbatim_by_default() {
        let mut f = form();
        f.category = Some("press".to_owned());
        let msg = f.validate(false).unwrap();
        assert_eq!(msg.category, ContactCategory::Other("press".to_owned()));
        assert_eq!(msg.email_subject(), "[PRESS] Broken link");
    }

    #[test]
    fn unknown_category_rejected_when_strict() {
        let mut f = form();
        f.category = Some("press".to_owned());
        assert_eq!(
            f.validate(true),
            Err(ValidationError::UnknownCategory {
                category: "press".to_owned()
            })
        );
    }

    #[test]
    fn known_categories_parse_case_insensitively() {
        assert_eq!(ContactCategory::parse("BUG"), ContactCategory::Bug);
        for cat in ContactCategory::KNOWN {
            assert_eq!(ContactCategory::parse(cat.as_str()), cat);
        }
    }

    #[test]
    fn email_has_reply_to_and_escaped_body() {
        let mut f = form();
        f.name = Some("<script>".to_owned());
        let email = f
            .validate(false)
            .unwrap()
            .to_email("site <noreply@example.com>", "ops@example.com");

        assert_eq!(email.reply_to.as_deref(), Some("ada@example.com"));
        assert_eq!(email.to, vec!["ops@example.com".to_owned()]);
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(email.html.contains("The link<br>is broken"));
        assert!(!email.html.contains("<script>"));
    }
}
