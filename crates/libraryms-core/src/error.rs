//! Error types for `libraryms-core`.
//!
//! Each variant carries enough context to diagnose the problem from a log
//! line. Validation errors carry no user input; their `Display` text is the
//! exact message returned to HTTP clients.

use libraryms_storage::StorageError;

/// Errors from consent preference persistence.
#[derive(Debug, thiserror::Error)]
pub enum ConsentError {
    /// The preference record could not be serialized.
    #[error("failed to serialize consent preferences: {reason}")]
    Serialize { reason: String },

    /// The storage backend rejected the write.
    #[error("consent storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Rejections of an inbound contact or subscription payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or more contact fields are missing or empty.
    #[error("All fields are required")]
    MissingFields,

    /// The subscription payload has no email.
    #[error("Email is required")]
    MissingEmail,

    /// Strict category checking is on and the category is not recognised.
    #[error("Unknown category")]
    UnknownCategory { category: String },
}

/// Errors from handing an email to the transactional email provider.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// No API key was configured for the provider.
    #[error("email provider is not configured")]
    NotConfigured,

    /// The request never got a response (DNS, TLS, connection reset).
    #[error("email provider unreachable: {reason}")]
    Transport { reason: String },

    /// The provider answered with a non-success status.
    #[error("email provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The provider accepted the message but the response was unreadable.
    #[error("unexpected email provider response: {reason}")]
    InvalidResponse { reason: String },
}
