//! Error types for credential exchange and token caching

use crate::category::Category;

/// Errors from HubScore authentication.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("auth endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    #[error("no credentials configured for category {0}")]
    MissingCredentials(Category),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("token validity window of {0:?} cannot be represented")]
    ValidityOverflow(std::time::Duration),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
