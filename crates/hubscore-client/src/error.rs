//! Error types for authenticated HubScore calls

use hubscore_auth::Category;

/// Failure of one logical API call. Variants that came from an HTTP answer
/// carry its status and body so the caller can log or surface them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error calling {url}: {message}")]
    Transport { url: String, message: String },

    #[error("credential exchange failed: {0}")]
    AuthExchange(#[from] hubscore_auth::Error),

    #[error("token rejected after refresh ({status}): {body}")]
    TokenInvalid { status: u16, body: String },

    #[error("malformed response ({status}): {reason}")]
    MalformedResponse {
        status: u16,
        body: String,
        reason: String,
    },

    #[error("request rejected ({status}, code {code}): {message}")]
    Rejected {
        status: u16,
        body: String,
        code: i64,
        message: String,
    },

    #[error("no HubScore user for {email} in {category}")]
    UserNotFound { email: String, category: Category },

    #[error(transparent)]
    Config(#[from] common::Error),
}

impl Error {
    /// HTTP status of the answer that produced this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::TokenInvalid { status, .. }
            | Error::MalformedResponse { status, .. }
            | Error::Rejected { status, .. } => Some(*status),
            Error::AuthExchange(hubscore_auth::Error::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Raw body of the answer that produced this error, if there was one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::TokenInvalid { body, .. }
            | Error::MalformedResponse { body, .. }
            | Error::Rejected { body, .. } => Some(body),
            Error::AuthExchange(hubscore_auth::Error::Rejected { body, .. }) => Some(body),
            _ => None,
        }
    }

    /// Outcome label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Transport { .. } => "transport_error",
            Error::AuthExchange(_) => "auth_error",
            Error::TokenInvalid { .. } => "token_invalid",
            Error::MalformedResponse { .. } => "malformed",
            Error::Rejected { .. } => "rejected",
            Error::UserNotFound { .. } => "user_not_found",
            Error::Config(_) => "config_error",
        }
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
