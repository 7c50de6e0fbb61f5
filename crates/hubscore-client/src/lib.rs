//! Authenticated HubScore API client
//!
//! Wraps every HubScore call in a single retry primitive: attach the
//! category's bearer token, and if the hub answers with its configured
//! "invalid token" payload, force a new token and re-issue the identical
//! request exactly once. Everything else (transport failures, other error
//! codes, unparseable bodies) is returned to the caller untouched.
//!
//! Call lifecycle:
//! 1. `AuthenticatedHttpClient::call()` gets a token from `TokenStore`
//! 2. Request sent; expected status for the verb → raw body returned
//! 3. Unexpected status → body classified by `classify::classify()`
//! 4. Token-invalid → forced refresh + one retry, whose outcome is final
//! 5. `HubScoreApi` builds the resource URLs and requests on top of `call()`

pub mod api;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod request;

#[cfg(test)]
mod test_support;

pub use api::HubScoreApi;
pub use classify::{ApiError, Classification, classify};
pub use client::AuthenticatedHttpClient;
pub use config::{
    ClientConfig, CredentialsConfig, Endpoints, ResourcePaths, SuccessCodes, TokenInvalidSignature,
};
pub use error::{Error, Result};
pub use hubscore_auth::Category;
pub use request::{ApiRequest, Verb};
