//! Username/password exchange against the HubScore auth endpoint
//!
//! A single POST with `Username` and `Password` form fields. The hub answers
//! with `{"token": "..."}`; there is no refresh token and no advertised
//! expiry, so the caller decides how long to trust the result.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::Credentials;
use crate::error::{Error, Result};

/// Body returned by the auth endpoint on success.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Exchange credentials for a bearer token.
///
/// Any non-2xx answer is `Rejected` with the status and body preserved. A
/// 2xx body without a non-empty `token` is `InvalidResponse`; an empty token
/// is never handed back.
pub async fn exchange_credentials(
    client: &reqwest::Client,
    auth_url: &str,
    credentials: &Credentials,
) -> Result<String> {
    debug!(username = %credentials.username, "requesting bearer token");

    let response = client
        .post(auth_url)
        .form(&[
            ("Username", credentials.username.as_str()),
            ("Password", credentials.password.expose().as_str()),
        ])
        .send()
        .await
        .map_err(|e| Error::Http(format!("token request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        return Err(Error::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let parsed = response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::InvalidResponse(e.to_string()))?;

    if parsed.token.is_empty() {
        return Err(Error::InvalidResponse("token field is empty".into()));
    }
    Ok(parsed.token)
}
