//! Token-attaching HTTP client with a single retry on token rejection
//!
//! One primitive, `call()`, serves every verb. The expected status comes
//! from `SuccessCodes`; any other status has its body classified. Only the
//! configured token-invalid payload leads to a forced refresh and a second
//! attempt, and the second attempt's outcome is final whatever it is.

use tracing::{debug, instrument, warn};

use hubscore_auth::{Category, TokenStore};

use crate::classify::{Classification, classify};
use crate::config::{ClientConfig, SuccessCodes, TokenInvalidSignature};
use crate::error::{Error, Result};
use crate::metrics::{record_call, record_token_retry};
use crate::request::ApiRequest;

/// Status and body of one HTTP exchange.
struct Answer {
    status: u16,
    body: String,
}

/// Authenticated client for the hub API.
///
/// Shares one `reqwest::Client` (with the configured timeout) between the
/// token store's credential exchange and the resource calls. Safe to use
/// from many tasks at once behind an `Arc`.
pub struct AuthenticatedHttpClient {
    http: reqwest::Client,
    tokens: TokenStore,
    success_codes: SuccessCodes,
    token_invalid: TokenInvalidSignature,
}

impl AuthenticatedHttpClient {
    /// Validate `config` and build the client. Every configured category
    /// must have a resolved password.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let credentials = config.resolve_credentials()?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| common::Error::Config(format!("building HTTP client: {e}")))?;

        let tokens = TokenStore::new(
            http.clone(),
            config.auth_url(),
            config.token_validity(),
            credentials,
        );

        Ok(Self {
            http,
            tokens,
            success_codes: config.success_codes,
            token_invalid: config.token_invalid.clone(),
        })
    }

    /// Token cache backing this client.
    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    /// Execute one logical API operation and return the raw success body.
    #[instrument(
        skip_all,
        fields(
            call_id = %uuid::Uuid::new_v4(),
            verb = request.verb().as_str(),
            category = %category,
        )
    )]
    pub async fn call(&self, request: &ApiRequest, category: Category) -> Result<String> {
        let result = self.call_with_retry(request, category).await;
        match &result {
            Ok(_) => record_call(request.verb(), "success"),
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "call failed");
                record_call(request.verb(), e.kind());
            }
        }
        result
    }

    async fn call_with_retry(&self, request: &ApiRequest, category: Category) -> Result<String> {
        let expected = self.success_codes.expected(request.verb());

        let token = self.tokens.get(category, false).await?;
        let first = self.send(request, &token).await?;
        if first.status == expected {
            debug!(status = first.status, "call succeeded");
            return Ok(first.body);
        }

        match classify(&first.body, &self.token_invalid) {
            Classification::TokenInvalid => {
                warn!(
                    status = first.status,
                    "hub rejected token, refreshing and retrying once"
                );
                record_token_retry(category);
            }
            other => return Err(into_error(first, other)),
        }

        let token = self.tokens.get(category, true).await?;
        let retry = self.send(request, &token).await?;
        if retry.status == expected {
            debug!(status = retry.status, "call succeeded after token refresh");
            return Ok(retry.body);
        }

        let classification = classify(&retry.body, &self.token_invalid);
        Err(into_error(retry, classification))
    }

    /// One HTTP exchange. Connection errors and timeouts become `Transport`.
    async fn send(&self, request: &ApiRequest, token: &str) -> Result<Answer> {
        let transport = |e: reqwest::Error| Error::Transport {
            url: request.url().to_string(),
            message: e.to_string(),
        };

        let response = request
            .build(&self.http, token)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        Ok(Answer { status, body })
    }
}

fn into_error(answer: Answer, classification: Classification) -> Error {
    let Answer { status, body } = answer;
    match classification {
        Classification::TokenInvalid => Error::TokenInvalid { status, body },
        Classification::Rejected(api) => Error::Rejected {
            status,
            body,
            code: api.code,
            message: api.message,
        },
        Classification::Malformed(reason) => Error::MalformedResponse {
            status,
            body,
            reason,
        },
    }
}
