//! In-memory bearer token cache, one slot per category
//!
//! Each category owns a tokio Mutex around its slot. The lock is held across
//! the credential exchange, so a refresh is a single read-modify-write: a
//! concurrent reader of the same category waits for the new token instead of
//! racing it with the old one. Categories never contend with each other.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::category::{Category, Credentials};
use crate::error::{Error, Result};
use crate::exchange::exchange_credentials;

/// How long a token is trusted after issue. HubScore tokens live 12 hours;
/// renewing after 10 leaves a margin.
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::from_secs(10 * 60 * 60);

/// A token issued for one category.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub category: Category,
    pub token: String,
    pub issued_at: Instant,
    pub expires_at: Instant,
}

impl CachedToken {
    /// Expired once `now` reaches `expires_at`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Supplies a usable bearer token per category, exchanging credentials only
/// when nothing is cached, the cached token has expired, or the caller forces it.
pub struct TokenStore {
    client: reqwest::Client,
    auth_url: String,
    validity: Duration,
    credentials: HashMap<Category, Credentials>,
    slots: HashMap<Category, Mutex<Option<CachedToken>>>,
}

impl TokenStore {
    /// Create an empty store. Tokens are fetched lazily on first `get`.
    ///
    /// Categories absent from `credentials` fail with `MissingCredentials`
    /// when asked for a token.
    pub fn new(
        client: reqwest::Client,
        auth_url: impl Into<String>,
        validity: Duration,
        credentials: HashMap<Category, Credentials>,
    ) -> Self {
        let slots = Category::ALL
            .into_iter()
            .map(|category| (category, Mutex::new(None)))
            .collect();
        info!(
            categories = credentials.len(),
            validity_secs = validity.as_secs(),
            "token store initialized"
        );
        Self {
            client,
            auth_url: auth_url.into(),
            validity,
            credentials,
            slots,
        }
    }

    /// Return a bearer token for `category`.
    ///
    /// With `force_refresh`, or when the slot is empty or expired, performs
    /// exactly one credential exchange and overwrites the slot before
    /// returning. A failed exchange, or a validity window too large to add to
    /// the issue time, leaves the slot untouched and propagates the error.
    pub async fn get(&self, category: Category, force_refresh: bool) -> Result<String> {
        let slot = self
            .slots
            .get(&category)
            .ok_or(Error::MissingCredentials(category))?;
        let mut cached = slot.lock().await;

        let usable = cached
            .as_ref()
            .filter(|t| !force_refresh && !t.is_expired(Instant::now()));
        if let Some(entry) = usable {
            debug!(%category, "using cached token");
            return Ok(entry.token.clone());
        }

        let credentials = self
            .credentials
            .get(&category)
            .ok_or(Error::MissingCredentials(category))?;

        let reason = if force_refresh {
            "forced"
        } else if cached.is_some() {
            "expired"
        } else {
            "empty"
        };
        info!(%category, reason, "exchanging credentials for a new token");
        metrics::counter!(
            "hubscore_token_exchanges_total",
            "category" => category.as_str(),
            "forced" => if force_refresh { "true" } else { "false" }
        )
        .increment(1);

        let token = match exchange_credentials(&self.client, &self.auth_url, credentials).await {
            Ok(token) => token,
            Err(e) => {
                warn!(%category, error = %e, "credential exchange failed");
                return Err(e);
            }
        };

        let issued_at = Instant::now();
        let expires_at = issued_at
            .checked_add(self.validity)
            .ok_or(Error::ValidityOverflow(self.validity))?;
        *cached = Some(CachedToken {
            category,
            token: token.clone(),
            issued_at,
            expires_at,
        });
        Ok(token)
    }

    /// Snapshot of the cached entry for `category`, if any.
    pub async fn cached(&self, category: Category) -> Option<CachedToken> {
        match self.slots.get(&category) {
            Some(slot) => slot.lock().await.clone(),
            None => None,
        }
    }
}
