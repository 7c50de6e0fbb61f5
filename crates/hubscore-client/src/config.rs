//! Client configuration
//!
//! Everything the client needs is passed in explicitly through
//! `ClientConfig`; nothing is read from process-wide state. Passwords are
//! never deserialized: the loader fills `CredentialsConfig::password` from
//! the environment or a `password_file` before constructing the client.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use common::Secret;
use hubscore_auth::{Category, Credentials};
use serde::Deserialize;

use crate::request::Verb;

/// Root client configuration (the `[hubscore]` table of the config file).
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Scheme and host of the hub, e.g. `https://hub.example.com`
    pub base_url: String,
    /// Path of the username/password exchange endpoint
    pub auth_path: String,
    pub resources: ResourcePaths,
    #[serde(default)]
    pub success_codes: SuccessCodes,
    pub token_invalid: TokenInvalidSignature,
    #[serde(default = "default_token_validity_secs")]
    pub token_validity_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub credentials: HashMap<Category, CredentialsConfig>,
}

/// Resource paths, appended to `base_url + database_path`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourcePaths {
    pub database_path: String,
    pub manage_user_path: String,
    /// Listing URL is `subscriptions_prefix + <email> + subscriptions_suffix`
    pub subscriptions_prefix: String,
    #[serde(default)]
    pub subscriptions_suffix: String,
    pub subscribe_path: String,
}

/// Expected status per verb. Anything else is treated as an error answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SuccessCodes {
    pub get: u16,
    pub post: u16,
    pub patch: u16,
    pub delete: u16,
}

impl Default for SuccessCodes {
    fn default() -> Self {
        Self {
            get: 200,
            post: 200,
            patch: 204,
            delete: 200,
        }
    }
}

impl SuccessCodes {
    pub fn expected(&self, verb: Verb) -> u16 {
        match verb {
            Verb::Get => self.get,
            Verb::Post => self.post,
            Verb::Patch => self.patch,
            Verb::Delete => self.delete,
        }
    }
}

/// The `(code, message)` pair the hub sends for an expired or invalid token.
/// Both must match for a retry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenInvalidSignature {
    pub code: i64,
    pub message: String,
}

/// One category's login. The password is resolved outside the TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    pub username: String,
    #[serde(skip)]
    pub password: Option<Secret<String>>,
    /// File holding the password (alternative to the env var)
    #[serde(default)]
    pub password_file: Option<PathBuf>,
}

fn default_token_validity_secs() -> u64 {
    hubscore_auth::DEFAULT_TOKEN_VALIDITY.as_secs()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Fully-qualified resource URLs derived from the config.
#[derive(Debug, Clone)]
pub struct Endpoints {
    database_url: String,
    resources: ResourcePaths,
}

impl Endpoints {
    /// Subscription listing for one user; the email is percent-encoded.
    pub fn subscriptions(&self, email: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(email.as_bytes()).collect();
        format!(
            "{}{}{}{}",
            self.database_url,
            self.resources.subscriptions_prefix,
            encoded,
            self.resources.subscriptions_suffix
        )
    }

    /// User record collection (POST to create, `/<id>` to delete).
    pub fn manage_user(&self) -> String {
        format!("{}{}", self.database_url, self.resources.manage_user_path)
    }

    /// Subscription flags of one user record.
    pub fn subscribe(&self, user_id: &str) -> String {
        format!(
            "{}{}/{}.json",
            self.database_url,
            self.resources.subscribe_path.trim_end_matches('/'),
            user_id
        )
    }
}

impl ClientConfig {
    pub fn auth_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.auth_path)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            database_url: format!(
                "{}{}",
                self.base_url.trim_end_matches('/'),
                self.resources.database_path
            ),
            resources: self.resources.clone(),
        }
    }

    pub fn token_validity(&self) -> Duration {
        Duration::from_secs(self.token_validity_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check values serde cannot: URL scheme and duration ranges.
    pub fn validate(&self) -> common::Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(common::Error::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.token_validity_secs == 0 {
            return Err(common::Error::Config(
                "token_validity_secs must be greater than 0".into(),
            ));
        }

        if Instant::now().checked_add(self.token_validity()).is_none() {
            return Err(common::Error::Config(format!(
                "token_validity_secs is too large: {}",
                self.token_validity_secs
            )));
        }

        if self.credentials.is_empty() {
            return Err(common::Error::Config(
                "at least one [credentials.<category>] table is required".into(),
            ));
        }

        Ok(())
    }

    /// Turn the configured logins into token store credentials. Every
    /// configured category must have had its password resolved.
    pub fn resolve_credentials(&self) -> common::Result<HashMap<Category, Credentials>> {
        self.credentials
            .iter()
            .map(|(category, entry)| {
                let password = entry.password.clone().ok_or_else(|| {
                    common::Error::MissingSecret(format!("password for category {category}"))
                })?;
                Ok((
                    *category,
                    Credentials {
                        username: entry.username.clone(),
                        password,
                    },
                ))
            })
            .collect()
    }
}
