//! Subscription categories and their credential pairs

use std::fmt;
use std::str::FromStr;

use common::Secret;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The two communication categories HubScore tracks. Each one authenticates
/// with its own account and holds its own token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Newsletter,
    Alert,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Newsletter, Category::Alert];

    /// Label for logs, metrics and config keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Newsletter => "newsletter",
            Category::Alert => "alert",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newsletter" => Ok(Category::Newsletter),
            "alert" => Ok(Category::Alert),
            other => Err(Error::UnknownCategory(other.to_string())),
        }
    }
}

/// Username/password pair for one category's HubScore account.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<Secret<String>>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
