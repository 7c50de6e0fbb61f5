//! HubScore bearer-token authentication
//!
//! Exchanges a category's username/password for a bearer token and caches
//! the result in memory, one slot per category. Nothing is persisted; a
//! restarted process authenticates again on first use.
//!
//! Token flow:
//! 1. Caller asks `TokenStore::get(category, false)`
//! 2. Cache hit (present and not past `expires_at`) returns the cached token
//! 3. Otherwise `exchange::exchange_credentials()` POSTs `Username`/`Password`
//! 4. The returned token overwrites the category's slot
//! 5. A caller that saw the hub reject a token calls `get(category, true)`

pub mod category;
pub mod error;
pub mod exchange;
pub mod store;

#[cfg(test)]
mod test_support;

pub use category::{Category, Credentials};
pub use error::{Error, Result};
pub use exchange::{TokenResponse, exchange_credentials};
pub use store::{CachedToken, DEFAULT_TOKEN_VALIDITY, TokenStore};
