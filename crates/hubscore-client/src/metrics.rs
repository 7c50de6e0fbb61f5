//! Call metrics
//!
//! - `hubscore_calls_total` (counter): labels `verb`, `outcome`
//! - `hubscore_token_retries_total` (counter): label `category`
//!
//! Token exchanges are counted by the token store as
//! `hubscore_token_exchanges_total`. All of these are no-ops until the
//! embedding process installs a recorder.

use hubscore_auth::Category;

use crate::request::Verb;

/// Record a finished logical call. `outcome` is `success` or `Error::kind()`.
pub fn record_call(verb: Verb, outcome: &'static str) {
    ::metrics::counter!("hubscore_calls_total", "verb" => verb.as_str(), "outcome" => outcome)
        .increment(1);
}

/// Record a forced-refresh retry after a token-invalid answer.
pub fn record_token_retry(category: Category) {
    ::metrics::counter!("hubscore_token_retries_total", "category" => category.as_str())
        .increment(1);
}
