//! Classification of HubScore error payloads
//!
//! A failed call answers `{"code": <int>, "message": <string>}`. Only the
//! configured `(code, message)` pair means "get a new token and retry";
//! every other code is a business rejection, and a body that is not JSON or
//! has no usable `code` cannot be interpreted at all.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::TokenInvalidSignature;

/// Error payload parsed from a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}

/// What a failed answer means for the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Token expired or invalid: refresh and retry once
    TokenInvalid,
    /// Any other error code: return as-is
    Rejected(ApiError),
    /// Not JSON, or no numeric `code`: unrecoverable
    Malformed(String),
}

/// `99.0` counts as 99; fractional or out-of-range values do not.
fn whole_number(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

/// Parse an error body. `code` may be a JSON number (integral, or a float
/// with no fractional part) or a numeric string.
pub fn parse_api_error(body: &str) -> Result<ApiError, String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("error body is not JSON: {e}"))?;

    let code = match value.get("code") {
        Some(Value::Number(n)) => n.as_i64().or_else(|| whole_number(n.as_f64()?)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| "error body has no numeric code".to_string())?;

    let message = match value.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    Ok(ApiError { code, message })
}

/// Classify a non-success body against the configured token-invalid signature.
pub fn classify(body: &str, signature: &TokenInvalidSignature) -> Classification {
    match parse_api_error(body) {
        Ok(err) if err.code == signature.code && err.message == signature.message => {
            Classification::TokenInvalid
        }
        Ok(err) => Classification::Rejected(err),
        Err(reason) => Classification::Malformed(reason),
    }
}
