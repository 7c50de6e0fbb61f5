//! Per-verb request shaping
//!
//! An `ApiRequest` is a verb, a URL and an optional list of form fields. It
//! is built once and can be sent any number of times, which is what lets the
//! retry path re-issue the identical request with only the token changed.

use std::collections::BTreeMap;
use std::fmt;

/// HTTP verbs the hub API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Patch,
    Delete,
}

impl Verb {
    pub fn method(self) -> reqwest::Method {
        match self {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Patch => reqwest::Method::PATCH,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to be sent with a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    verb: Verb,
    url: String,
    form: Vec<(String, String)>,
}

/// JSON-encode a field map for the hub's `datas` parameter.
pub fn datas_param(fields: &BTreeMap<String, String>) -> String {
    serde_json::json!(fields).to_string()
}

impl ApiRequest {
    /// GET with headers only.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            verb: Verb::Get,
            url: url.into(),
            form: Vec::new(),
        }
    }

    /// POST with URL-encoded form fields.
    pub fn post<K, V>(url: impl Into<String>, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            verb: Verb::Post,
            url: url.into(),
            form: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// PATCH carrying the field map twice: JSON-encoded under `datas`, then
    /// flattened as individual form pairs.
    pub fn patch(url: impl Into<String>, fields: &BTreeMap<String, String>) -> Self {
        let mut form = Vec::with_capacity(fields.len() + 1);
        form.push(("datas".to_string(), datas_param(fields)));
        form.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            verb: Verb::Patch,
            url: url.into(),
            form,
        }
    }

    /// DELETE of `<url>/<resource_id>`.
    pub fn delete(url: &str, resource_id: &str) -> Self {
        Self {
            verb: Verb::Delete,
            url: format!("{}/{}", url.trim_end_matches('/'), resource_id),
            form: Vec::new(),
        }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn form(&self) -> &[(String, String)] {
        &self.form
    }

    /// Build the reqwest request with the bearer token attached.
    pub(crate) fn build(&self, client: &reqwest::Client, token: &str) -> reqwest::RequestBuilder {
        let builder = client
            .request(self.verb.method(), &self.url)
            .bearer_auth(token);
        if self.form.is_empty() {
            builder
        } else {
            builder.form(&self.form)
        }
    }
}
