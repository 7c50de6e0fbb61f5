//! HubScore resource operations
//!
//! Thin layer over `AuthenticatedHttpClient::call()` that knows the hub's
//! URLs and parameter shapes. Bodies are returned raw: interpreting
//! subscription fields is left to the caller.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info};

use hubscore_auth::Category;

use crate::client::AuthenticatedHttpClient;
use crate::config::{ClientConfig, Endpoints};
use crate::error::{Error, Result};
use crate::request::{ApiRequest, datas_param};

/// Resource-level API for one hub.
pub struct HubScoreApi {
    client: AuthenticatedHttpClient,
    endpoints: Endpoints,
}

impl HubScoreApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: AuthenticatedHttpClient::new(config)?,
            endpoints: config.endpoints(),
        })
    }

    /// Raw `{"records":[...]}` listing for one user.
    pub async fn user_subscriptions(&self, email: &str, category: Category) -> Result<String> {
        let request = ApiRequest::get(self.endpoints.subscriptions(email));
        self.client.call(&request, category).await
    }

    /// Hub record id of a user, or `None` when the listing has no record.
    pub async fn user_id(&self, email: &str, category: Category) -> Result<Option<String>> {
        let body = self.user_subscriptions(email, category).await?;
        extract_user_id(&body).map_err(|reason| Error::MalformedResponse {
            status: 200,
            body,
            reason,
        })
    }

    /// Create a user record for `email`.
    pub async fn create_user(&self, email: &str, category: Category) -> Result<String> {
        let user = BTreeMap::from([("Email".to_string(), email.to_string())]);
        let request = ApiRequest::post(self.endpoints.manage_user(), [("datas", datas_param(&user))]);
        info!(%category, "creating hub user");
        self.client.call(&request, category).await
    }

    /// Delete the user record for `email`.
    pub async fn delete_user(&self, email: &str, category: Category) -> Result<String> {
        let id = self
            .user_id(email, category)
            .await?
            .ok_or_else(|| Error::UserNotFound {
                email: email.to_string(),
                category,
            })?;
        let request = ApiRequest::delete(&self.endpoints.manage_user(), &id);
        info!(%category, user_id = %id, "deleting hub user");
        self.client.call(&request, category).await
    }

    /// Write subscription fields for `email`, creating the user first when
    /// the hub does not know it yet.
    pub async fn update_subscriptions(
        &self,
        email: &str,
        fields: &BTreeMap<String, String>,
        category: Category,
    ) -> Result<String> {
        let id = match self.user_id(email, category).await? {
            Some(id) => id,
            None => {
                debug!(%category, "user unknown to hub, creating before update");
                self.create_user(email, category).await?;
                self.user_id(email, category)
                    .await?
                    .ok_or_else(|| Error::UserNotFound {
                        email: email.to_string(),
                        category,
                    })?
            }
        };

        let request = ApiRequest::patch(self.endpoints.subscribe(&id), fields);
        info!(%category, user_id = %id, fields = fields.len(), "updating subscriptions");
        self.client.call(&request, category).await
    }
}

/// First `id` among the listing's records. Accepts string or numeric ids.
fn extract_user_id(body: &str) -> std::result::Result<Option<String>, String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("listing is not JSON: {e}"))?;

    let Some(records) = value.get("records").and_then(Value::as_array) else {
        return Ok(None);
    };

    Ok(records
        .iter()
        .filter_map(|record| match record.get("id") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .next())
}
