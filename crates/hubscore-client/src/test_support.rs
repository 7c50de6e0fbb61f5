//! In-process mock of the HubScore API for unit tests
//!
//! `/auth` issues `tok-<n>` on every exchange. Every other route is answered
//! by the test's responder and recorded for later assertions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use common::Secret;
use hubscore_auth::Category;
use tokio::net::TcpListener;

use crate::config::{
    ClientConfig, CredentialsConfig, ResourcePaths, SuccessCodes, TokenInvalidSignature,
};

pub const TOKEN_INVALID_BODY: &str = r#"{"code":99,"message":"invalid token"}"#;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// Decoded form fields of the body.
    pub fn form(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(self.body.as_bytes())
            .into_owned()
            .collect()
    }
}

pub struct MockHub {
    pub base_url: String,
    pub auth_hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHub {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn auth_hits(&self) -> usize {
        self.auth_hits.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> ClientConfig {
        let login = |name: &str| CredentialsConfig {
            username: name.to_string(),
            password: Some(Secret::from("pw")),
            password_file: None,
        };
        ClientConfig {
            base_url: self.base_url.clone(),
            auth_path: "/auth".into(),
            resources: ResourcePaths {
                database_path: "/db".into(),
                manage_user_path: "/records".into(),
                subscriptions_prefix: "/records.json?email=".into(),
                subscriptions_suffix: String::new(),
                subscribe_path: "/records".into(),
            },
            success_codes: SuccessCodes::default(),
            token_invalid: TokenInvalidSignature {
                code: 99,
                message: "invalid token".into(),
            },
            token_validity_secs: 36_000,
            request_timeout_secs: 5,
            credentials: HashMap::from([
                (Category::Newsletter, login("newsletter-user")),
                (Category::Alert, login("alert-user")),
            ]),
        }
    }
}

/// Start a mock hub. `respond` receives each resource request and its
/// 1-based position among resource requests.
pub async fn start_hub<F>(respond: F) -> MockHub
where
    F: Fn(&RecordedRequest, usize) -> (StatusCode, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let auth_hits = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let auth_counter = auth_hits.clone();
    let log = requests.clone();
    let app = axum::Router::new()
        .route(
            "/auth",
            post(move || {
                let counter = auth_counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    serde_json::json!({ "token": format!("tok-{n}") }).to_string()
                }
            }),
        )
        .fallback(move |request: Request<Body>| {
            let (log, respond) = (log.clone(), respond.clone());
            async move {
                let method = request.method().to_string();
                let uri = request.uri().to_string();
                let authorization = request
                    .headers()
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let bytes = axum::body::to_bytes(request.into_body(), 1024 * 1024)
                    .await
                    .unwrap();
                let recorded = RecordedRequest {
                    method,
                    uri,
                    authorization,
                    body: String::from_utf8_lossy(&bytes).to_string(),
                };
                let n = {
                    let mut log = log.lock().unwrap();
                    log.push(recorded.clone());
                    log.len()
                };
                respond(&recorded, n)
            }
        });
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockHub {
        base_url: format!("http://{addr}"),
        auth_hits,
        requests,
    }
}

/// Hub that rejects the first resource request's token and then answers
/// every request with `status` and `body`.
pub async fn start_hub_rejecting_first(status: StatusCode, body: &'static str) -> MockHub {
    start_hub(move |_, n| {
        if n == 1 {
            (StatusCode::UNAUTHORIZED, TOKEN_INVALID_BODY.to_string())
        } else {
            (status, body.to_string())
        }
    })
    .await
}
