//! In-process mock of the HubScore auth endpoint for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Form;
use axum::http::StatusCode;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::Notify;

pub struct MockAuthServer {
    pub url: String,
    pub hits: Arc<AtomicUsize>,
    pub last_form: Arc<Mutex<HashMap<String, String>>>,
}

/// Start a mock auth endpoint whose reply is computed from the submitted
/// form and the 1-based hit number.
pub async fn start_auth_server_with<F>(respond: F) -> MockAuthServer
where
    F: Fn(&HashMap<String, String>, usize) -> (StatusCode, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let last_form = Arc::new(Mutex::new(HashMap::new()));
    let respond = Arc::new(respond);

    let (hits_handle, form_handle) = (hits.clone(), last_form.clone());
    let app = axum::Router::new().route(
        "/auth",
        post(move |Form(form): Form<HashMap<String, String>>| {
            let (hits, last_form, respond) =
                (hits_handle.clone(), form_handle.clone(), respond.clone());
            async move {
                let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
                let reply = respond(&form, n);
                *last_form.lock().unwrap() = form;
                reply
            }
        }),
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockAuthServer {
        url: format!("http://{addr}/auth"),
        hits,
        last_form,
    }
}

/// Mock that always answers with the same status and body.
pub async fn start_static_auth_server(status: StatusCode, body: &'static str) -> MockAuthServer {
    start_auth_server_with(move |_, _| (status, body.to_string())).await
}

/// Mock that issues `<username>-<hit>` so every exchange yields a new token.
pub async fn start_auth_server() -> MockAuthServer {
    start_auth_server_with(|form, n| {
        let username = form.get("Username").cloned().unwrap_or_default();
        (
            StatusCode::OK,
            serde_json::json!({ "token": format!("{username}-{n}") }).to_string(),
        )
    })
    .await
}

/// Like `start_auth_server`, but every hit after the first signals
/// `entered` and waits for `release` before answering.
pub async fn start_held_auth_server(entered: Arc<Notify>, release: Arc<Notify>) -> MockAuthServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let last_form = Arc::new(Mutex::new(HashMap::new()));

    let (hits_handle, form_handle) = (hits.clone(), last_form.clone());
    let app = axum::Router::new().route(
        "/auth",
        post(move |Form(form): Form<HashMap<String, String>>| {
            let (hits, last_form) = (hits_handle.clone(), form_handle.clone());
            let (entered, release) = (entered.clone(), release.clone());
            async move {
                let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
                if n > 1 {
                    entered.notify_one();
                    release.notified().await;
                }
                let username = form.get("Username").cloned().unwrap_or_default();
                *last_form.lock().unwrap() = form;
                serde_json::json!({ "token": format!("{username}-{n}") }).to_string()
            }
        }),
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockAuthServer {
        url: format!("http://{addr}/auth"),
        hits,
        last_form,
    }
}

/// URL of a port that was just released, so connections are refused.
pub async fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/auth")
}
