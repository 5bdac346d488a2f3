//! Shared setup for integration tests: configuration, an in-memory database,
//! and the exact router the server runs.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use std::net::SocketAddr;
use std::sync::Once;
use std::time::Duration;
use tower::ServiceExt;
use util::{state::AppState, ws::WebSocketManager};

static INIT: Once = Once::new();

/// Populates the required environment before the global config is first read.
pub fn init_config() {
    INIT.call_once(|| unsafe {
        std::env::set_var("DATABASE_PATH", "sqlite::memory:");
        std::env::set_var("JWT_SECRET", "integration_test_secret");
        std::env::set_var("JWT_DURATION_MINUTES", "30");
    });
}

/// Builds the application router over a fresh in-memory database, returning
/// the state alongside so tests can subscribe to the WebSocket manager.
pub async fn test_app() -> (Router, AppState) {
    init_config();
    let db = db::test_utils::setup_test_db().await;
    let app_state = AppState::new(db, WebSocketManager::new());
    (api::app(app_state.clone()), app_state)
}

/// Spawns the router on a random local port for tests that need a real
/// socket (WebSocket upgrades).
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Polls the manager until it reports `expected` connections. Registration
/// and unregistration happen on the server's own tasks, so tests observe
/// them with a deadline rather than immediately.
pub async fn wait_for_connections(app_state: &AppState, expected: usize) {
    for _ in 0..200 {
        if app_state.ws().connection_count().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "connection count never reached {expected} (still {})",
        app_state.ws().connection_count().await
    );
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Response body was not valid JSON")
}

pub fn json_request(
    method: &str,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::empty())
        .expect("Failed to build request")
}

/// Registers a user through the API and returns their token.
pub async fn register_user(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "password123",
            }),
            None,
        ))
        .await
        .expect("register request failed");
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);

    let body = read_json(response).await;
    body["data"]["token"]
        .as_str()
        .expect("register response carried no token")
        .to_string()
}
