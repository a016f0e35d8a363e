//! ApiClient against an in-process backend: bearer auth, one-shot refresh
//! and replay, session clearing, error body extraction

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ivgk_client::{
    ApiClient, ClientConfig, ClientError, MemorySessionStore, Resources, Session, SessionStore,
};
use serde_json::{Value, json};
use shared::models::AuthTokens;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Backend {
    seen_auth: Mutex<Vec<String>>,
    refresh_calls: Mutex<Vec<Value>>,
}

async fn list_cards(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    backend.seen_auth.lock().unwrap().push(auth.clone());
    if auth == "Bearer fresh" {
        Json(json!([{"id": "c1", "urlAlias": "jane", "name": "Jane"}])).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"}))).into_response()
    }
}

async fn refresh(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    backend.refresh_calls.lock().unwrap().push(body.clone());
    if body["refreshToken"] == "good" {
        Json(json!({"accessToken": "fresh"})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid refresh token"}))).into_response()
    }
}

async fn missing_card() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": ["Card not found", "Check the id"], "statusCode": 404})),
    )
        .into_response()
}

async fn locked_card(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    backend.seen_auth.lock().unwrap().push(auth);
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "nope"}))).into_response()
}

async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/vcards", get(list_cards))
        .route("/api/vcards/missing", get(missing_card))
        .route("/api/vcards/locked", get(locked_card))
        .route("/api/auth/refresh", post(refresh))
        .with_state(Arc::clone(&backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), backend)
}

fn session_with(access: &str, refresh: Option<&str>) -> Arc<MemorySessionStore> {
    let mut session = Session::new(
        AuthTokens {
            access_token: access.into(),
            refresh_token: refresh.unwrap_or_default().into(),
        },
        None,
    );
    if refresh.is_none() {
        session.refresh_token = None;
    }
    Arc::new(MemorySessionStore::with_session(session))
}

fn client(base_url: &str, session: Arc<MemorySessionStore>) -> ApiClient {
    ApiClient::new(&ClientConfig::new(base_url).with_timeout(5), session).unwrap()
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed() {
    let (base_url, backend) = spawn_backend().await;
    let session = session_with("stale", Some("good"));
    let client = client(&base_url, session.clone());

    let cards = client.vcards().list().await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].url_alias, "jane");

    assert_eq!(
        *backend.seen_auth.lock().unwrap(),
        ["Bearer stale", "Bearer fresh"]
    );
    assert_eq!(
        *backend.refresh_calls.lock().unwrap(),
        [json!({"refreshToken": "good"})]
    );

    let stored = session.load();
    assert_eq!(stored.access_token.as_deref(), Some("fresh"));
    assert_eq!(stored.refresh_token.as_deref(), Some("good"));

    // Fresh token is used directly next time
    client.vcards().list().await.unwrap();
    assert_eq!(backend.refresh_calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_refresh_clears_session() {
    let (base_url, backend) = spawn_backend().await;
    let session = session_with("stale", Some("revoked"));
    let client = client(&base_url, session.clone());

    let err = client.vcards().list().await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message.as_deref(), Some("Invalid refresh token"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(backend.seen_auth.lock().unwrap().len(), 1);
    assert_eq!(session.load(), Session::default());
}

#[tokio::test]
async fn unauthorized_replay_clears_session() {
    let (base_url, backend) = spawn_backend().await;
    let session = session_with("stale", Some("good"));
    let client = client(&base_url, session.clone());

    let err = client.vcards().get("locked").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("nope"));

    assert_eq!(
        *backend.seen_auth.lock().unwrap(),
        ["Bearer stale", "Bearer fresh"]
    );
    assert_eq!(backend.refresh_calls.lock().unwrap().len(), 1);
    assert_eq!(session.load(), Session::default());
}

#[tokio::test]
async fn missing_refresh_token_clears_session_without_refreshing() {
    let (base_url, backend) = spawn_backend().await;
    let session = session_with("stale", None);
    let client = client(&base_url, session.clone());

    let err = client.vcards().list().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("Unauthorized"));
    assert!(backend.refresh_calls.lock().unwrap().is_empty());
    assert_eq!(session.load(), Session::default());
}

#[tokio::test]
async fn error_body_messages_are_joined() {
    let (base_url, _backend) = spawn_backend().await;
    let client = client(&base_url, session_with("fresh", Some("good")));

    let err = client.vcards().get("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Card not found, Check the id");
}
