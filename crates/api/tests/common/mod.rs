#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use keepsake_api::auth::jwt::{generate_access_token, Identity, JwtConfig};
use keepsake_api::config::{LogFormat, ServerConfig};
use keepsake_api::router::build_app_router;
use keepsake_api::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const TEST_UPLOAD_SECRET: &str = "test-upload-callback-secret";

/// Build a test `ServerConfig` with safe defaults.
///
/// Caching is on with the production default TTL so tests also cover
/// invalidation.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        upload_callback_secret: TEST_UPLOAD_SECRET.to_string(),
        cache_ttl_secs: 60,
        verify_anchor_text: false,
        log_format: LogFormat::Text,
    }
}

/// Application state over `pool` with the test config.
pub fn build_test_state(pool: PgPool) -> AppState {
    AppState::new(pool, test_config())
}

/// Build the full application router around `pool`, with the same
/// middleware stack as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(build_test_state(pool))
}

/// Bearer token for the identity `sub`, with email `{sub}@example.com`.
pub fn token_for(sub: &str) -> String {
    let identity = Identity {
        sub: sub.to_string(),
        email: format!("{sub}@example.com"),
        name: sub.to_string(),
        picture: None,
    };
    generate_access_token(&identity, &test_config().jwt).expect("token generation should succeed")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), None)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, request(Method::PUT, uri, None, Some(body))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

/// POST a raw callback body with the given signature header.
pub async fn post_signed(app: Router, uri: &str, body: &str, signature: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header(keepsake_core::uploads::SIGNATURE_HEADER, signature)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Create a document through the API and return its JSON.
pub async fn create_document(
    app: Router,
    token: &str,
    title: &str,
    content: &str,
    visibility: &str,
) -> serde_json::Value {
    let response = post_json_auth(
        app,
        "/api/v1/documents",
        serde_json::json!({ "title": title, "content": content, "visibility": visibility }),
        token,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Make `collaborator_sub` an active collaborator on `document_id`.
///
/// The collaborator signs in first, so the invite attaches them directly.
pub async fn add_collaborator(
    app: Router,
    owner_token: &str,
    document_id: i64,
    collaborator_sub: &str,
) {
    let collaborator_token = token_for(collaborator_sub);
    let response = get_auth(app.clone(), "/api/v1/user/settings", &collaborator_token).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let response = post_json_auth(
        app,
        &format!("/api/v1/documents/{document_id}/invitations"),
        serde_json::json!({ "email": format!("{collaborator_sub}@example.com") }),
        owner_token,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
}
