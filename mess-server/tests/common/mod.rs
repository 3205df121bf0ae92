//! Shared helpers for integration tests
//!
//! Each test builds a full application (all middleware included) on top of
//! an in-memory database and drives it through `tower::ServiceExt::oneshot`,
//! so no ports are bound.

use axum::body::Body;
use axum::Router;
use http::{header, Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use mess_server::api::build_app;
use mess_server::{Config, ServerState};

pub async fn test_app() -> (Router, ServerState) {
    let work_dir = std::env::temp_dir().join(format!("mess-test-{}", uuid::Uuid::new_v4()));
    let config = Config::with_overrides(work_dir.to_string_lossy().to_string(), 0);
    let state = ServerState::initialize_in_memory(config).await;
    (build_app(state.clone()), state)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Send a multipart/form-data request carrying a single file field
pub async fn send_file(
    app: &Router,
    uri: &str,
    token: &str,
    filename: &str,
    bytes: Vec<u8>,
) -> Response<Body> {
    let boundary = "mess-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(&bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and return their token
pub async fn register_user(app: &Router, username: &str, email: &str, role: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": email,
            "password": "Abcdef12",
            "confirmPassword": "Abcdef12",
            "role": role,
            "termsAccepted": true,
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Create a menu item as the given staff user, returning its ID
pub async fn create_menu_item(app: &Router, staff_token: &str, title: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/menu",
        Some(staff_token),
        Some(json!({
            "title": title,
            "description": format!("{title} from the mess kitchen"),
            "mealType": "breakfast",
            "servingTime": "7:30 AM - 9:30 AM",
            "tags": ["vegetarian"],
            "ingredients": ["rice"],
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["id"].as_str().unwrap().to_string()
}
