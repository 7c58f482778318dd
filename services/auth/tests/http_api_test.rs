//! HTTP 接口测试

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Duration;
use serde_json::{Value, json};
use tower::ServiceExt;
use zipper_auth::api::http::routes;
use zipper_auth::application::AccountService;
use zipper_auth::domain::OtpDispatcher;
use zipper_auth::infrastructure::{InMemoryUserRepository, LoggingEmailSender, LoggingSmsSender};
use zipper_otp::{OtpPolicy, OtpRegistry};

fn app() -> Router {
    let dispatcher = OtpDispatcher::new(
        Arc::new(LoggingSmsSender::new("Zipper")),
        Arc::new(LoggingEmailSender::new("noreply@zipper.local", "Your OTP")),
    );
    let service = AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(OtpRegistry::with_system_clock(OtpPolicy::development(
            Duration::seconds(300),
            "123456",
        ))),
        Arc::new(dispatcher),
    );

    routes(Arc::new(service))
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Option<String>, Value) {
    send(app, uri, Some("application/json"), body.to_string()).await
}

async fn send(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Option<String>, Value) {
    let mut request = Request::post(uri);
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::from(body)).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, content_type, json)
}

#[tokio::test]
async fn test_signup_verify_login_flow() {
    let app = app();

    let (status, _, body) = post(
        &app,
        "/signup",
        json!({
            "name": "Ada Rider",
            "identifier": "Ada@Example.com",
            "password": "correct horse",
            "role": "busOwner",
            "busCompany": "Coastline Coaches",
            "handlerName": "Grace"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OTP sent, please verify your account.");
    assert_eq!(body["identifier"], "ada@example.com");
    assert_eq!(body["expiresIn"], 300);

    let (status, _, body) = post(
        &app,
        "/login",
        json!({ "identifier": "ada@example.com", "password": "correct horse" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Account not verified. Please verify your OTP.");

    let (status, _, body) = post(
        &app,
        "/verify-otp",
        json!({ "identifier": "ada@example.com", "otp": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account verified successfully");
    assert_eq!(body["role"], "busOwner");
    assert!(body["userId"].is_string());

    let (status, _, body) = post(
        &app,
        "/login",
        json!({ "identifier": "ada@example.com", "password": "correct horse" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada Rider");
    assert_eq!(body["role"], "busOwner");
    assert_eq!(body["busCompany"], "Coastline Coaches");
}

#[tokio::test]
async fn test_missing_fields_return_problem_details() {
    let app = app();

    let (status, content_type, body) = post(&app, "/signup", json!({ "name": "Ada" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/problem+json"));
    assert_eq!(body["detail"], "Please fill all required fields");
    assert_eq!(body["status"], 400);
    assert_eq!(body["type"], "/problems/validation");
}

#[tokio::test]
async fn test_duplicate_signup_returns_conflict() {
    let app = app();
    let signup = json!({
        "name": "Ada",
        "identifier": "5551234567",
        "password": "pw",
        "role": "traveler"
    });

    let (status, _, _) = post(&app, "/signup", signup.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let mut duplicate = signup;
    duplicate["identifier"] = json!("+5551234567");
    let (status, _, body) = post(&app, "/signup", duplicate).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "This account is already in the system.");
}

#[tokio::test]
async fn test_verify_and_resend_errors() {
    let app = app();

    let (status, _, body) = post(
        &app,
        "/verify-otp",
        json!({ "identifier": "nobody@example.com", "code": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid or expired OTP");

    let (status, _, body) = post(
        &app,
        "/resend-otp",
        json!({ "identifier": "nobody@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
}

#[tokio::test]
async fn test_resend_otp() {
    let app = app();
    post(
        &app,
        "/signup",
        json!({
            "name": "Ada",
            "identifier": "ada@example.com",
            "password": "pw",
            "role": "traveler"
        }),
    )
    .await;

    let (status, _, body) = post(
        &app,
        "/resend-otp",
        json!({ "identifier": "ada@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OTP resent successfully");
    assert_eq!(body["expiresIn"], 300);
}

#[tokio::test]
async fn test_login_with_unknown_account() {
    let app = app();

    let (status, _, body) = post(
        &app,
        "/login",
        json!({ "identifier": "ghost@example.com", "password": "pw" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid credentials");
}

#[tokio::test]
async fn test_wrong_typed_field_returns_problem_details() {
    let app = app();

    let (status, content_type, body) = post(&app, "/signup", json!({ "name": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/problem+json"));
    assert_eq!(body["type"], "/problems/validation");
}

#[tokio::test]
async fn test_malformed_json_returns_problem_details() {
    let app = app();

    let (status, content_type, body) = send(
        &app,
        "/verify-otp",
        Some("application/json"),
        "not json".to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/problem+json"));
    assert_eq!(body["detail"], "Request body is not valid JSON");
}

#[tokio::test]
async fn test_non_json_content_type_returns_problem_details() {
    let app = app();
    let login = json!({ "identifier": "ada@example.com", "password": "pw" }).to_string();

    let (status, content_type, body) =
        send(&app, "/login", Some("text/plain"), login.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/problem+json"));
    assert_eq!(
        body["detail"],
        "Expected request with `Content-Type: application/json`"
    );

    let (status, content_type, _) = send(&app, "/login", None, login).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/problem+json"));
}
