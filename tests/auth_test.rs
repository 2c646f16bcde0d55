mod common;

use axum::http::StatusCode;
use portfolio_api::messages;
use serde_json::{json, Value};

use common::factory::PASSWORD;
use common::{Factory, TestApp};

fn register_body(email: &str) -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": email,
        "password": "password123"
    })
}

#[tokio::test]
async fn test_root_reports_running() {
    let app = TestApp::new().await;

    let response = app.server.get("/").await;

    response.assert_status_ok();
    response.assert_text("API Running");
}

#[tokio::test]
async fn test_unknown_route_returns_error_envelope() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/nowhere").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], messages::ROUTE_NOT_FOUND);
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&register_body("ada@example.com"))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], messages::REGISTER_SUCCESS);
    assert!(body["data"]["token"].as_str().is_some());
    assert!(body["data"]["user"]["_id"].as_str().is_some());
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    assert_eq!(body["data"]["user"]["fullName"], "Ada Lovelace");
    assert_eq!(body["data"]["user"]["role"], "user");
    assert!(body["data"]["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_stores_hashed_password() {
    let app = TestApp::new().await;

    app.server
        .post("/api/auth/register")
        .json(&register_body("ada@example.com"))
        .await
        .assert_status(StatusCode::CREATED);

    let user = app
        .state
        .users
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(user.password_hash, "password123");
    assert!(user.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    factory
        .create_user_with_email("ada@example.com", PASSWORD)
        .await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&register_body("ADA@Example.com"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_register_validation_lists_every_field() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "firstName": "A",
            "email": "not-an-email",
            "password": "123"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["message"], messages::VALIDATION_ERROR);
    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(errors.contains(&"firstName must be between 2 and 50 characters"));
    assert!(errors.contains(&"lastName is required"));
    assert!(errors.contains(&"email must be a valid email"));
    assert!(errors.contains(&"password must be at least 6 characters"));
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    factory
        .create_user_with_email("ada@example.com", PASSWORD)
        .await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": "ada@example.com",
            "password": PASSWORD
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], messages::LOGIN_SUCCESS);
    assert!(body["data"]["token"].as_str().is_some());
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    factory
        .create_user_with_email("ada@example.com", PASSWORD)
        .await;

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "wrongpassword" }))
        .await;
    let unknown_email = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": PASSWORD }))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_email.assert_status(StatusCode::UNAUTHORIZED);

    let a: Value = wrong_password.json();
    let b: Value = unknown_email.json();
    assert_eq!(a["message"], messages::INVALID_CREDENTIALS);
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_reset_password_then_login() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    factory
        .create_user_with_email("ada@example.com", PASSWORD)
        .await;

    let response = app
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "email": "ada@example.com", "password": "brand-new-secret" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::PASSWORD_RESET_SUCCESS);
    assert_eq!(body["data"], Value::Null);

    app.server
        .post("/api/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": PASSWORD }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .post("/api/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "brand-new-secret" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_reset_password_unknown_user() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "email": "nobody@example.com", "password": "whatever" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], messages::USER_NOT_FOUND);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/profile").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], messages::TOKEN_MISSING);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get("/api/profile")
        .authorization_bearer("invalid_token")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], messages::INVALID_TOKEN);
}

#[tokio::test]
async fn test_token_from_register_opens_profile() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&register_body("ada@example.com"))
        .await;
    let body: Value = response.json();
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let profile = app
        .server
        .get("/api/profile")
        .authorization_bearer(token)
        .await;

    profile.assert_status_ok();
    let body: Value = profile.json();
    assert_eq!(body["data"]["email"], "ada@example.com");
}
