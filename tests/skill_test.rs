mod common;

use axum::http::StatusCode;
use portfolio_api::messages;
use serde_json::{json, Value};

use common::{Factory, TestApp};

fn skill_body(name: &str) -> Value {
    json!({
        "name": name,
        "category": "Backend",
        "proficiency": 85,
        "level": "Advanced",
        "color": "#DEA584"
    })
}

#[tokio::test]
async fn test_create_skill() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).create_user().await;

    let response = app
        .server
        .post("/api/skills")
        .authorization_bearer(&auth.token)
        .json(&skill_body("Rust"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], messages::SKILL_CREATE_SUCCESS);
    assert_eq!(body["data"]["name"], "Rust");
    assert_eq!(body["data"]["proficiency"], 85);
    assert_eq!(body["data"]["level"], "Advanced");
    assert_eq!(body["data"]["isActive"], true);
}

#[tokio::test]
async fn test_create_skill_requires_auth() {
    let app = TestApp::new().await;

    let response = app.server.post("/api/skills").json(&skill_body("Rust")).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(app.state.skills.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_duplicate_skill() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;
    factory.create_skill("Rust").await;

    let response = app
        .server
        .post("/api/skills")
        .authorization_bearer(&auth.token)
        .json(&skill_body("Rust"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["message"], messages::SKILL_DUPLICATE);
}

#[tokio::test]
async fn test_create_skill_validation() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).create_user().await;

    let response = app
        .server
        .post("/api/skills")
        .authorization_bearer(&auth.token)
        .json(&json!({
            "name": "Rust",
            "category": "Backend",
            "proficiency": 101,
            "color": "orange",
            "projects": ["not-an-id"]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], messages::VALIDATION_ERROR);
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_create_skill_rejects_unknown_category() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).create_user().await;

    let response = app
        .server
        .post("/api/skills")
        .authorization_bearer(&auth.token)
        .json(&json!({ "name": "Rust", "category": "Systems", "proficiency": 80 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_skills_is_public_and_ordered() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    factory.create_skill("TypeScript").await;
    factory.create_skill("Go").await;

    let mut first = factory.create_skill("Rust").await;
    first.display_order = -1;
    app.state.skills.save(first).await.unwrap();

    let response = app.server.get("/api/skills").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::SKILLS_FETCH_SUCCESS);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Rust", "Go", "TypeScript"]);
}

#[tokio::test]
async fn test_get_skill() {
    let app = TestApp::new().await;
    let skill = Factory::new(&app.state).create_skill("Rust").await;

    let response = app
        .server
        .get(&format!("/api/skills/{}", skill.id.to_hex()))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["_id"], skill.id.to_hex());
}

#[tokio::test]
async fn test_get_skill_invalid_and_missing_ids() {
    let app = TestApp::new().await;

    let invalid = app.server.get("/api/skills/123").await;
    invalid.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = invalid.json();
    assert_eq!(body["message"], messages::INVALID_ID);

    let missing = app
        .server
        .get("/api/skills/507f1f77bcf86cd799439011")
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
    let body: Value = missing.json();
    assert_eq!(body["message"], messages::SKILL_NOT_FOUND);
}

#[tokio::test]
async fn test_update_skill() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;
    let skill = factory.create_skill("Rust").await;

    let mut body = skill_body("Rust");
    body["proficiency"] = json!(95);
    body["featured"] = json!(true);

    let response = app
        .server
        .put(&format!("/api/skills/{}", skill.id.to_hex()))
        .authorization_bearer(&auth.token)
        .json(&body)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::SKILL_UPDATE_SUCCESS);
    assert_eq!(body["data"]["proficiency"], 95);
    assert_eq!(body["data"]["featured"], true);
}

#[tokio::test]
async fn test_update_skill_rename_clash() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;
    factory.create_skill("Rust").await;
    let go = factory.create_skill("Go").await;

    let response = app
        .server
        .put(&format!("/api/skills/{}", go.id.to_hex()))
        .authorization_bearer(&auth.token)
        .json(&skill_body("Rust"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_skill() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;
    let skill = factory.create_skill("Rust").await;
    let path = format!("/api/skills/{}", skill.id.to_hex());

    let response = app
        .server
        .delete(&path)
        .authorization_bearer(&auth.token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::SKILL_DELETE_SUCCESS);
    assert_eq!(body["data"], Value::Null);

    app.server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    app.server
        .delete(&path)
        .authorization_bearer(&auth.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_login_create_and_list_skill() {
    let app = TestApp::new().await;

    app.server
        .post("/api/auth/register")
        .json(&json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "password": "password123"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let login = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "password123" }))
        .await;
    login.assert_status_ok();
    let body: Value = login.json();
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let skill = json!({ "name": "React.js", "category": "Frontend", "proficiency": 85 });
    app.server
        .post("/api/skills")
        .authorization_bearer(&token)
        .json(&skill)
        .await
        .assert_status(StatusCode::CREATED);
    app.server
        .post("/api/skills")
        .authorization_bearer(&token)
        .json(&skill)
        .await
        .assert_status(StatusCode::CONFLICT);

    let response = app.server.get("/api/skills").await;
    let body: Value = response.json();
    let skills = body["data"].as_array().unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0]["name"], "React.js");
    assert_eq!(skills[0]["category"], "Frontend");
    assert_eq!(skills[0]["proficiency"], 85);
}
