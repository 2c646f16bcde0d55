mod common;

use axum::http::StatusCode;
use portfolio_api::messages;
use serde_json::{json, Value};

use common::{Factory, TestApp};

fn education_body() -> Value {
    json!({
        "institution": "University of Oslo",
        "degree": "BSc",
        "fieldOfStudy": "Informatics",
        "startDate": "2015-08-15",
        "endDate": "2018-06-01",
        "grade": "A",
        "certificates": [
            { "title": "Dean's list", "url": "https://uio.no/cert/1", "issueDate": "2017-06-01" }
        ]
    })
}

#[tokio::test]
async fn test_create_education() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).create_user().await;

    let response = app
        .server
        .post("/api/education")
        .authorization_bearer(&auth.token)
        .json(&education_body())
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EDUCATION_CREATE_SUCCESS);
    assert_eq!(body["data"]["institution"], "University of Oslo");
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["startDate"], "2015-08-15T00:00:00Z");
    assert_eq!(body["data"]["certificates"][0]["title"], "Dean's list");
}

#[tokio::test]
async fn test_create_education_requires_auth() {
    let app = TestApp::new().await;

    let response = app.server.post("/api/education").json(&education_body()).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_education_validation() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).create_user().await;

    let response = app
        .server
        .post("/api/education")
        .authorization_bearer(&auth.token)
        .json(&json!({
            "institution": "University of Oslo",
            "grade": "A very long grade text",
            "link": "uio",
            "certificates": [{ "url": "https://uio.no" }]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(errors.contains(&"degree is required"));
    assert!(errors.contains(&"fieldOfStudy is required"));
    assert!(errors.contains(&"startDate is required"));
    assert!(errors.contains(&"grade must be at most 20 characters"));
    assert!(errors.contains(&"link must be a valid URI"));
    assert!(errors.contains(&"certificates.title is required"));
}

#[tokio::test]
async fn test_create_duplicate_education() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).create_user().await;

    app.server
        .post("/api/education")
        .authorization_bearer(&auth.token)
        .json(&education_body())
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .post("/api/education")
        .authorization_bearer(&auth.token)
        .json(&education_body())
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EDUCATION_DUPLICATE);
}

#[tokio::test]
async fn test_list_educations_newest_first() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    factory.create_education("Old School", "2010-09-01").await;
    factory.create_education("New School", "2019-09-01").await;

    let response = app.server.get("/api/education").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EDUCATIONS_FETCH_SUCCESS);
    assert_eq!(body["data"][0]["institution"], "New School");
    assert_eq!(body["data"][1]["institution"], "Old School");
}

#[tokio::test]
async fn test_get_education() {
    let app = TestApp::new().await;
    let education = Factory::new(&app.state)
        .create_education("University of Oslo", "2015-08-15")
        .await;

    let response = app
        .server
        .get(&format!("/api/education/{}", education.id.to_hex()))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EDUCATION_FETCH_SUCCESS);

    app.server
        .get("/api/education/bad-id")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_education() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;
    let education = factory
        .create_education("University of Oslo", "2015-08-15")
        .await;

    let response = app
        .server
        .put(&format!("/api/education/{}", education.id.to_hex()))
        .authorization_bearer(&auth.token)
        .json(&json!({ "status": "in-progress", "endDate": null }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EDUCATION_UPDATE_SUCCESS);
    assert_eq!(body["data"]["status"], "in-progress");
    assert_eq!(body["data"]["endDate"], Value::Null);
    assert_eq!(body["data"]["institution"], "University of Oslo");
}

#[tokio::test]
async fn test_update_education_into_duplicate() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;
    factory.create_education("University of Oslo", "2015-08-15").await;
    let other = factory.create_education("NTNU", "2015-08-15").await;

    let response = app
        .server
        .put(&format!("/api/education/{}", other.id.to_hex()))
        .authorization_bearer(&auth.token)
        .json(&json!({ "institution": "University of Oslo" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_education_requires_a_field() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;
    let education = factory.create_education("NTNU", "2015-08-15").await;

    let response = app
        .server
        .put(&format!("/api/education/{}", education.id.to_hex()))
        .authorization_bearer(&auth.token)
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_education_rejects_blank_institution() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;
    let education = factory.create_education("NTNU", "2015-08-15").await;

    let response = app
        .server
        .put(&format!("/api/education/{}", education.id.to_hex()))
        .authorization_bearer(&auth.token)
        .json(&json!({ "institution": "   " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0], "institution cannot be empty");

    let stored = app.state.educations.find_by_id(education.id).await.unwrap();
    assert_eq!(stored.institution, "NTNU");
}

#[tokio::test]
async fn test_delete_education() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;
    let education = factory.create_education("NTNU", "2015-08-15").await;
    let path = format!("/api/education/{}", education.id.to_hex());

    let response = app
        .server
        .delete(&path)
        .authorization_bearer(&auth.token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EDUCATION_DELETE_SUCCESS);

    let missing = app.server.get(&path).await;
    missing.assert_status(StatusCode::NOT_FOUND);
    let body: Value = missing.json();
    assert_eq!(body["message"], messages::EDUCATION_NOT_FOUND);
}
