mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use portfolio_api::messages;
use serde_json::{json, Value};

use common::{Factory, TestApp};

fn experience_body() -> Value {
    json!({
        "jobTitle": "Backend Engineer",
        "company": "Acme",
        "employmentType": "Full-time",
        "startDate": "2021-03-01",
        "description": "Built the billing platform",
        "technologies": ["Rust", "MongoDB"]
    })
}

fn image(name: &str) -> Part {
    Part::bytes(b"fake jpeg".to_vec())
        .file_name(name)
        .mime_type("image/jpeg")
}

fn experience_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("jobTitle", "Backend Engineer")
        .add_text("company", "Acme")
        .add_text("employmentType", "Full-time")
        .add_text("startDate", "2021-03-01")
        .add_text("description", "Built the billing platform")
        .add_text("isCurrent", "true")
        .add_text("technologies", "Rust")
}

#[tokio::test]
async fn test_create_experience_json() {
    let app = TestApp::new().await;

    let response = app.server.post("/api/experience").json(&experience_body()).await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EXPERIENCE_CREATED_SUCCESS);
    assert_eq!(body["data"]["jobTitle"], "Backend Engineer");
    assert_eq!(body["data"]["employmentType"], "Full-time");
    assert_eq!(body["data"]["workMode"], "On-site");
    assert_eq!(body["data"]["startDate"], "2021-03-01T00:00:00Z");
    assert_eq!(body["data"]["technologies"], json!(["Rust", "MongoDB"]));
}

#[tokio::test]
async fn test_create_experience_multipart_with_files() {
    let app = TestApp::new().await;

    let form = experience_form()
        .add_part("companyLogo", image("logo.jpg"))
        .add_part("images", image("office.jpg"))
        .add_part("images", image("team.jpg"));

    let response = app.server.post("/api/experience").multipart(form).await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["isCurrent"], true);
    assert_eq!(body["data"]["technologies"], json!(["Rust"]));
    assert_eq!(body["data"]["companyLogo"]["publicId"], "company-logos/1");

    let images = body["data"]["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["caption"], "office.jpg");
    assert_eq!(images[1]["publicId"], "experience-images/3");
}

#[tokio::test]
async fn test_create_experience_too_many_images() {
    let app = TestApp::new().await;

    let mut form = experience_form();
    for i in 0..11 {
        form = form.add_part("images", image(&format!("{i}.jpg")));
    }

    let response = app.server.post("/api/experience").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.media.uploads().await.is_empty());
}

#[tokio::test]
async fn test_create_experience_validation() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/experience")
        .json(&json!({ "jobTitle": "Engineer", "companyUrl": "acme" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(errors.contains(&"company is required"));
    assert!(errors.contains(&"companyUrl must be a valid URI"));
    assert!(errors.contains(&"startDate is required"));
    assert!(errors.contains(&"description is required"));
}

#[tokio::test]
async fn test_create_duplicate_experience() {
    let app = TestApp::new().await;

    app.server
        .post("/api/experience")
        .json(&experience_body())
        .await
        .assert_status(StatusCode::CREATED);

    let response = app.server.post("/api/experience").json(&experience_body()).await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EXPERIENCE_DUPLICATE);
}

#[tokio::test]
async fn test_same_role_with_different_start_is_not_duplicate() {
    let app = TestApp::new().await;

    app.server
        .post("/api/experience")
        .json(&experience_body())
        .await
        .assert_status(StatusCode::CREATED);

    let mut body = experience_body();
    body["startDate"] = json!("2023-05-01");

    app.server
        .post("/api/experience")
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_list_experiences() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    factory.create_experience("Engineer", "Acme").await;
    factory.create_experience("Lead", "Globex").await;

    let response = app.server.get("/api/experience").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EXPERIENCES_FETCH_SUCCESS);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_experience_invalid_id() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/experience/not-an-id").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], messages::INVALID_ID);
}

#[tokio::test]
async fn test_update_experience_replaces_images() {
    let app = TestApp::new().await;

    let created = app
        .server
        .post("/api/experience")
        .multipart(experience_form().add_part("images", image("old.jpg")))
        .await;
    let body: Value = created.json();
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let form = experience_form().add_part("images", image("new.jpg"));
    let response = app
        .server
        .put(&format!("/api/experience/{id}"))
        .multipart(form)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EXPERIENCE_UPDATE_SUCCESS);
    assert_eq!(body["data"]["images"][0]["caption"], "new.jpg");
    assert_eq!(
        app.media.deleted_ids().await,
        vec!["experience-images/1".to_string()]
    );
}

#[tokio::test]
async fn test_update_experience_clears_end_date() {
    let app = TestApp::new().await;
    let mut experience = Factory::new(&app.state)
        .create_experience("Engineer", "Acme")
        .await;
    experience.end_date = Some(common::factory::date("2023-01-01"));
    let experience = app.state.experiences.save(experience).await.unwrap();

    let mut body = experience_body();
    body["jobTitle"] = json!("Engineer");
    body["endDate"] = Value::Null;
    body["isCurrent"] = json!(true);

    let response = app
        .server
        .put(&format!("/api/experience/{}", experience.id.to_hex()))
        .json(&body)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["endDate"], Value::Null);
    assert_eq!(body["data"]["isCurrent"], true);
}

#[tokio::test]
async fn test_delete_experience_removes_media() {
    let app = TestApp::new().await;

    let created = app
        .server
        .post("/api/experience")
        .multipart(
            experience_form()
                .add_part("companyLogo", image("logo.jpg"))
                .add_part("images", image("office.jpg")),
        )
        .await;
    let body: Value = created.json();
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let response = app.server.delete(&format!("/api/experience/{id}")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EXPERIENCE_DELETE_SUCCESS);

    let mut deleted = app.media.deleted_ids().await;
    deleted.sort();
    assert_eq!(
        deleted,
        vec!["company-logos/1".to_string(), "experience-images/2".to_string()]
    );

    app.server
        .get(&format!("/api/experience/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
