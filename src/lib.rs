// Library crate for the portfolio API
// Exports modules for use by the server binary and tests

pub mod config;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod media;
pub mod messages;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod validation;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::AppError;
use crate::handlers::{
    create_contact, create_education, create_experience, create_project, create_skill,
    delete_contact, delete_education, delete_experience, delete_project, delete_skill,
    get_contact, get_education, get_experience, get_profile, get_project, get_skill,
    list_contacts, list_educations, list_experiences, list_projects, list_skills, login,
    register, reset_password, update_contact, update_education, update_experience,
    update_profile, update_project, update_skill,
};
use crate::middlewares::auth_middleware;
use crate::state::AppState;

/// Most files a single multipart request may carry
const MAX_FILES_PER_REQUEST: usize = 11;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        // Profile routes
        .route("/api/profile", get(get_profile).put(update_profile))
        // Skill mutations
        .route("/api/skills", post(create_skill))
        .route("/api/skills/{id}", put(update_skill).delete(delete_skill))
        // Project mutations
        .route("/api/project", post(create_project))
        .route("/api/project/{id}", put(update_project).delete(delete_project))
        // Education mutations
        .route("/api/education", post(create_education))
        .route(
            "/api/education/{id}",
            put(update_education).delete(delete_education),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new()
        // Auth routes
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/reset-password", post(reset_password))
        // Read-only content
        .route("/api/skills", get(list_skills))
        .route("/api/skills/{id}", get(get_skill))
        .route("/api/project", get(list_projects))
        .route("/api/project/{id}", get(get_project))
        .route("/api/education", get(list_educations))
        .route("/api/education/{id}", get(get_education))
        // Experience routes
        .route(
            "/api/experience",
            get(list_experiences).post(create_experience),
        )
        .route(
            "/api/experience/{id}",
            get(get_experience)
                .put(update_experience)
                .delete(delete_experience),
        )
        // Contact routes
        .route("/api/contacts", get(list_contacts).post(create_contact))
        .route(
            "/api/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        );

    let body_limit = state.config.max_upload_bytes * MAX_FILES_PER_REQUEST;
    let cors = cors_layer(&state.config.cors_origin);

    Router::new()
        .route("/", get(|| async { "API Running" }))
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::NotFound(messages::ROUTE_NOT_FOUND.to_string())
}

/// CORS for `*` or a comma separated list of origins
fn cors_layer(origins: &str) -> CorsLayer {
    let allow_origin = if origins.trim() == "*" {
        AllowOrigin::any()
    } else {
        let list: Vec<HeaderValue> = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(list)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
