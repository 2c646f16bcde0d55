use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing_subscriber::EnvFilter;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use portfolio_api::config::Config;
use portfolio_api::handlers::{
    AuthResponse, CertificateInput, CertificationInput, ContactRequest, EducationRequest,
    ExperienceRequest, LoginRequest, NoteInput, ProjectRequest, RegisterRequest, ReplyInput,
    ResetPasswordRequest, ResourceInput, SkillRequest, UpdateProfileRequest,
};
use portfolio_api::models::{
    ContactResponse, EducationResponse, ExperienceResponse, ProjectResponse, SkillResponse,
    UserResponse,
};
use portfolio_api::state::AppState;
use portfolio_api::{build_router, handlers};

/// Security scheme for Bearer token
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::reset_password,
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::skill::list_skills,
        handlers::skill::get_skill,
        handlers::skill::create_skill,
        handlers::skill::update_skill,
        handlers::skill::delete_skill,
        handlers::experience::list_experiences,
        handlers::experience::get_experience,
        handlers::experience::create_experience,
        handlers::experience::update_experience,
        handlers::experience::delete_experience,
        handlers::project::list_projects,
        handlers::project::get_project,
        handlers::project::create_project,
        handlers::project::update_project,
        handlers::project::delete_project,
        handlers::education::list_educations,
        handlers::education::get_education,
        handlers::education::create_education,
        handlers::education::update_education,
        handlers::education::delete_education,
        handlers::contact::create_contact,
        handlers::contact::list_contacts,
        handlers::contact::get_contact,
        handlers::contact::update_contact,
        handlers::contact::delete_contact,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        ResetPasswordRequest,
        AuthResponse,
        UserResponse,
        UpdateProfileRequest,
        SkillRequest,
        CertificationInput,
        ResourceInput,
        SkillResponse,
        ExperienceRequest,
        ExperienceResponse,
        ProjectRequest,
        ProjectResponse,
        EducationRequest,
        CertificateInput,
        EducationResponse,
        ContactRequest,
        ReplyInput,
        NoteInput,
        ContactResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and password reset"),
        (name = "Profile", description = "Owner profile, avatar and resume"),
        (name = "Skills", description = "Skill management endpoints"),
        (name = "Experience", description = "Work experience endpoints"),
        (name = "Projects", description = "Portfolio project endpoints"),
        (name = "Education", description = "Education history endpoints"),
        (name = "Contacts", description = "Contact inquiry endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    let addr = config.server_addr();

    // Per-IP limiter: `rate_limit_max` requests per window, refilled evenly
    let max = config.rate_limit_max.max(1);
    let refill_ms = (config.rate_limit_window_secs * 1000 / u64::from(max)).max(1);
    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(refill_ms)
        .burst_size(max)
        .finish()
        .context("Invalid rate limit configuration")?;

    let limiter = governor_conf.limiter().clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            limiter.retain_recent();
        }
    });

    // Initialize application state (connects to MongoDB, media host and mail)
    tracing::info!("Connecting to MongoDB...");
    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;
    tracing::info!("Database connection established");

    // Build the main application router
    let app = build_router(state)
        .layer(GovernorLayer::new(governor_conf))
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
