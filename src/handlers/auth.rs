use axum::extract::State;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::{ApiReply, AppJson};
use crate::messages;
use crate::models::{Role, User, UserResponse};
use crate::services::AuthService;
use crate::state::AppState;
use crate::validation::FieldErrors;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl RegisterRequest {
    fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        errors.required("firstName", &self.first_name);
        errors.len_between("firstName", self.first_name.as_deref(), 2, 50);
        errors.required("lastName", &self.last_name);
        errors.len_between("lastName", self.last_name.as_deref(), 2, 50);
        errors.required("email", &self.email);
        errors.email("email", self.email.as_deref());
        errors.required("password", &self.password);
        errors.min_len("password", self.password.as_deref(), 6);

        errors.finish()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        errors.required("email", &self.email);
        errors.email("email", self.email.as_deref());
        errors.required("password", &self.password);

        errors.finish()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl ResetPasswordRequest {
    fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        errors.required("email", &self.email);
        errors.email("email", self.email.as_deref());
        errors.required("password", &self.password);
        errors.min_len("password", self.password.as_deref(), 6);

        errors.finish()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

// ============ Handlers ============

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 409, description = "Email already exists"),
        (status = 400, description = "Validation error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<ApiReply<AuthResponse>> {
    payload.validate()?;

    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    tracing::info!("Register request for {}", email);

    if state.users.email_exists(&email).await? {
        tracing::warn!("Register attempt with existing email: {}", email);
        return Err(AppError::Conflict(messages::DUPLICATE_ENTRY.to_string()));
    }

    let password_hash = AuthService::hash_password(&password, &state.config)?;

    let user = User::new(
        payload.first_name.unwrap_or_default().trim().to_string(),
        payload.last_name.unwrap_or_default().trim().to_string(),
        &email,
        password_hash,
        payload.role.unwrap_or_default(),
    );
    let user = state.users.insert(user).await?;
    tracing::info!("User created: {}", user.id);

    let token = AuthService::generate_token(user.id, &user.email, &state.config)?;

    Ok(ApiReply::created(
        messages::REGISTER_SUCCESS,
        AuthResponse {
            user: user.into(),
            token,
        },
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<ApiReply<AuthResponse>> {
    payload.validate()?;

    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let invalid = || AppError::Unauthorized(messages::INVALID_CREDENTIALS.to_string());

    let Some(user) = state.users.find_by_email(&email).await? else {
        tracing::warn!("Login with unknown email: {}", email);
        return Err(invalid());
    };

    if !AuthService::verify_password(&password, &user.password_hash)? {
        tracing::warn!("Invalid password attempt for user: {}", user.id);
        return Err(invalid());
    }

    let token = AuthService::generate_token(user.id, &user.email, &state.config)?;
    tracing::info!("User logged in: {}", user.id);

    Ok(ApiReply::ok(
        messages::LOGIN_SUCCESS,
        AuthResponse {
            user: user.into(),
            token,
        },
    ))
}

/// Replace the password of the account with the given email
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset successfully"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    ),
    tag = "Auth"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> AppResult<ApiReply<()>> {
    payload.validate()?;

    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let Some(mut user) = state.users.find_by_email(&email).await? else {
        tracing::warn!("Password reset for unknown email: {}", email);
        return Err(AppError::NotFound(messages::USER_NOT_FOUND.to_string()));
    };

    user.password_hash = AuthService::hash_password(&password, &state.config)?;
    let user = state.users.save(user).await?;
    tracing::info!("Password updated for user: {}", user.id);

    Ok(ApiReply::message(messages::PASSWORD_RESET_SUCCESS))
}
