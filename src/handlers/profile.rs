use axum::extract::State;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::{ApiReply, FormPayload};
use crate::media::folders;
use crate::messages;
use crate::middlewares::AuthUser;
use crate::models::{Resume, SocialLinks, UserLocation, UserResponse};
use crate::services::MediaService;
use crate::state::AppState;
use crate::validation::{trimmed, FieldErrors};

// ============ Request/Response DTOs ============

/// Editable profile fields; anything else in the body is ignored
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<UserLocation>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub social_links: Option<SocialLinks>,
}

impl UpdateProfileRequest {
    fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.title.is_none()
            && self.bio.is_none()
            && self.social_links.is_none()
    }

    fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        errors.not_blank("firstName", &self.first_name);
        errors.max_len("firstName", self.first_name.as_deref(), 50);
        errors.not_blank("lastName", &self.last_name);
        errors.max_len("lastName", self.last_name.as_deref(), 50);
        errors.phone("phone", self.phone.as_deref());
        errors.max_len("title", self.title.as_deref(), 100);
        errors.max_len("bio", self.bio.as_deref(), 1000);

        if let Some(links) = &self.social_links {
            errors.uri("socialLinks.website", links.website.as_deref());
            errors.uri("socialLinks.linkedin", links.linkedin.as_deref());
            errors.uri("socialLinks.github", links.github.as_deref());
            errors.uri("socialLinks.twitter", links.twitter.as_deref());
            errors.uri("socialLinks.instagram", links.instagram.as_deref());
        }

        errors.finish()
    }
}

// ============ Handlers ============

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "User profile fetched successfully", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn get_profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiReply<UserResponse>> {
    let user_data = state.users.find_by_id(user.id).await.inspect_err(|_| {
        tracing::warn!("Profile requested for missing user: {}", user.id);
    })?;

    tracing::info!("Profile fetched for user: {}", user.id);
    Ok(ApiReply::ok(messages::USER_PROFILE_FETCHED, user_data.into()))
}

/// Update the authenticated user's profile
///
/// Accepts JSON, or multipart with optional `avatar` and `resume` files.
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "User profile updated successfully", body = UserResponse),
        (status = 400, description = "Validation error or nothing to update"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    mut payload: FormPayload<UpdateProfileRequest>,
) -> AppResult<ApiReply<UserResponse>> {
    payload.allow_files(&[("avatar", 1), ("resume", 1)])?;

    if payload.data.is_empty() && payload.files.is_empty() {
        tracing::warn!("Empty profile update from user: {}", user.id);
        return Err(AppError::BadRequest(messages::NO_VALID_FIELDS.to_string()));
    }
    payload.data.validate()?;

    let mut current = state.users.find_by_id(user.id).await?;
    let avatar = payload.take_file("avatar");
    let resume = payload.take_file("resume");
    let fields = payload.data;

    if let Some(first_name) = trimmed(fields.first_name) {
        current.first_name = first_name;
    }
    if let Some(last_name) = trimmed(fields.last_name) {
        current.last_name = last_name;
    }
    if let Some(phone) = trimmed(fields.phone) {
        current.phone = Some(phone);
    }
    if let Some(title) = trimmed(fields.title) {
        current.title = Some(title);
    }
    if let Some(bio) = trimmed(fields.bio) {
        current.bio = Some(bio);
    }
    if let Some(location) = fields.location {
        current.location = Some(location);
    }
    if let Some(links) = fields.social_links {
        current.social_links = Some(links);
    }

    if let Some(file) = avatar {
        if let Some(old) = current.avatar.take() {
            MediaService::delete_all(state.media.as_ref(), [old.public_id]).await?;
        }
        let asset = MediaService::upload_one(state.media.as_ref(), &file, folders::AVATARS).await?;
        tracing::info!("Avatar uploaded for user {}: {}", user.id, asset.public_id);
        current.avatar = Some(asset);
    }

    if let Some(file) = resume {
        if let Some(old) = current.resume.take() {
            MediaService::delete_all(state.media.as_ref(), [old.public_id]).await?;
        }
        let asset = MediaService::upload_one(state.media.as_ref(), &file, folders::RESUMES).await?;
        tracing::info!("Resume uploaded for user {}: {}", user.id, asset.public_id);
        current.resume = Some(Resume {
            url: asset.url,
            public_id: asset.public_id,
            file_name: file.file_name,
            uploaded_at: bson::DateTime::now(),
        });
    }

    let updated = state.users.save(current).await?;
    tracing::info!("Profile updated for user: {}", updated.id);

    Ok(ApiReply::ok(messages::USER_PROFILE_UPDATED, updated.into()))
}
