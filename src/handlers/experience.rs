use axum::extract::{Path, State};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::{ApiReply, FormPayload};
use crate::media::{folders, UploadFile};
use crate::messages;
use crate::models::{
    EmploymentType, Experience, ExperienceImage, ExperienceResponse, Location, RoleProject,
    WorkMode,
};
use crate::services::MediaService;
use crate::state::AppState;
use crate::validation::{
    lenient, nullable, one_or_many, parse_object_id, trimmed, DateValue, FieldErrors,
};

const FILE_FIELDS: &[(&str, usize)] = &[("companyLogo", 1), ("images", 10)];

// ============ Request/Response DTOs ============

/// Body of both create and update, as JSON or multipart form fields
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRequest {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub company_url: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub work_mode: Option<WorkMode>,
    pub location: Option<Location>,
    #[schema(value_type = Option<String>)]
    pub start_date: Option<DateValue>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<Option<DateValue>>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_current: Option<bool>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub responsibilities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub achievements: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub technologies: Option<Vec<String>>,
    pub projects: Option<Vec<RoleProject>>,
    pub images: Option<Vec<ExperienceImage>>,
    #[serde(default, deserialize_with = "lenient")]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_order: Option<i32>,
}

impl ExperienceRequest {
    fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        errors.required("jobTitle", &self.job_title);
        errors.max_len("jobTitle", self.job_title.as_deref(), 100);
        errors.required("company", &self.company);
        errors.max_len("company", self.company.as_deref(), 100);
        errors.uri("companyUrl", self.company_url.as_deref());
        errors.required("employmentType", &self.employment_type.map(|_| true));
        errors.required("startDate", &self.start_date);
        errors.required("description", &self.description);
        errors.max_len("description", self.description.as_deref(), 2000);

        for project in self.projects.iter().flatten() {
            errors.uri("projects.url", project.url.as_deref());
        }

        errors.finish()
    }

    fn apply(self, experience: &mut Experience) {
        if let Some(job_title) = trimmed(self.job_title) {
            experience.job_title = job_title;
        }
        if let Some(company) = trimmed(self.company) {
            experience.company = company;
        }
        if let Some(url) = trimmed(self.company_url) {
            experience.company_url = Some(url);
        }
        if let Some(kind) = self.employment_type {
            experience.employment_type = kind;
        }
        if let Some(mode) = self.work_mode {
            experience.work_mode = mode;
        }
        if let Some(location) = self.location {
            experience.location = Some(location);
        }
        if let Some(start) = self.start_date {
            experience.start_date = start.into();
        }
        if let Some(end) = self.end_date {
            experience.end_date = end.map(Into::into);
        }
        if let Some(current) = self.is_current {
            experience.is_current = current;
        }
        if let Some(description) = trimmed(self.description) {
            experience.description = description;
        }
        if let Some(items) = self.responsibilities {
            experience.responsibilities = items;
        }
        if let Some(items) = self.achievements {
            experience.achievements = items;
        }
        if let Some(items) = self.technologies {
            experience.technologies = items;
        }
        if let Some(projects) = self.projects {
            experience.projects = projects;
        }
        if let Some(images) = self.images {
            experience.images = images;
        }
        if let Some(featured) = self.featured {
            experience.featured = featured;
        }
        if let Some(order) = self.display_order {
            experience.display_order = order;
        }
    }
}

async fn upload_images(state: &AppState, files: &[UploadFile]) -> AppResult<Vec<ExperienceImage>> {
    let uploaded =
        MediaService::upload_all(state.media.as_ref(), files, folders::EXPERIENCE_IMAGES).await?;

    Ok(uploaded
        .into_iter()
        .map(|(asset, file_name)| ExperienceImage {
            url: asset.url,
            public_id: Some(asset.public_id),
            caption: Some(file_name),
        })
        .collect())
}

// ============ Handlers ============

/// List all experience entries
#[utoipa::path(
    get,
    path = "/api/experience",
    responses(
        (status = 200, description = "Experiences ordered by displayOrder then newest start", body = [ExperienceResponse])
    ),
    tag = "Experience"
)]
pub async fn list_experiences(
    State(state): State<AppState>,
) -> AppResult<ApiReply<Vec<ExperienceResponse>>> {
    let experiences = state.experiences.list().await?;
    tracing::info!("{} experiences fetched", experiences.len());

    Ok(ApiReply::ok(
        messages::EXPERIENCES_FETCH_SUCCESS,
        experiences.into_iter().map(Into::into).collect(),
    ))
}

/// Get an experience entry by ID
#[utoipa::path(
    get,
    path = "/api/experience/{id}",
    params(
        ("id" = String, Path, description = "Experience ID")
    ),
    responses(
        (status = 200, description = "Experience details", body = ExperienceResponse),
        (status = 400, description = "Invalid ID format"),
        (status = 404, description = "Experience not found")
    ),
    tag = "Experience"
)]
pub async fn get_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiReply<ExperienceResponse>> {
    let id = parse_object_id(&id)?;
    let experience = state.experiences.find_by_id(id).await.inspect_err(|_| {
        tracing::warn!("Experience not found: {}", id);
    })?;

    Ok(ApiReply::ok(messages::EXPERIENCE_FETCH_SUCCESS, experience.into()))
}

/// Create an experience entry
///
/// Accepts JSON, or multipart with `companyLogo` (1) and `images` (up to 10).
#[utoipa::path(
    post,
    path = "/api/experience",
    request_body = ExperienceRequest,
    responses(
        (status = 201, description = "Experience created successfully", body = ExperienceResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Same role at the same company and start date exists")
    ),
    tag = "Experience"
)]
pub async fn create_experience(
    State(state): State<AppState>,
    mut payload: FormPayload<ExperienceRequest>,
) -> AppResult<ApiReply<ExperienceResponse>> {
    payload.allow_files(FILE_FIELDS)?;
    payload.data.validate()?;

    let fields = &payload.data;
    let job_title = fields.job_title.as_deref().unwrap_or_default().trim().to_string();
    let company = fields.company.as_deref().unwrap_or_default().trim().to_string();
    let Some(start_date) = fields.start_date.map(DateValue::into_bson) else {
        return Err(AppError::Validation(vec!["startDate is required".into()]));
    };

    if state
        .experiences
        .find_duplicate(&job_title, &company, start_date)
        .await?
        .is_some()
    {
        tracing::warn!("Duplicate experience: {} at {}", job_title, company);
        return Err(AppError::Conflict(messages::EXPERIENCE_DUPLICATE.to_string()));
    }

    let mut experience = Experience::new(
        job_title,
        company,
        fields.employment_type.unwrap_or(EmploymentType::FullTime),
        start_date,
        String::new(),
    );

    let logo = payload.take_file("companyLogo");
    let images = payload.take_files("images");
    payload.data.apply(&mut experience);

    if let Some(file) = logo {
        let asset =
            MediaService::upload_one(state.media.as_ref(), &file, folders::COMPANY_LOGOS).await?;
        experience.company_logo = Some(asset);
    }
    if !images.is_empty() {
        experience.images = upload_images(&state, &images).await?;
    }

    let experience = state.experiences.insert(experience).await?;
    tracing::info!("Experience created: {}", experience.id);

    Ok(ApiReply::created(messages::EXPERIENCE_CREATED_SUCCESS, experience.into()))
}

/// Update an experience entry
///
/// Uploaded `companyLogo` or `images` replace every stored blob of that field.
#[utoipa::path(
    put,
    path = "/api/experience/{id}",
    params(
        ("id" = String, Path, description = "Experience ID")
    ),
    request_body = ExperienceRequest,
    responses(
        (status = 200, description = "Experience updated successfully", body = ExperienceResponse),
        (status = 400, description = "Validation error or invalid ID"),
        (status = 404, description = "Experience not found")
    ),
    tag = "Experience"
)]
pub async fn update_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut payload: FormPayload<ExperienceRequest>,
) -> AppResult<ApiReply<ExperienceResponse>> {
    let id = parse_object_id(&id)?;
    payload.allow_files(FILE_FIELDS)?;
    payload.data.validate()?;

    let mut experience = state.experiences.find_by_id(id).await.inspect_err(|_| {
        tracing::warn!("Experience not found: {}", id);
    })?;

    let logo = payload.take_file("companyLogo");
    let images = payload.take_files("images");
    payload.data.apply(&mut experience);

    if let Some(file) = logo {
        if let Some(old) = experience.company_logo.take() {
            MediaService::delete_all(state.media.as_ref(), [old.public_id]).await?;
        }
        let asset =
            MediaService::upload_one(state.media.as_ref(), &file, folders::COMPANY_LOGOS).await?;
        experience.company_logo = Some(asset);
    }

    if !images.is_empty() {
        let old: Vec<String> = experience
            .images
            .drain(..)
            .filter_map(|img| img.public_id)
            .collect();
        MediaService::delete_all(state.media.as_ref(), old).await?;
        experience.images = upload_images(&state, &images).await?;
    }

    let experience = state.experiences.save(experience).await?;
    tracing::info!("Experience updated: {}", id);

    Ok(ApiReply::ok(messages::EXPERIENCE_UPDATE_SUCCESS, experience.into()))
}

/// Delete an experience entry and its stored images
#[utoipa::path(
    delete,
    path = "/api/experience/{id}",
    params(
        ("id" = String, Path, description = "Experience ID")
    ),
    responses(
        (status = 200, description = "Experience deleted successfully"),
        (status = 400, description = "Invalid ID format"),
        (status = 404, description = "Experience not found")
    ),
    tag = "Experience"
)]
pub async fn delete_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiReply<()>> {
    let id = parse_object_id(&id)?;
    let experience = state.experiences.delete(id).await.inspect_err(|_| {
        tracing::warn!("Experience not found: {}", id);
    })?;

    MediaService::delete_all(state.media.as_ref(), experience.media_ids()).await?;
    tracing::info!("Experience deleted: {}", id);

    Ok(ApiReply::message(messages::EXPERIENCE_DELETE_SUCCESS))
}
