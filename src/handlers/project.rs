use axum::extract::{Path, State};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::{ApiReply, FormPayload};
use crate::media::{folders, UploadFile};
use crate::messages;
use crate::middlewares::AuthUser;
use crate::models::{
    Challenge, Project, ProjectCategory, ProjectImage, ProjectResponse, ProjectStatus,
};
use crate::services::MediaService;
use crate::state::AppState;
use crate::validation::{
    lenient, one_or_many, parse_object_id, trimmed, DateValue, FieldErrors, Mode,
};

const FILE_FIELDS: &[(&str, usize)] = &[("images", 10)];

// ============ Request/Response DTOs ============

/// Project fields; title, description and category are required on create,
/// an update needs at least one field or an uploaded image
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub category: Option<ProjectCategory>,
    pub subcategory: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub technologies: Option<Vec<String>>,
    pub images: Option<Vec<ProjectImage>>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub status: Option<ProjectStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub start_date: Option<DateValue>,
    #[schema(value_type = Option<String>)]
    pub completed_at: Option<DateValue>,
    pub challenges: Option<Vec<Challenge>>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub features: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub learnings: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_public: Option<bool>,
}

impl ProjectRequest {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.description.is_none()
            && self.short_description.is_none()
            && self.category.is_none()
            && self.subcategory.is_none()
            && self.technologies.is_none()
            && self.images.is_none()
            && self.live_url.is_none()
            && self.github_url.is_none()
            && self.status.is_none()
            && self.featured.is_none()
            && self.priority.is_none()
            && self.start_date.is_none()
            && self.completed_at.is_none()
            && self.challenges.is_none()
            && self.features.is_none()
            && self.learnings.is_none()
            && self.is_public.is_none()
    }

    fn validate(&self, mode: Mode, has_files: bool) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        errors.not_empty_update(mode, self.is_empty() && !has_files);
        errors.required_on(mode, "title", &self.title);
        errors.max_len("title", self.title.as_deref(), 100);
        errors.required_on(mode, "description", &self.description);
        errors.max_len("description", self.description.as_deref(), 2000);
        errors.required_on(mode, "category", &self.category.map(|_| true));
        errors.max_len("shortDescription", self.short_description.as_deref(), 300);
        errors.each_max_len("technologies", self.technologies.as_deref(), 50);
        errors.https_url("liveUrl", self.live_url.as_deref());
        errors.https_url("githubUrl", self.github_url.as_deref());

        for image in self.images.iter().flatten() {
            errors.uri("images.url", Some(image.url.as_str()));
        }

        errors.finish()
    }

    fn apply(self, project: &mut Project) {
        if let Some(title) = trimmed(self.title) {
            project.title = title;
        }
        if let Some(slug) = trimmed(self.slug).filter(|s| !s.is_empty()) {
            project.slug = slug.to_lowercase();
        }
        if let Some(description) = trimmed(self.description) {
            project.description = description;
        }
        if let Some(short) = trimmed(self.short_description) {
            project.short_description = Some(short);
        }
        if let Some(category) = self.category {
            project.category = category;
        }
        if let Some(subcategory) = trimmed(self.subcategory) {
            project.subcategory = Some(subcategory);
        }
        if let Some(technologies) = self.technologies {
            project.technologies = technologies.into_iter().map(|t| t.trim().to_string()).collect();
        }
        if let Some(images) = self.images {
            project.images = images;
        }
        if let Some(url) = trimmed(self.live_url) {
            project.live_url = Some(url);
        }
        if let Some(url) = trimmed(self.github_url) {
            project.github_url = Some(url);
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(featured) = self.featured {
            project.featured = featured;
        }
        if let Some(priority) = self.priority {
            project.priority = priority;
        }
        if let Some(start) = self.start_date {
            project.start_date = Some(start.into());
        }
        if let Some(done) = self.completed_at {
            project.completed_at = Some(done.into());
        }
        if let Some(challenges) = self.challenges {
            project.challenges = challenges;
        }
        if let Some(features) = self.features {
            project.features = features;
        }
        if let Some(learnings) = self.learnings {
            project.learnings = learnings;
        }
        if let Some(public) = self.is_public {
            project.is_public = public;
        }
    }
}

async fn upload_images(state: &AppState, files: &[UploadFile]) -> AppResult<Vec<ProjectImage>> {
    let uploaded =
        MediaService::upload_all(state.media.as_ref(), files, folders::PROJECT_IMAGES).await?;

    Ok(uploaded
        .into_iter()
        .map(|(asset, file_name)| ProjectImage {
            url: asset.url,
            public_id: Some(asset.public_id),
            alt: Some(file_name.clone()),
            caption: Some(file_name),
            is_primary: false,
        })
        .collect())
}

// ============ Handlers ============

/// List all projects
#[utoipa::path(
    get,
    path = "/api/project",
    responses(
        (status = 200, description = "Projects ordered by priority then newest", body = [ProjectResponse])
    ),
    tag = "Projects"
)]
pub async fn list_projects(
    State(state): State<AppState>,
) -> AppResult<ApiReply<Vec<ProjectResponse>>> {
    let projects = state.projects.list().await?;
    tracing::info!("Retrieved {} projects", projects.len());

    Ok(ApiReply::ok(
        messages::PROJECTS_FETCH_SUCCESS,
        projects.into_iter().map(Into::into).collect(),
    ))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/api/project/{id}",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 400, description = "Invalid ID format"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiReply<ProjectResponse>> {
    let id = parse_object_id(&id)?;
    let project = state.projects.find_by_id(id).await.inspect_err(|_| {
        tracing::warn!("Project not found: {}", id);
    })?;

    Ok(ApiReply::ok(messages::PROJECT_FETCH_SUCCESS, project.into()))
}

/// Create a new project
///
/// Accepts JSON, or multipart with up to 10 `images`.
#[utoipa::path(
    post,
    path = "/api/project",
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "Project created successfully", body = ProjectResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Project with same title already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn create_project(
    user: AuthUser,
    State(state): State<AppState>,
    mut payload: FormPayload<ProjectRequest>,
) -> AppResult<ApiReply<ProjectResponse>> {
    payload.allow_files(FILE_FIELDS)?;
    payload.data.validate(Mode::Create, !payload.files.is_empty())?;

    let title = payload.data.title.as_deref().unwrap_or_default().trim().to_string();
    if state.projects.find_by_title(&title).await?.is_some() {
        tracing::warn!("Duplicate project: {}", title);
        return Err(AppError::Conflict(messages::PROJECT_DUPLICATE.to_string()));
    }

    let mut project = Project::new(
        title,
        payload.data.slug.take(),
        String::new(),
        payload.data.category.unwrap_or(ProjectCategory::Other),
    );

    let images = payload.take_files("images");
    payload.data.apply(&mut project);

    if state.projects.find_by_slug(&project.slug).await?.is_some() {
        tracing::warn!("Duplicate project slug: {}", project.slug);
        return Err(AppError::Conflict(messages::DUPLICATE_ENTRY.to_string()));
    }

    if !images.is_empty() {
        project.images = upload_images(&state, &images).await?;
    }

    let project = state.projects.insert(project).await?;
    tracing::info!("Project created by {}: {}", user.id, project.id);

    Ok(ApiReply::created(messages::PROJECT_CREATE_SUCCESS, project.into()))
}

/// Update a project
///
/// Uploaded `images` replace every stored image.
#[utoipa::path(
    put,
    path = "/api/project/{id}",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Project updated successfully", body = ProjectResponse),
        (status = 400, description = "Validation error or invalid ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Project with same title already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn update_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut payload: FormPayload<ProjectRequest>,
) -> AppResult<ApiReply<ProjectResponse>> {
    let id = parse_object_id(&id)?;
    payload.allow_files(FILE_FIELDS)?;
    payload.data.validate(Mode::Update, !payload.files.is_empty())?;

    let mut project = state.projects.find_by_id(id).await.inspect_err(|_| {
        tracing::warn!("Project not found: {}", id);
    })?;

    if let Some(title) = payload.data.title.as_deref().map(str::trim) {
        if let Some(other) = state.projects.find_by_title(title).await? {
            if other.id != project.id {
                tracing::warn!("Rename of project {} clashes with {}", id, other.id);
                return Err(AppError::Conflict(messages::PROJECT_DUPLICATE.to_string()));
            }
        }
    }

    let images = payload.take_files("images");
    payload.data.apply(&mut project);

    if !images.is_empty() {
        let old: Vec<String> = project
            .images
            .drain(..)
            .filter_map(|img| img.public_id)
            .collect();
        MediaService::delete_all(state.media.as_ref(), old).await?;
        project.images = upload_images(&state, &images).await?;
    }

    let project = state.projects.save(project).await?;
    tracing::info!("Project updated by {}: {}", user.id, id);

    Ok(ApiReply::ok(messages::PROJECT_UPDATE_SUCCESS, project.into()))
}

/// Delete a project and its stored images
#[utoipa::path(
    delete,
    path = "/api/project/{id}",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project deleted successfully"),
        (status = 400, description = "Invalid ID format"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn delete_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiReply<()>> {
    let id = parse_object_id(&id)?;
    let project = state.projects.delete(id).await.inspect_err(|_| {
        tracing::warn!("Project not found: {}", id);
    })?;

    MediaService::delete_all(state.media.as_ref(), project.media_ids()).await?;
    tracing::info!("Project deleted by {}: {}", user.id, id);

    Ok(ApiReply::message(messages::PROJECT_DELETE_SUCCESS))
}
