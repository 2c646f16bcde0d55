use axum::extract::{Path, State};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::{ApiReply, AppJson};
use crate::messages;
use crate::middlewares::AuthUser;
use crate::models::{Certificate, Education, EducationResponse, EducationStatus};
use crate::state::AppState;
use crate::validation::{nullable, parse_object_id, trimmed, DateValue, FieldErrors, Mode};

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInput {
    pub title: Option<String>,
    pub url: Option<String>,
    pub issued_by: Option<String>,
    #[schema(value_type = Option<String>)]
    pub issue_date: Option<DateValue>,
}

/// Education fields; identity fields are required on create, an update
/// needs at least one field
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EducationRequest {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    #[schema(value_type = Option<String>)]
    pub start_date: Option<DateValue>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<Option<DateValue>>,
    pub grade: Option<String>,
    pub description: Option<String>,
    pub status: Option<EducationStatus>,
    pub link: Option<String>,
    pub certificates: Option<Vec<CertificateInput>>,
}

impl EducationRequest {
    fn is_empty(&self) -> bool {
        self.institution.is_none()
            && self.degree.is_none()
            && self.field_of_study.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.grade.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.link.is_none()
            && self.certificates.is_none()
    }

    fn validate(&self, mode: Mode) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        errors.not_empty_update(mode, self.is_empty());
        errors.required_on(mode, "institution", &self.institution);
        errors.max_len("institution", self.institution.as_deref(), 200);
        errors.required_on(mode, "degree", &self.degree);
        errors.max_len("degree", self.degree.as_deref(), 100);
        errors.required_on(mode, "fieldOfStudy", &self.field_of_study);
        errors.max_len("fieldOfStudy", self.field_of_study.as_deref(), 100);
        errors.required_on(mode, "startDate", &self.start_date);
        errors.max_len("grade", self.grade.as_deref(), 20);
        errors.max_len("description", self.description.as_deref(), 1000);
        errors.uri("link", self.link.as_deref());

        for cert in self.certificates.iter().flatten() {
            errors.required("certificates.title", &cert.title);
            errors.max_len("certificates.title", cert.title.as_deref(), 200);
            errors.uri("certificates.url", cert.url.as_deref());
            errors.max_len("certificates.issuedBy", cert.issued_by.as_deref(), 200);
        }

        errors.finish()
    }

    fn apply(self, education: &mut Education) {
        if let Some(institution) = trimmed(self.institution) {
            education.institution = institution;
        }
        if let Some(degree) = trimmed(self.degree) {
            education.degree = degree;
        }
        if let Some(field) = trimmed(self.field_of_study) {
            education.field_of_study = field;
        }
        if let Some(start) = self.start_date {
            education.start_date = start.into();
        }
        if let Some(end) = self.end_date {
            education.end_date = end.map(Into::into);
        }
        if let Some(grade) = trimmed(self.grade) {
            education.grade = Some(grade);
        }
        if let Some(description) = trimmed(self.description) {
            education.description = Some(description);
        }
        if let Some(status) = self.status {
            education.status = status;
        }
        if let Some(link) = trimmed(self.link) {
            education.link = Some(link);
        }
        if let Some(certificates) = self.certificates {
            education.certificates = certificates
                .into_iter()
                .map(|c| Certificate {
                    title: c.title.unwrap_or_default().trim().to_string(),
                    url: c.url,
                    issued_by: trimmed(c.issued_by),
                    issue_date: c.issue_date.map(DateValue::into_bson),
                })
                .collect();
        }
    }
}

// ============ Handlers ============

/// List all education entries
#[utoipa::path(
    get,
    path = "/api/education",
    responses(
        (status = 200, description = "Education entries, most recent start first", body = [EducationResponse])
    ),
    tag = "Education"
)]
pub async fn list_educations(
    State(state): State<AppState>,
) -> AppResult<ApiReply<Vec<EducationResponse>>> {
    let educations = state.educations.list().await?;
    tracing::info!("Retrieved {} education entries", educations.len());

    Ok(ApiReply::ok(
        messages::EDUCATIONS_FETCH_SUCCESS,
        educations.into_iter().map(Into::into).collect(),
    ))
}

/// Get an education entry by ID
#[utoipa::path(
    get,
    path = "/api/education/{id}",
    params(
        ("id" = String, Path, description = "Education entry ID")
    ),
    responses(
        (status = 200, description = "Education entry details", body = EducationResponse),
        (status = 400, description = "Invalid ID format"),
        (status = 404, description = "Education entry not found")
    ),
    tag = "Education"
)]
pub async fn get_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiReply<EducationResponse>> {
    let id = parse_object_id(&id)?;
    let education = state.educations.find_by_id(id).await.inspect_err(|_| {
        tracing::warn!("Education entry not found: {}", id);
    })?;

    Ok(ApiReply::ok(messages::EDUCATION_FETCH_SUCCESS, education.into()))
}

/// Create an education entry
#[utoipa::path(
    post,
    path = "/api/education",
    request_body = EducationRequest,
    responses(
        (status = 201, description = "Education entry created successfully", body = EducationResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Education entry already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Education"
)]
pub async fn create_education(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<EducationRequest>,
) -> AppResult<ApiReply<EducationResponse>> {
    payload.validate(Mode::Create)?;

    let Some(start_date) = payload.start_date.map(DateValue::into_bson) else {
        return Err(AppError::Validation(vec!["startDate is required".into()]));
    };

    let mut education = Education::new(String::new(), String::new(), String::new(), start_date);
    payload.apply(&mut education);

    if state.educations.find_duplicate(&education).await?.is_some() {
        tracing::warn!(
            "Duplicate education entry: {} / {}",
            education.institution,
            education.degree
        );
        return Err(AppError::Conflict(messages::EDUCATION_DUPLICATE.to_string()));
    }

    let education = state.educations.insert(education).await?;
    tracing::info!("Education entry created by {}: {}", user.id, education.id);

    Ok(ApiReply::created(messages::EDUCATION_CREATE_SUCCESS, education.into()))
}

/// Update an education entry
#[utoipa::path(
    put,
    path = "/api/education/{id}",
    params(
        ("id" = String, Path, description = "Education entry ID")
    ),
    request_body = EducationRequest,
    responses(
        (status = 200, description = "Education entry updated successfully", body = EducationResponse),
        (status = 400, description = "Validation error or invalid ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Education entry not found"),
        (status = 409, description = "Education entry already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Education"
)]
pub async fn update_education(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<EducationRequest>,
) -> AppResult<ApiReply<EducationResponse>> {
    let id = parse_object_id(&id)?;
    payload.validate(Mode::Update)?;

    let mut education = state.educations.find_by_id(id).await.inspect_err(|_| {
        tracing::warn!("Education entry not found: {}", id);
    })?;
    payload.apply(&mut education);

    if state.educations.find_duplicate(&education).await?.is_some() {
        tracing::warn!("Update of education entry {} duplicates another entry", id);
        return Err(AppError::Conflict(messages::EDUCATION_DUPLICATE.to_string()));
    }

    let education = state.educations.save(education).await?;
    tracing::info!("Education entry updated by {}: {}", user.id, id);

    Ok(ApiReply::ok(messages::EDUCATION_UPDATE_SUCCESS, education.into()))
}

/// Delete an education entry
#[utoipa::path(
    delete,
    path = "/api/education/{id}",
    params(
        ("id" = String, Path, description = "Education entry ID")
    ),
    responses(
        (status = 200, description = "Education entry deleted successfully"),
        (status = 400, description = "Invalid ID format"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Education entry not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Education"
)]
pub async fn delete_education(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiReply<()>> {
    let id = parse_object_id(&id)?;
    state.educations.delete(id).await.inspect_err(|_| {
        tracing::warn!("Education entry not found: {}", id);
    })?;

    tracing::info!("Education entry deleted by {}: {}", user.id, id);
    Ok(ApiReply::message(messages::EDUCATION_DELETE_SUCCESS))
}
