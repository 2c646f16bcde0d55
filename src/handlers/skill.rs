use axum::extract::{Path, State};
use bson::oid::ObjectId;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::{ApiReply, AppJson};
use crate::messages;
use crate::models::{
    Certification, LearningResource, ResourceType, Skill, SkillCategory, SkillIcon, SkillLevel,
    SkillResponse,
};
use crate::state::AppState;
use crate::validation::{lenient, parse_object_id, trimmed, DateValue, FieldErrors};

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificationInput {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub url: Option<String>,
    #[schema(value_type = Option<String>)]
    pub obtained_at: Option<DateValue>,
    #[schema(value_type = Option<String>)]
    pub expires_at: Option<DateValue>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResourceInput {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ResourceType>,
}

/// Body of both create and update; update re-validates the whole skill
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequest {
    pub name: Option<String>,
    pub category: Option<SkillCategory>,
    pub subcategory: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub proficiency: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub years_of_experience: Option<f64>,
    pub level: Option<SkillLevel>,
    pub icon: Option<SkillIcon>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub projects: Option<Vec<String>>,
    pub certifications: Option<Vec<CertificationInput>>,
    pub resources: Option<Vec<ResourceInput>>,
    #[serde(default, deserialize_with = "lenient")]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_order: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_active: Option<bool>,
}

impl SkillRequest {
    fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        errors.required("name", &self.name);
        errors.max_len("name", self.name.as_deref(), 50);
        errors.required("category", &self.category.map(|_| true));
        errors.max_len("subcategory", self.subcategory.as_deref(), 50);
        errors.required("proficiency", &self.proficiency);
        errors.range("proficiency", self.proficiency, 0, 100);
        errors.min("yearsOfExperience", self.years_of_experience, 0.0);
        errors.hex_color("color", self.color.as_deref());
        errors.max_len("description", self.description.as_deref(), 500);
        errors.object_ids("projects", self.projects.as_deref());

        if let Some(icon) = &self.icon {
            errors.uri("icon.url", icon.url.as_deref());
        }

        for cert in self.certifications.iter().flatten() {
            errors.required("certifications.name", &cert.name);
            errors.uri("certifications.url", cert.url.as_deref());
        }

        for resource in self.resources.iter().flatten() {
            errors.required("resources.title", &resource.title);
            errors.required("resources.url", &resource.url);
            errors.uri("resources.url", resource.url.as_deref());
        }

        errors.finish()
    }

    /// Copy every provided field onto the skill
    fn apply(self, skill: &mut Skill) {
        if let Some(name) = trimmed(self.name) {
            skill.name = name;
        }
        if let Some(category) = self.category {
            skill.category = category;
        }
        if let Some(proficiency) = self.proficiency {
            skill.proficiency = proficiency;
        }
        if let Some(subcategory) = trimmed(self.subcategory) {
            skill.subcategory = Some(subcategory);
        }
        if let Some(years) = self.years_of_experience {
            skill.years_of_experience = years;
        }
        if let Some(level) = self.level {
            skill.level = level;
        }
        if let Some(icon) = self.icon {
            skill.icon = Some(icon);
        }
        if let Some(color) = self.color {
            skill.color = Some(color);
        }
        if let Some(description) = trimmed(self.description) {
            skill.description = description;
        }
        if let Some(projects) = self.projects {
            skill.projects = projects
                .iter()
                .filter_map(|id| ObjectId::parse_str(id).ok())
                .collect();
        }
        if let Some(certifications) = self.certifications {
            skill.certifications = certifications
                .into_iter()
                .map(|c| Certification {
                    name: c.name.unwrap_or_default().trim().to_string(),
                    issuer: trimmed(c.issuer),
                    url: c.url,
                    obtained_at: c.obtained_at.map(DateValue::into_bson),
                    expires_at: c.expires_at.map(DateValue::into_bson),
                })
                .collect();
        }
        if let Some(resources) = self.resources {
            skill.resources = resources
                .into_iter()
                .map(|r| LearningResource {
                    title: r.title.unwrap_or_default().trim().to_string(),
                    url: r.url.unwrap_or_default(),
                    kind: r.kind.unwrap_or_default(),
                })
                .collect();
        }
        if let Some(featured) = self.featured {
            skill.featured = featured;
        }
        if let Some(order) = self.display_order {
            skill.display_order = order;
        }
        if let Some(active) = self.is_active {
            skill.is_active = active;
        }
    }
}

// ============ Handlers ============

/// List all skills
#[utoipa::path(
    get,
    path = "/api/skills",
    responses(
        (status = 200, description = "Skills ordered by displayOrder then name", body = [SkillResponse])
    ),
    tag = "Skills"
)]
pub async fn list_skills(State(state): State<AppState>) -> AppResult<ApiReply<Vec<SkillResponse>>> {
    let skills = state.skills.list().await?;
    tracing::info!("Retrieved {} skills", skills.len());

    Ok(ApiReply::ok(
        messages::SKILLS_FETCH_SUCCESS,
        skills.into_iter().map(Into::into).collect(),
    ))
}

/// Get a skill by ID
#[utoipa::path(
    get,
    path = "/api/skills/{id}",
    params(
        ("id" = String, Path, description = "Skill ID")
    ),
    responses(
        (status = 200, description = "Skill details", body = SkillResponse),
        (status = 400, description = "Invalid ID format"),
        (status = 404, description = "Skill not found")
    ),
    tag = "Skills"
)]
pub async fn get_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiReply<SkillResponse>> {
    let id = parse_object_id(&id)?;
    let skill = state.skills.find_by_id(id).await.inspect_err(|_| {
        tracing::warn!("Skill not found: {}", id);
    })?;

    Ok(ApiReply::ok(messages::SKILL_FETCH_SUCCESS, skill.into()))
}

/// Create a new skill
#[utoipa::path(
    post,
    path = "/api/skills",
    request_body = SkillRequest,
    responses(
        (status = 201, description = "Skill created successfully", body = SkillResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Skill with same name already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Skills"
)]
pub async fn create_skill(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SkillRequest>,
) -> AppResult<ApiReply<SkillResponse>> {
    payload.validate()?;

    let name = payload.name.as_deref().unwrap_or_default().trim().to_string();
    if state.skills.find_by_name(&name).await?.is_some() {
        tracing::warn!("Duplicate skill: {}", name);
        return Err(AppError::Conflict(messages::SKILL_DUPLICATE.to_string()));
    }

    let category = payload.category.unwrap_or(SkillCategory::Other);
    let mut skill = Skill::new(name, category, payload.proficiency.unwrap_or_default());
    payload.apply(&mut skill);

    let skill = state.skills.insert(skill).await?;
    tracing::info!("Skill created: {}", skill.id);

    Ok(ApiReply::created(messages::SKILL_CREATE_SUCCESS, skill.into()))
}

/// Update a skill
#[utoipa::path(
    put,
    path = "/api/skills/{id}",
    params(
        ("id" = String, Path, description = "Skill ID")
    ),
    request_body = SkillRequest,
    responses(
        (status = 200, description = "Skill updated successfully", body = SkillResponse),
        (status = 400, description = "Validation error or invalid ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Skill not found"),
        (status = 409, description = "Skill with same name already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Skills"
)]
pub async fn update_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<SkillRequest>,
) -> AppResult<ApiReply<SkillResponse>> {
    let id = parse_object_id(&id)?;
    payload.validate()?;

    let mut skill = state.skills.find_by_id(id).await.inspect_err(|_| {
        tracing::warn!("Skill not found: {}", id);
    })?;

    if let Some(name) = payload.name.as_deref().map(str::trim) {
        if let Some(other) = state.skills.find_by_name(name).await? {
            if other.id != skill.id {
                tracing::warn!("Rename of skill {} clashes with {}", id, other.id);
                return Err(AppError::Conflict(messages::SKILL_DUPLICATE.to_string()));
            }
        }
    }

    payload.apply(&mut skill);
    let skill = state.skills.save(skill).await?;
    tracing::info!("Skill updated: {}", id);

    Ok(ApiReply::ok(messages::SKILL_UPDATE_SUCCESS, skill.into()))
}

/// Delete a skill
#[utoipa::path(
    delete,
    path = "/api/skills/{id}",
    params(
        ("id" = String, Path, description = "Skill ID")
    ),
    responses(
        (status = 200, description = "Skill deleted successfully"),
        (status = 400, description = "Invalid ID format"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Skill not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Skills"
)]
pub async fn delete_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiReply<()>> {
    let id = parse_object_id(&id)?;
    state.skills.delete(id).await.inspect_err(|_| {
        tracing::warn!("Skill not found: {}", id);
    })?;

    tracing::info!("Skill deleted: {}", id);
    Ok(ApiReply::message(messages::SKILL_DELETE_SUCCESS))
}
