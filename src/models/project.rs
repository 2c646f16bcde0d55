use bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::messages;
use crate::models::common::{default_true, to_offset, to_offset_opt};
use crate::repositories::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProjectCategory {
    Frontend,
    Backend,
    #[serde(rename = "Full Stack")]
    FullStack,
    Mobile,
    Desktop,
    #[serde(rename = "UI/UX")]
    UiUx,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    #[default]
    Completed,
    OnHold,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectImage {
    pub url: String,
    pub public_id: Option<String>,
    pub alt: Option<String>,
    pub caption: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Challenge {
    pub title: Option<String>,
    pub description: Option<String>,
    pub solution: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: Option<String>,
    pub category: ProjectCategory,
    pub subcategory: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub priority: i32,
    pub start_date: Option<bson::DateTime>,
    pub completed_at: Option<bson::DateTime>,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub learnings: Vec<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl Project {
    /// New project; the slug is derived from the title unless one is given
    pub fn new(
        title: String,
        slug: Option<String>,
        description: String,
        category: ProjectCategory,
    ) -> Self {
        let now = bson::DateTime::now();
        let slug = slug
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&title));

        Self {
            id: ObjectId::new(),
            title,
            slug,
            description,
            short_description: None,
            category,
            subcategory: None,
            technologies: Vec::new(),
            images: Vec::new(),
            live_url: None,
            github_url: None,
            status: ProjectStatus::default(),
            featured: false,
            priority: 0,
            start_date: None,
            completed_at: None,
            challenges: Vec::new(),
            features: Vec::new(),
            learnings: Vec::new(),
            is_public: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn media_ids(&self) -> Vec<String> {
        self.images
            .iter()
            .filter_map(|img| img.public_id.clone())
            .collect()
    }
}

/// Lowercase, hyphen-separated ASCII slug: "My App & API" becomes "my-app-and-api"
///
/// Non-ASCII letters are transliterated first, so "Café" becomes "cafe".
pub fn slugify(title: &str) -> String {
    let ascii = deunicode::deunicode(title);
    let mut cleaned = String::with_capacity(ascii.len());

    for ch in ascii.chars() {
        match ch {
            '&' => cleaned.push_str(" and "),
            c if c.is_ascii_alphanumeric() => cleaned.push(c.to_ascii_lowercase()),
            c if c.is_whitespace() || c == '-' => cleaned.push(' '),
            _ => {}
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}

impl Entity for Project {
    const COLLECTION: &'static str = "projects";
    const NOT_FOUND: &'static str = messages::PROJECT_NOT_FOUND;
    const UNIQUE_KEYS: &'static [&'static str] = &["slug"];

    fn id(&self) -> ObjectId {
        self.id
    }

    fn default_sort() -> Document {
        doc! { "priority": -1, "createdAt": -1 }
    }

    fn touch(&mut self) {
        self.updated_at = bson::DateTime::now();
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: Option<String>,
    pub category: ProjectCategory,
    pub subcategory: Option<String>,
    pub technologies: Vec<String>,
    pub images: Vec<ProjectImage>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub status: ProjectStatus,
    pub featured: bool,
    pub priority: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub start_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub completed_at: Option<OffsetDateTime>,
    pub challenges: Vec<Challenge>,
    pub features: Vec<String>,
    pub learnings: Vec<String>,
    pub is_public: bool,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id.to_hex(),
            title: p.title,
            slug: p.slug,
            description: p.description,
            short_description: p.short_description,
            category: p.category,
            subcategory: p.subcategory,
            technologies: p.technologies,
            images: p.images,
            live_url: p.live_url,
            github_url: p.github_url,
            status: p.status,
            featured: p.featured,
            priority: p.priority,
            start_date: to_offset_opt(p.start_date),
            completed_at: to_offset_opt(p.completed_at),
            challenges: p.challenges,
            features: p.features,
            learnings: p.learnings,
            is_public: p.is_public,
            created_at: to_offset(p.created_at),
            updated_at: to_offset(p.updated_at),
        }
    }
}
