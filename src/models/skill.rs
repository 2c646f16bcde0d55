use bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::messages;
use crate::models::common::{default_true, to_offset, to_offset_opt};
use crate::repositories::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    DevOps,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Documentation,
    Tutorial,
    Course,
    Video,
    Article,
    Book,
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillIcon {
    pub url: Option<String>,
    pub public_id: Option<String>,
    pub svg: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issuer: Option<String>,
    pub url: Option<String>,
    pub obtained_at: Option<bson::DateTime>,
    pub expires_at: Option<bson::DateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LearningResource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: ResourceType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub category: SkillCategory,
    pub subcategory: Option<String>,
    pub proficiency: i32,
    #[serde(default)]
    pub years_of_experience: f64,
    #[serde(default)]
    pub level: SkillLevel,
    pub icon: Option<SkillIcon>,
    pub color: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Advisory references to projects; not checked for existence
    #[serde(default)]
    pub projects: Vec<ObjectId>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub resources: Vec<LearningResource>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl Skill {
    pub fn new(name: String, category: SkillCategory, proficiency: i32) -> Self {
        let now = bson::DateTime::now();

        Self {
            id: ObjectId::new(),
            name,
            category,
            subcategory: None,
            proficiency,
            years_of_experience: 0.0,
            level: SkillLevel::default(),
            icon: None,
            color: None,
            description: String::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
            resources: Vec::new(),
            featured: false,
            display_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Skill {
    const COLLECTION: &'static str = "skills";
    const NOT_FOUND: &'static str = messages::SKILL_NOT_FOUND;
    const UNIQUE_KEYS: &'static [&'static str] = &["name"];

    fn id(&self) -> ObjectId {
        self.id
    }

    fn default_sort() -> Document {
        doc! { "displayOrder": 1, "name": 1 }
    }

    fn touch(&mut self) {
        self.updated_at = bson::DateTime::now();
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificationResponse {
    pub name: String,
    pub issuer: Option<String>,
    pub url: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub obtained_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub expires_at: Option<OffsetDateTime>,
}

impl From<Certification> for CertificationResponse {
    fn from(c: Certification) -> Self {
        Self {
            name: c.name,
            issuer: c.issuer,
            url: c.url,
            obtained_at: to_offset_opt(c.obtained_at),
            expires_at: to_offset_opt(c.expires_at),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: SkillCategory,
    pub subcategory: Option<String>,
    pub proficiency: i32,
    pub years_of_experience: f64,
    pub level: SkillLevel,
    pub icon: Option<SkillIcon>,
    pub color: Option<String>,
    pub description: String,
    pub projects: Vec<String>,
    pub certifications: Vec<CertificationResponse>,
    pub resources: Vec<LearningResource>,
    pub featured: bool,
    pub display_order: i32,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<Skill> for SkillResponse {
    fn from(s: Skill) -> Self {
        Self {
            id: s.id.to_hex(),
            name: s.name,
            category: s.category,
            subcategory: s.subcategory,
            proficiency: s.proficiency,
            years_of_experience: s.years_of_experience,
            level: s.level,
            icon: s.icon,
            color: s.color,
            description: s.description,
            projects: s.projects.into_iter().map(ObjectId::to_hex).collect(),
            certifications: s.certifications.into_iter().map(Into::into).collect(),
            resources: s.resources,
            featured: s.featured,
            display_order: s.display_order,
            is_active: s.is_active,
            created_at: to_offset(s.created_at),
            updated_at: to_offset(s.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_renders_project_ids_as_hex() {
        let project = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let mut skill = Skill::new("React.js".into(), SkillCategory::Frontend, 85);
        skill.projects = vec![project];

        let response = SkillResponse::from(skill);
        assert_eq!(response.name, "React.js");
        assert_eq!(response.projects, vec!["507f1f77bcf86cd799439011".to_string()]);
    }
}
