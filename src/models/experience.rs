use bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::messages;
use crate::models::common::{to_offset, to_offset_opt, MediaAsset};
use crate::repositories::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Freelance,
    Internship,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WorkMode {
    #[default]
    #[serde(rename = "On-site")]
    OnSite,
    Remote,
    Hybrid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// A project delivered while in the role (embedded, not a `Project` reference)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoleProject {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceImage {
    pub url: String,
    pub public_id: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub job_title: String,
    pub company: String,
    pub company_url: Option<String>,
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub work_mode: WorkMode,
    pub location: Option<Location>,
    pub start_date: bson::DateTime,
    pub end_date: Option<bson::DateTime>,
    #[serde(default)]
    pub is_current: bool,
    pub description: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub projects: Vec<RoleProject>,
    #[serde(default)]
    pub images: Vec<ExperienceImage>,
    pub company_logo: Option<MediaAsset>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub display_order: i32,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl Experience {
    pub fn new(
        job_title: String,
        company: String,
        employment_type: EmploymentType,
        start_date: bson::DateTime,
        description: String,
    ) -> Self {
        let now = bson::DateTime::now();

        Self {
            id: ObjectId::new(),
            job_title,
            company,
            company_url: None,
            employment_type,
            work_mode: WorkMode::default(),
            location: None,
            start_date,
            end_date: None,
            is_current: false,
            description,
            responsibilities: Vec::new(),
            achievements: Vec::new(),
            technologies: Vec::new(),
            projects: Vec::new(),
            images: Vec::new(),
            company_logo: None,
            featured: false,
            display_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Storage ids of every blob this entry references
    pub fn media_ids(&self) -> Vec<String> {
        self.company_logo
            .iter()
            .map(|logo| logo.public_id.clone())
            .chain(self.images.iter().filter_map(|img| img.public_id.clone()))
            .collect()
    }
}

impl Entity for Experience {
    const COLLECTION: &'static str = "experiences";
    const NOT_FOUND: &'static str = messages::EXPERIENCE_NOT_FOUND;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn default_sort() -> Document {
        doc! { "displayOrder": 1, "startDate": -1 }
    }

    fn touch(&mut self) {
        self.updated_at = bson::DateTime::now();
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub company_url: Option<String>,
    pub employment_type: EmploymentType,
    pub work_mode: WorkMode,
    pub location: Option<Location>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<OffsetDateTime>,
    pub is_current: bool,
    pub description: String,
    pub responsibilities: Vec<String>,
    pub achievements: Vec<String>,
    pub technologies: Vec<String>,
    pub projects: Vec<RoleProject>,
    pub images: Vec<ExperienceImage>,
    pub company_logo: Option<MediaAsset>,
    pub featured: bool,
    pub display_order: i32,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<Experience> for ExperienceResponse {
    fn from(e: Experience) -> Self {
        Self {
            id: e.id.to_hex(),
            job_title: e.job_title,
            company: e.company,
            company_url: e.company_url,
            employment_type: e.employment_type,
            work_mode: e.work_mode,
            location: e.location,
            start_date: to_offset(e.start_date),
            end_date: to_offset_opt(e.end_date),
            is_current: e.is_current,
            description: e.description,
            responsibilities: e.responsibilities,
            achievements: e.achievements,
            technologies: e.technologies,
            projects: e.projects,
            images: e.images,
            company_logo: e.company_logo,
            featured: e.featured,
            display_order: e.display_order,
            created_at: to_offset(e.created_at),
            updated_at: to_offset(e.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_ids_include_logo_and_images() {
        let mut experience = Experience::new(
            "Engineer".into(),
            "Acme".into(),
            EmploymentType::FullTime,
            bson::DateTime::now(),
            "Built things".into(),
        );
        experience.company_logo = Some(MediaAsset {
            url: "https://cdn/logo.png".into(),
            public_id: "company-logos/logo".into(),
        });
        experience.images = vec![
            ExperienceImage {
                url: "https://cdn/a.png".into(),
                public_id: Some("experience-images/a".into()),
                caption: None,
            },
            ExperienceImage {
                url: "https://cdn/b.png".into(),
                public_id: None,
                caption: None,
            },
        ];

        assert_eq!(
            experience.media_ids(),
            vec!["company-logos/logo", "experience-images/a"]
        );
    }
}
