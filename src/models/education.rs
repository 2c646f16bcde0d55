use bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::messages;
use crate::models::common::{to_offset, to_offset_opt};
use crate::repositories::Entity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EducationStatus {
    #[default]
    Completed,
    InProgress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub title: String,
    pub url: Option<String>,
    pub issued_by: Option<String>,
    pub issue_date: Option<bson::DateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: bson::DateTime,
    pub end_date: Option<bson::DateTime>,
    pub grade: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub status: EducationStatus,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    pub link: Option<String>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl Education {
    pub fn new(
        institution: String,
        degree: String,
        field_of_study: String,
        start_date: bson::DateTime,
    ) -> Self {
        let now = bson::DateTime::now();

        Self {
            id: ObjectId::new(),
            institution,
            degree,
            field_of_study,
            start_date,
            end_date: None,
            grade: None,
            description: None,
            status: EducationStatus::default(),
            certificates: Vec::new(),
            link: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Filter matching another entry with the same identity
    pub fn identity_filter(&self) -> Document {
        doc! {
            "institution": self.institution.as_str(),
            "degree": self.degree.as_str(),
            "fieldOfStudy": self.field_of_study.as_str(),
            "startDate": self.start_date,
        }
    }
}

impl Entity for Education {
    const COLLECTION: &'static str = "educations";
    const NOT_FOUND: &'static str = messages::EDUCATION_NOT_FOUND;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn default_sort() -> Document {
        doc! { "startDate": -1, "createdAt": -1 }
    }

    fn touch(&mut self) {
        self.updated_at = bson::DateTime::now();
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    pub title: String,
    pub url: Option<String>,
    pub issued_by: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub issue_date: Option<OffsetDateTime>,
}

impl From<Certificate> for CertificateResponse {
    fn from(c: Certificate) -> Self {
        Self {
            title: c.title,
            url: c.url,
            issued_by: c.issued_by,
            issue_date: to_offset_opt(c.issue_date),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EducationResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<OffsetDateTime>,
    pub grade: Option<String>,
    pub description: Option<String>,
    pub status: EducationStatus,
    pub certificates: Vec<CertificateResponse>,
    pub link: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<Education> for EducationResponse {
    fn from(e: Education) -> Self {
        Self {
            id: e.id.to_hex(),
            institution: e.institution,
            degree: e.degree,
            field_of_study: e.field_of_study,
            start_date: to_offset(e.start_date),
            end_date: to_offset_opt(e.end_date),
            grade: e.grade,
            description: e.description,
            status: e.status,
            certificates: e.certificates.into_iter().map(Into::into).collect(),
            link: e.link,
            created_at: to_offset(e.created_at),
            updated_at: to_offset(e.updated_at),
        }
    }
}
