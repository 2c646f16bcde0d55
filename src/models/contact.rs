use bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::messages;
use crate::models::common::{to_offset, to_offset_opt};
use crate::repositories::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProjectType {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile App")]
    MobileApp,
    #[serde(rename = "UI/UX Design")]
    UiUxDesign,
    Consultation,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Budget {
    #[serde(rename = "Under $1K")]
    Under1K,
    #[serde(rename = "$1K-$5K")]
    From1KTo5K,
    #[serde(rename = "$5K-$10K")]
    From5KTo10K,
    #[serde(rename = "$10K-$25K")]
    From10KTo25K,
    #[serde(rename = "$25K+")]
    Over25K,
    #[serde(rename = "Not Sure")]
    NotSure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Timeline {
    #[serde(rename = "ASAP")]
    Asap,
    #[serde(rename = "1-2 weeks")]
    OneToTwoWeeks,
    #[serde(rename = "1 month")]
    OneMonth,
    #[serde(rename = "2-3 months")]
    TwoToThreeMonths,
    #[serde(rename = "3+ months")]
    ThreePlusMonths,
    Flexible,
}

/// Inquiry lifecycle; any value may be set by an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
    InProgress,
    Completed,
    Archived,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContactPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContactSource {
    #[default]
    Website,
    Api,
    Referral,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub file_name: Option<String>,
    pub url: Option<String>,
    pub public_id: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub message: String,
    pub responded_at: bson::DateTime,
    pub responded_by: Option<ObjectId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub content: String,
    pub added_by: Option<ObjectId>,
    pub added_at: bson::DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub project_type: Option<ProjectType>,
    pub budget: Option<Budget>,
    pub timeline: Option<Timeline>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub status: ContactStatus,
    #[serde(default)]
    pub priority: ContactPriority,
    pub response: Option<Reply>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub source: ContactSource,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub follow_up_date: Option<bson::DateTime>,
    #[serde(default)]
    pub is_follow_up_complete: bool,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl Contact {
    pub fn new(name: String, email: String, subject: String, message: String) -> Self {
        let now = bson::DateTime::now();

        Self {
            id: ObjectId::new(),
            name,
            email,
            phone: None,
            company: None,
            subject,
            message,
            project_type: None,
            budget: None,
            timeline: None,
            attachments: Vec::new(),
            status: ContactStatus::default(),
            priority: ContactPriority::default(),
            response: None,
            notes: Vec::new(),
            source: ContactSource::default(),
            user_agent: None,
            ip_address: None,
            follow_up_date: None,
            is_follow_up_complete: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Contact {
    const COLLECTION: &'static str = "contacts";
    const NOT_FOUND: &'static str = messages::CONTACT_NOT_FOUND;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn default_sort() -> Document {
        doc! { "createdAt": -1 }
    }

    fn touch(&mut self) {
        self.updated_at = bson::DateTime::now();
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub responded_at: OffsetDateTime,
    pub responded_by: Option<String>,
}

impl From<Reply> for ReplyResponse {
    fn from(r: Reply) -> Self {
        Self {
            message: r.message,
            responded_at: to_offset(r.responded_at),
            responded_by: r.responded_by.map(|id| id.to_hex()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub content: String,
    pub added_by: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub added_at: OffsetDateTime,
}

impl From<Note> for NoteResponse {
    fn from(n: Note) -> Self {
        Self {
            content: n.content,
            added_by: n.added_by.map(|id| id.to_hex()),
            added_at: to_offset(n.added_at),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub project_type: Option<ProjectType>,
    pub budget: Option<Budget>,
    pub timeline: Option<Timeline>,
    pub attachments: Vec<Attachment>,
    pub status: ContactStatus,
    pub priority: ContactPriority,
    pub response: Option<ReplyResponse>,
    pub notes: Vec<NoteResponse>,
    pub source: ContactSource,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub follow_up_date: Option<OffsetDateTime>,
    pub is_follow_up_complete: bool,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<Contact> for ContactResponse {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id.to_hex(),
            name: c.name,
            email: c.email,
            phone: c.phone,
            company: c.company,
            subject: c.subject,
            message: c.message,
            project_type: c.project_type,
            budget: c.budget,
            timeline: c.timeline,
            attachments: c.attachments,
            status: c.status,
            priority: c.priority,
            response: c.response.map(Into::into),
            notes: c.notes.into_iter().map(Into::into).collect(),
            source: c.source,
            user_agent: c.user_agent,
            ip_address: c.ip_address,
            follow_up_date: to_offset_opt(c.follow_up_date),
            is_follow_up_complete: c.is_follow_up_complete,
            created_at: to_offset(c.created_at),
            updated_at: to_offset(c.updated_at),
        }
    }
}
