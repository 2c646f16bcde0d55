use bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::messages;
use crate::models::common::{default_true, to_offset, MediaAsset};
use crate::repositories::Entity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SocialLinks {
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub url: String,
    pub public_id: String,
    pub file_name: String,
    pub uploaded_at: bson::DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    /// Stored lowercased; uniqueness is case-insensitive
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub avatar: Option<MediaAsset>,
    pub phone: Option<String>,
    pub location: Option<UserLocation>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub resume: Option<Resume>,
    pub social_links: Option<SocialLinks>,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl User {
    pub fn new(
        first_name: String,
        last_name: String,
        email: &str,
        password_hash: String,
        role: Role,
    ) -> Self {
        let now = bson::DateTime::now();

        Self {
            id: ObjectId::new(),
            first_name,
            last_name,
            email: normalize_email(email),
            password_hash,
            avatar: None,
            phone: None,
            location: None,
            title: None,
            bio: None,
            resume: None,
            social_links: None,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const NOT_FOUND: &'static str = messages::USER_NOT_FOUND;
    const UNIQUE_KEYS: &'static [&'static str] = &["email"];

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
pub struct ResumeResponse {
    pub url: String,
    pub public_id: String,
    pub file_name: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub uploaded_at: OffsetDateTime,
}

impl From<Resume> for ResumeResponse {
    fn from(r: Resume) -> Self {
        Self {
            url: r.url,
            public_id: r.public_id,
            file_name: r.file_name,
            uploaded_at: to_offset(r.uploaded_at),
        }
    }
}

/// Public user response (safe to return via API)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub avatar: Option<MediaAsset>,
    pub phone: Option<String>,
    pub location: Option<UserLocation>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub resume: Option<ResumeResponse>,
    pub social_links: Option<SocialLinks>,
    pub role: Role,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            full_name: user.full_name(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            avatar: user.avatar,
            phone: user.phone,
            location: user.location,
            title: user.title,
            bio: user.bio,
            resume: user.resume.map(Into::into),
            social_links: user.social_links,
            role: user.role,
            is_active: user.is_active,
            created_at: to_offset(user.created_at),
            updated_at: to_offset(user.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_normalizes_email() {
        let user = User::new(
            "Ada".into(),
            "Lovelace".into(),
            "  Ada@Example.COM ",
            "hash".into(),
            Role::User,
        );

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn response_hides_password() {
        let user = User::new("Ada".into(), "Lovelace".into(), "a@b.io", "secret".into(), Role::Admin);
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["fullName"], "Ada Lovelace");
        assert_eq!(json["role"], "admin");
    }
}
