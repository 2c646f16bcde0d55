use bson::doc;

use crate::error::AppResult;
use crate::models::{normalize_email, User};
use crate::repositories::Repository;

pub type UserRepository = Repository<User>;

// User-specific lookups (not in the generic repository)
impl Repository<User> {
    /// Find user by email (case-insensitive, emails are stored lowercased)
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_one(doc! { "email": normalize_email(email) }).await
    }

    /// Check if email exists
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        self.exists(doc! { "email": normalize_email(email) }).await
    }
}
