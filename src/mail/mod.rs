pub mod memory;
pub mod smtp;

pub use memory::{InMemoryMailer, SentMail};
pub use smtp::SmtpMailer;

use async_trait::async_trait;

use crate::error::AppResult;

/// Outgoing email
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}
