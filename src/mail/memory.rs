use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::AppResult;
use crate::mail::Mailer;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Mailer that keeps sent messages in memory
#[derive(Default)]
pub struct InMemoryMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        self.sent.lock().await.push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}
