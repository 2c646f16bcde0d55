use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::EmailConfig;
use crate::error::{AppError, AppResult};
use crate::mail::Mailer;

/// SMTP mailer using STARTTLS
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid EMAIL_FROM: {}", e)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Internal(format!("Invalid EMAIL_HOST: {}", e)))?
            .port(config.port);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

pub(crate) fn build_message(from: &Mailbox, to: &str, subject: &str, html: &str) -> AppResult<Message> {
    let to = to
        .parse::<Mailbox>()
        .map_err(|e| AppError::Upstream(format!("Email send failed: invalid recipient: {}", e)))?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html.to_string())
        .map_err(|e| AppError::Upstream(format!("Email send failed: {}", e)))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        let message = build_message(&self.from, to, subject, html)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Upstream(format!("Email send failed: {}", e)))?;

        tracing::info!("Sent '{}' to {}", subject, to);
        Ok(())
    }
}
