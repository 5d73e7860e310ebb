//! SMTP notifier using Lettre.

use super::{ConfirmationEmail, Notifier};
use crate::config::SmtpConfig;
use crate::error::NotificationError;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Sends confirmations through an authenticated SMTP relay (STARTTLS/TLS)
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// # Errors
    ///
    /// Returns error if the relay host or sender address is invalid.
    pub fn new(config: &SmtpConfig) -> Result<Self, NotificationError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| NotificationError::Transport(format!("SMTP relay error: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = format!("{} <{}>", config.from_name, config.from_email)
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::Address(format!("Invalid from address: {e}")))?;

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &ConfirmationEmail) -> Result<Message, NotificationError> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::Address(format!("Invalid to address: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject())
            .multipart(MultiPart::alternative_plain_html(
                email.text_body(),
                email.html_body(),
            ))
            .map_err(|e| NotificationError::Build(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, email: &ConfirmationEmail) -> Result<(), NotificationError> {
        let message = self.build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::Transport(format!("Failed to send email: {e}")))?;
        Ok(())
    }
}
