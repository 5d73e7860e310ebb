use super::{ConfirmationEmail, Notifier};
use crate::error::NotificationError;
use async_trait::async_trait;
use tracing::info;

/// Used when SMTP is not configured: the confirmation only goes to the log
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, email: &ConfirmationEmail) -> Result<(), NotificationError> {
        info!(
            to = %email.to,
            unique_code = %email.unique_code,
            events = email.events.len(),
            "SMTP not configured; confirmation email not sent\n{}",
            email.text_body()
        );
        Ok(())
    }
}
