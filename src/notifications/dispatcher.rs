use super::{ConfirmationEmail, Notifier};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Fire-and-forget sender for confirmation emails.
///
/// Each message runs on its own spawned task, detached from the request that
/// produced it. Failures (and panics) stay inside that task and are only logged.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Schedule `email`; the returned handle may be ignored
    pub fn dispatch(&self, email: ConfirmationEmail) -> JoinHandle<()> {
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            match notifier.send(&email).await {
                Ok(()) => {
                    info!(unique_code = %email.unique_code, to = %email.to, "Confirmation email sent");
                }
                Err(e) => {
                    // TODO: persist to an outbox table and retry instead of dropping
                    error!(
                        unique_code = %email.unique_code,
                        to = %email.to,
                        kind = e.kind().as_str(),
                        "Failed to send confirmation email: {}",
                        e
                    );
                }
            }
        })
    }
}
