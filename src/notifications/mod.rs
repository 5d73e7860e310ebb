//! Confirmation emails, sent in the background after a registration commits.

pub mod dispatcher;
pub mod log;
pub mod smtp;

pub use dispatcher::NotificationDispatcher;
pub use log::LogNotifier;
pub use smtp::SmtpNotifier;

use crate::catalog::Event;
use crate::error::NotificationError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailEvent {
    pub title: String,
    pub category: String,
    pub submission_email: Option<String>,
}

impl From<&Event> for EmailEvent {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            category: event.category.as_str().to_string(),
            submission_email: event.submission_email.clone(),
        }
    }
}

/// Everything the confirmation message needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationEmail {
    pub to: String,
    pub name: String,
    pub unique_code: String,
    pub events: Vec<EmailEvent>,
    pub amount: Decimal,
}

impl ConfirmationEmail {
    pub fn subject(&self) -> String {
        format!("Gusto registration confirmed ({})", self.unique_code)
    }

    pub fn text_body(&self) -> String {
        let mut body = format!(
            "Hi {},\n\nYour registration for Gusto is confirmed.\n\nRegistration code: {}\nAmount paid: Rs. {}\n\nEvents:\n",
            self.name, self.unique_code, self.amount
        );

        for event in &self.events {
            body.push_str(&format!("  - {} ({})", event.title, event.category));
            if let Some(email) = &event.submission_email {
                body.push_str(&format!(". Send your submission to {}", email));
            }
            body.push('\n');
        }

        body.push_str("\nPlease carry this code on the event day.\n\nTeam Gusto\n");
        body
    }

    pub fn html_body(&self) -> String {
        let rows: String = self
            .events
            .iter()
            .map(|event| {
                let submission = event
                    .submission_email
                    .as_deref()
                    .map(|email| format!(r#"<br><small>Submit to <a href="mailto:{0}">{0}</a></small>"#, escape_html(email)))
                    .unwrap_or_default();
                format!(
                    "<tr><td style=\"padding: 6px 12px;\">{}{}</td><td style=\"padding: 6px 12px;\">{}</td></tr>",
                    escape_html(&event.title),
                    submission,
                    escape_html(&event.category)
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Gusto registration confirmed</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #2563eb;">You're in, {name}!</h2>
        <p>Your registration code is <strong style="font-size: 18px;">{code}</strong>.</p>
        <table style="border-collapse: collapse;">{rows}</table>
        <p>Amount paid: <strong>Rs. {amount}</strong></p>
        <p style="color: #666; font-size: 14px;">Please carry this code on the event day.</p>
    </div>
</body>
</html>"#,
            name = escape_html(&self.name),
            code = escape_html(&self.unique_code),
            rows = rows,
            amount = self.amount,
        )
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Outbound email sink
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &ConfirmationEmail) -> Result<(), NotificationError>;
}
