//! Missing-field notification

use crate::adapters::store::{EmailMessage, Mailer};
use crate::config::NotificationConfig;
use crate::core::validate::MissingFieldReport;
use crate::domain::{KioskError, Result};
use std::sync::Arc;

/// Subject of the missing-field email
pub const SUBJECT: &str = "Metadata is missing required fields";

/// HTML body for a report; newlines become `<br/>`
pub fn html_body(report: &str) -> String {
    let body = format!(
        "<html>\n<head></head>\n<body>\n<h1>Missing required fields when processing metadata</h1>\n<p> {report}</p>\n</body>\n</html>"
    );
    body.replace('\n', "<br/>")
}

/// Sends the end-of-run summary email
///
/// Delivery problems come back as [`KioskError::Notification`] for the
/// caller to record; a failed email never fails the run.
pub struct NotificationDispatcher {
    mailer: Option<Arc<dyn Mailer + Send + Sync>>,
    sender: String,
    recipients: Vec<String>,
}

impl NotificationDispatcher {
    pub fn new(mailer: Option<Arc<dyn Mailer + Send + Sync>>, config: &NotificationConfig) -> Self {
        Self {
            mailer,
            sender: config.sender.clone(),
            recipients: config.recipient_list(),
        }
    }

    /// Compose the message for a report
    pub fn compose(&self, report: &MissingFieldReport) -> EmailMessage {
        EmailMessage {
            sender: self.sender.clone(),
            recipients: self.recipients.clone(),
            subject: SUBJECT.to_string(),
            html_body: html_body(report.as_str()),
            text_body: String::new(),
        }
    }

    /// Send the report if it has content; returns whether an email went out
    pub async fn dispatch(&self, report: &MissingFieldReport) -> Result<bool> {
        if report.is_empty() {
            return Ok(false);
        }

        let Some(mailer) = &self.mailer else {
            tracing::info!(
                category = "notification",
                objects = report.object_count(),
                "Notification disabled; missing-field report not emailed"
            );
            return Ok(false);
        };

        if self.recipients.is_empty() {
            tracing::warn!(category = "notification", "No notification recipients configured");
            return Ok(false);
        }

        match mailer.send(&self.compose(report)).await {
            Ok(()) => {
                tracing::info!(
                    category = "notification",
                    objects = report.object_count(),
                    recipients = self.recipients.len(),
                    "Missing-field notification sent"
                );
                Ok(true)
            }
            Err(e) => {
                tracing::error!(
                    category = "notification",
                    error = %e,
                    "Failed to send missing-field notification"
                );
                Err(match e {
                    KioskError::Notification(_) => e,
                    other => KioskError::Notification(other.to_string()),
                })
            }
        }
    }
}
