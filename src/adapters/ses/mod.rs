//! SES email delivery

use crate::adapters::store::{EmailMessage, Mailer};
use crate::domain::{KioskError, Result};
use async_trait::async_trait;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client;

const CHARSET: &str = "UTF-8";

/// Mailer backed by Amazon SES
pub struct SesMailer {
    client: Client,
}

impl SesMailer {
    /// Build a client for `region` from the default AWS credential chain
    pub async fn from_env(region: String) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_ses::config::Region::new(region))
            .load()
            .await;
        Self {
            client: Client::new(&shared),
        }
    }
}

fn content(data: &str) -> Result<Content> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|e| KioskError::Notification(format!("Invalid email content: {e}")))
}

/// SES message for an email; the text part is omitted when empty
fn ses_message(message: &EmailMessage) -> Result<Message> {
    let mut body = Body::builder();
    if !message.html_body.is_empty() {
        body = body.html(content(&message.html_body)?);
    }
    if !message.text_body.is_empty() {
        body = body.text(content(&message.text_body)?);
    }

    Ok(Message::builder()
        .subject(content(&message.subject)?)
        .body(body.build())
        .build())
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let destination = Destination::builder()
            .set_to_addresses(Some(message.recipients.clone()))
            .build();

        let output = self
            .client
            .send_email()
            .source(&message.sender)
            .destination(destination)
            .message(ses_message(message)?)
            .send()
            .await
            .map_err(|e| {
                KioskError::Notification(format!(
                    "SES send_email failed: {}",
                    aws_sdk_ses::error::DisplayErrorContext(&e)
                ))
            })?;

        tracing::info!(
            category = "notification",
            message_id = %output.message_id(),
            recipients = message.recipients.len(),
            "Email sent"
        );
        Ok(())
    }
}
