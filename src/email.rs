use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::domain::subscriber::email::Email;

/// Client of the Brevo transactional email API.
#[derive(Clone)]
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: Sender,
    api_key: Option<Secret<String>>,
    reply_to: Option<Email>,
}

#[derive(Debug, Clone)]
pub struct Sender {
    pub email: Email,
    pub name: String,
}

/// Result of a single delivery attempt. Delivery never returns an error:
/// every failure mode ends up in [`DeliveryOutcome::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { message_id: Option<String> },
    Failed(DeliveryError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("email provider API key is not configured")]
    MissingApiKey,
    #[error("email provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("email provider request failed: {0}")]
    Transport(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: Vec<Contact<'a>>,
    subject: &'a str,
    html_content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Contact<'a>>,
    #[serde(skip_serializing_if = "<[&str]>::is_empty")]
    tags: &'a [&'a str],
}

#[derive(Serialize)]
struct Contact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: Option<String>,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: Sender,
        api_key: Option<Secret<String>>,
        reply_to: Option<Email>,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("The HTTP client should be buildable.");

        Self {
            http_client,
            base_url,
            sender,
            api_key,
            reply_to,
        }
    }

    #[tracing::instrument(
        name = "Deliver email through the provider",
        skip(self, html_content, text_content),
        fields(recipient = %recipient)
    )]
    pub async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        html_content: &str,
        text_content: Option<&str>,
        tags: &[&str],
    ) -> DeliveryOutcome {
        let Some(api_key) = &self.api_key else {
            tracing::error!("refusing to send email, the provider API key is missing");
            return DeliveryOutcome::Failed(DeliveryError::MissingApiKey);
        };

        let request_body = SendEmailRequest {
            sender: Contact {
                email: self.sender.email.as_ref(),
                name: Some(&self.sender.name),
            },
            to: vec![Contact {
                email: recipient.as_ref(),
                name: Some(recipient.local_part()),
            }],
            subject,
            html_content,
            text_content,
            reply_to: self.reply_to.as_ref().map(|email| Contact {
                email: email.as_ref(),
                name: None,
            }),
            tags,
        };

        let response = match self
            .http_client
            .post(format!("{}/v3/smtp/email", self.base_url))
            .header("api-key", api_key.expose_secret())
            .header("accept", "application/json")
            .json(&request_body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(detail = %e, "email provider request failed");
                return DeliveryOutcome::Failed(DeliveryError::Transport(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "email provider rejected the email");
            return DeliveryOutcome::Failed(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let message_id = match response.json::<SendEmailResponse>().await {
            Ok(body) => body.message_id,
            Err(e) => {
                tracing::warn!(detail = %e, "email provider accepted the email without a readable body");
                None
            }
        };
        tracing::info!(message_id = ?message_id, "email delivered to the provider");

        DeliveryOutcome::Delivered { message_id }
    }
}
