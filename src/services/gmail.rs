use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::config::EmailSettings;
use crate::models::EmailDraft;

/// Errors that can occur when sending mail
#[derive(Debug, Error)]
pub enum GmailError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

/// Outcome of an email sending batch
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SendReport {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    /// Addresses of the failed sends
    pub failures: Vec<String>,
}

impl SendReport {
    /// Success percentage rounded to two decimals; 0 for an empty batch
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        let rate = self.sent as f64 / self.total as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    }
}

/// Gmail REST sender
///
/// Builds RFC 2822 plain-text messages, wraps them in the provider's
/// base64url "raw" form and submits them one at a time with a fixed
/// delay between sends.
pub struct GmailSender {
    base_url: String,
    sender: String,
    access_token: String,
    send_delay: Duration,
    client: Client,
}

impl GmailSender {
    /// Create a new Gmail sender
    pub fn new(settings: &EmailSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            sender: settings.sender.clone(),
            access_token: settings.access_token.clone(),
            send_delay: Duration::from_secs(settings.send_delay_secs),
            client,
        }
    }

    /// Send one draft, returning the provider's message id
    pub async fn send_email(&self, draft: &EmailDraft) -> Result<String, GmailError> {
        let url = format!("{}/users/me/messages/send", self.base_url);
        let raw = build_raw_message(&self.sender, draft);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "raw": raw }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GmailError::ApiError(format!(
                "Send failed with status {}",
                response.status()
            )));
        }

        let sent: SendResponse = response.json().await?;
        tracing::debug!("Sent email to {} (message id {})", draft.to_email, sent.id);
        Ok(sent.id)
    }

    /// Send a batch of drafts
    ///
    /// The inter-send delay is skipped after the last email. Failures
    /// are recorded in the report and never stop the batch.
    pub async fn send_batch(&self, drafts: &[EmailDraft]) -> SendReport {
        let mut report = SendReport {
            total: drafts.len(),
            ..Default::default()
        };

        for (i, draft) in drafts.iter().enumerate() {
            match self.send_email(draft).await {
                Ok(_) => report.sent += 1,
                Err(e) => {
                    tracing::warn!("Failed to send email to {}: {}", draft.to_email, e);
                    report.failed += 1;
                    report.failures.push(draft.to_email.clone());
                }
            }

            if i + 1 < drafts.len() {
                tokio::time::sleep(self.send_delay).await;
            }
        }

        tracing::info!(
            "Email batch finished: {}/{} sent ({}% success)",
            report.sent,
            report.total,
            report.success_rate()
        );
        report
    }
}

/// Build the provider's base64url "raw" form of an RFC 2822 message
fn build_raw_message(sender: &str, draft: &EmailDraft) -> String {
    let message = format!(
        "From: {}\r\nTo: {}\r\nSubject: {}\r\nContent-Type: text/plain; charset=\"UTF-8\"\r\n\r\n{}",
        sender, draft.to_email, draft.subject, draft.body
    );

    URL_SAFE.encode(message)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SendResponse {
    id: String,
}
