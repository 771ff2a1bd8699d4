use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::OpenAiSettings;
use crate::models::{EmailDraft, Lead};

const SYSTEM_PROMPT: &str = "You are a professional BDR (Business Development Representative) \
writing personalized outreach emails. Your emails should be concise, professional, and \
personalized based on the recipient's role and company information.";

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f64 = 0.7;

/// Errors that can occur when generating outreach copy
#[derive(Debug, Error)]
pub enum OutreachError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Completion contained no content")]
    EmptyCompletion,
}

/// Generates personalized outreach emails via a chat completion API
///
/// Generation always yields a draft: an unconfigured API key or any
/// request failure falls back to a deterministic template, and a failure
/// for one lead never aborts the rest of the batch.
pub struct OutreachGenerator {
    base_url: String,
    api_key: String,
    model: String,
    default_subject: String,
    client: Client,
}

impl OutreachGenerator {
    /// Create a new outreach generator
    pub fn new(settings: &OpenAiSettings, default_subject: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            default_subject: default_subject.to_string(),
            client,
        }
    }

    /// Generate a personalized email draft for one lead
    pub async fn generate_email(&self, lead: &Lead) -> EmailDraft {
        if self.api_key.is_empty() {
            tracing::debug!(
                "No completion API key configured, using fallback email for {}",
                lead.email
            );
            return self.fallback_email(lead);
        }

        match self.request_completion(lead).await {
            Ok(content) => {
                let (subject, body) = parse_subject_body(&content, &self.default_subject);
                EmailDraft {
                    to_email: lead.email.clone(),
                    to_name: lead.full_name(),
                    subject,
                    body,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Email generation failed for {}: {}, using fallback",
                    lead.email,
                    e
                );
                self.fallback_email(lead)
            }
        }
    }

    /// Generate drafts for a whole batch; every lead gets one
    pub async fn generate_batch(&self, leads: &[Lead]) -> Vec<EmailDraft> {
        let mut drafts = Vec::with_capacity(leads.len());

        for lead in leads {
            drafts.push(self.generate_email(lead).await);
        }

        tracing::info!("Generated {} outreach drafts", drafts.len());
        drafts
    }

    async fn request_completion(&self, lead: &Lead) -> Result<String, OutreachError> {
        let url = format!("{}/chat/completions", self.base_url);
        let prompt = build_prompt(lead);

        let payload = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OutreachError::ApiError(format!(
                "Completion request failed with status {}",
                response.status()
            )));
        }

        let completion: ChatResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(OutreachError::EmptyCompletion);
        }

        Ok(content.trim().to_string())
    }

    /// Deterministic template used when generation is unavailable
    fn fallback_email(&self, lead: &Lead) -> EmailDraft {
        let first_name = if lead.first_name.is_empty() {
            "there"
        } else {
            &lead.first_name
        };
        let company_name = if lead.company_name.is_empty() {
            "your company"
        } else {
            &lead.company_name
        };

        let subject = format!("Quick question about {}'s tech stack", company_name);
        let body = format!(
            "Hi {},\n\n\
             I hope this email finds you well. I came across {} and was impressed by your \
             work in the industry.\n\n\
             I'm reaching out because I believe our solution could help {} optimize its \
             technology infrastructure, especially given your role as {}.\n\n\
             Would you be open to a brief 15-minute call to discuss how we've helped \
             similar companies in your space?\n\n\
             Best regards,\n\
             [Your Name]\n\
             [Your Company]",
            first_name, company_name, company_name, lead.title
        );

        EmailDraft {
            to_email: lead.email.clone(),
            to_name: lead.full_name(),
            subject,
            body,
        }
    }
}

/// Split a completion into subject and body
///
/// The first line with a case-insensitive "Subject:" prefix supplies the
/// subject; the lines after it become the body, minus an optional
/// "Body:" label. Without a subject line the whole response becomes the
/// body under the default subject.
pub fn parse_subject_body(response: &str, default_subject: &str) -> (String, String) {
    let lines: Vec<&str> = response.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        if starts_with_ignore_case(line, "subject:") {
            let subject = line["subject:".len()..].trim().to_string();
            let mut body = lines[i + 1..].join("\n").trim().to_string();
            if starts_with_ignore_case(&body, "body:") {
                body = body["body:".len()..].trim_start().to_string();
            }
            return (subject, body);
        }
    }

    (default_subject.to_string(), response.trim().to_string())
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

fn build_prompt(lead: &Lead) -> String {
    format!(
        "Generate a personalized outreach email for the following prospect:\n\n\
         Name: {} {}\n\
         Title: {}\n\
         Company: {}\n\
         Industry: {}\n\
         Company Size: {} employees\n\
         Location: {} ({})\n\
         LinkedIn: {}\n\n\
         Requirements:\n\
         1. Keep the email under 150 words\n\
         2. Make it personal and relevant to their role and company\n\
         3. Include a specific value proposition\n\
         4. End with a clear call-to-action\n\
         5. Be professional but conversational\n\
         6. Reference their company or industry when possible\n\n\
         Format the response as:\n\
         Subject: [Email Subject]\n\
         Body: [Email Body]\n\n\
         Focus on how our solution can help {} based on their industry ({}) and size \
         ({} employees).",
        lead.first_name,
        lead.last_name,
        lead.title,
        lead.company_name,
        lead.company_industry,
        lead.company_size,
        lead.company_location,
        lead.region,
        lead.linkedin_url,
        lead.company_name,
        lead.company_industry,
        lead.company_size
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AssistantMessage {
    content: String,
}
