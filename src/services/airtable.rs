use chrono::Local;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::config::AirtableSettings;
use crate::models::Lead;

/// Airtable caps create requests at this many records
const CREATE_BATCH_SIZE: usize = 10;

/// Delay between consecutive store requests
const REQUEST_DELAY: Duration = Duration::from_millis(100);

/// Errors that can occur when talking to the record store
#[derive(Debug, Error)]
pub enum AirtableError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

/// Outcome of pushing a batch of leads to the store
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StoreReport {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Airtable REST client
///
/// Stores scored leads, deduplicating against existing records by email
/// first and then by name plus company.
pub struct AirtableClient {
    base_url: String,
    api_key: String,
    base_id: String,
    table_name: String,
    client: Client,
}

impl AirtableClient {
    /// Create a new Airtable client
    pub fn new(settings: &AirtableSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            base_id: settings.base_id.clone(),
            table_name: settings.table_name.clone(),
            client,
        }
    }

    /// Upsert a batch of scored leads
    ///
    /// Leads matching an existing record are updated in place; the rest
    /// are created in batches of up to 10 records. Failures are counted
    /// in the report, never fatal.
    pub async fn push_leads(&self, leads: &[Lead]) -> StoreReport {
        let mut report = StoreReport::default();

        if leads.is_empty() {
            tracing::debug!("No leads to push to Airtable");
            return report;
        }

        let mut to_create: Vec<serde_json::Value> = Vec::new();

        for lead in leads {
            match self.find_existing_record(lead).await {
                Ok(Some(record_id)) => match self.update_record(&record_id, lead).await {
                    Ok(()) => report.updated += 1,
                    Err(e) => {
                        tracing::warn!("Failed to update record for {}: {}", lead.email, e);
                        report.failed += 1;
                    }
                },
                Ok(None) => to_create.push(lead_fields(lead)),
                Err(e) => {
                    // A failed lookup falls through to the create path
                    tracing::warn!("Record lookup failed for {}: {}", lead.email, e);
                    to_create.push(lead_fields(lead));
                }
            }

            tokio::time::sleep(REQUEST_DELAY).await;
        }

        let (created, failed) = self.create_records(to_create).await;
        report.created = created;
        report.failed += failed;

        tracing::info!(
            "Pushed leads to Airtable: {} created, {} updated, {} failed",
            report.created,
            report.updated,
            report.failed
        );
        report
    }

    /// Find an existing record id for a lead, by email first and then by
    /// name plus company
    async fn find_existing_record(&self, lead: &Lead) -> Result<Option<String>, AirtableError> {
        if !lead.email.is_empty() {
            let formula = format!("{{Email}} = '{}'", lead.email);
            if let Some(id) = self.query_first_record(&formula).await? {
                return Ok(Some(id));
            }
        }

        if !lead.company_name.is_empty() {
            let formula = format!(
                "AND({{Name}} = '{}', {{Company}} = '{}')",
                lead.full_name(),
                lead.company_name
            );
            if let Some(id) = self.query_first_record(&formula).await? {
                return Ok(Some(id));
            }
        }

        Ok(None)
    }

    async fn query_first_record(&self, formula: &str) -> Result<Option<String>, AirtableError> {
        let response = self
            .client
            .get(self.table_url())
            .bearer_auth(&self.api_key)
            .query(&[("filterByFormula", formula), ("maxRecords", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AirtableError::ApiError(format!(
                "Record lookup failed with status {}",
                response.status()
            )));
        }

        let list: RecordList = response.json().await?;
        Ok(list.records.into_iter().next().map(|record| record.id))
    }

    async fn update_record(&self, record_id: &str, lead: &Lead) -> Result<(), AirtableError> {
        let url = format!("{}/{}", self.table_url(), record_id);

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "fields": lead_fields(lead) }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AirtableError::ApiError(format!(
                "Record update failed with status {}",
                response.status()
            )));
        }

        tracing::debug!("Updated existing record for {}", lead.email);
        Ok(())
    }

    /// Create records in batches, respecting the per-request cap
    ///
    /// Returns (created, failed). A failed batch counts all its records
    /// as failed and later batches still run.
    async fn create_records(&self, fields: Vec<serde_json::Value>) -> (usize, usize) {
        let mut created = 0;
        let mut failed = 0;

        for chunk in fields.chunks(CREATE_BATCH_SIZE) {
            let records: Vec<serde_json::Value> = chunk
                .iter()
                .map(|fields| json!({ "fields": fields }))
                .collect();

            match self.post_records(&records).await {
                Ok(()) => created += chunk.len(),
                Err(e) => {
                    tracing::warn!("Failed to create a batch of {} records: {}", chunk.len(), e);
                    failed += chunk.len();
                }
            }

            tokio::time::sleep(REQUEST_DELAY).await;
        }

        (created, failed)
    }

    async fn post_records(&self, records: &[serde_json::Value]) -> Result<(), AirtableError> {
        let response = self
            .client
            .post(self.table_url())
            .bearer_auth(&self.api_key)
            .json(&json!({ "records": records }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AirtableError::ApiError(format!(
                "Record create failed with status {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn table_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, self.base_id, self.table_name)
    }
}

/// Map a lead onto the store's column names
fn lead_fields(lead: &Lead) -> serde_json::Value {
    json!({
        "Name": lead.full_name(),
        "Email": lead.email,
        "Job Title": lead.title,
        "Company": lead.company_name,
        "Company Size": lead.company_size,
        "Industry": lead.company_industry,
        "Region": lead.region.as_str(),
        "Score": lead.score,
        "Score Reasons": lead.score_reasons.join(", "),
        "LinkedIn URL": lead.linkedin_url,
        "Processed Date": Local::now().format("%Y-%m-%d").to_string(),
        "Status": "New Lead",
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecordList {
    records: Vec<RecordEnvelope>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecordEnvelope {
    id: String,
}
