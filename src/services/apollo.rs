use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::{ApolloSettings, SearchSettings};
use crate::core::region::classify_location;
use crate::models::Lead;
use crate::services::cache::LeadCache;

/// Errors that can occur when talking to the lead source API
#[derive(Debug, Error)]
pub enum ApolloError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

/// Apollo API client
///
/// Handles all communication with the lead source including:
/// - Paginated people search
/// - Per-lead organization enrichment
/// - Serving repeat runs from the on-disk cache
pub struct ApolloClient {
    base_url: String,
    api_key: String,
    max_retries: u32,
    retry_delay_secs: u64,
    page_delay_ms: u64,
    search: SearchSettings,
    client: Client,
    cache: LeadCache,
}

impl ApolloClient {
    /// Create a new Apollo client
    pub fn new(settings: &ApolloSettings, search: &SearchSettings, cache: LeadCache) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            max_retries: settings.max_retries,
            retry_delay_secs: settings.retry_delay_secs,
            page_delay_ms: settings.page_delay_ms,
            search: search.clone(),
            client,
            cache,
        }
    }

    /// Fetch up to `max_leads` leads, serving from cache when possible
    ///
    /// Live fetches walk the paginated search endpoint, enrich every
    /// person with organization detail and persist the batch through the
    /// cache. Failed pages and failed enrichment degrade to empty
    /// defaults instead of aborting the run.
    pub async fn fetch_leads(&self, max_leads: usize, force_refresh: bool) -> Vec<Lead> {
        if !force_refresh {
            if let Some(mut cached) = self.cache.load() {
                cached.truncate(max_leads);
                return cached;
            }
        }

        let per_page = std::cmp::min(25, max_leads) as u32;
        let mut all_leads: Vec<Lead> = Vec::new();
        let mut page = 1u32;

        while all_leads.len() < max_leads {
            let response = self.search_page(page, per_page).await;

            if response.people.is_empty() {
                tracing::debug!("No people returned on page {}", page);
                break;
            }

            tracing::debug!(
                "Fetched page {} with {} people (total available: {})",
                page,
                response.people.len(),
                response.pagination.total_entries
            );

            for person in response.people {
                if all_leads.len() >= max_leads {
                    break;
                }
                all_leads.push(self.build_lead(person).await);
            }

            if !response.pagination.has_more {
                break;
            }

            page += 1;
            tokio::time::sleep(Duration::from_millis(self.page_delay_ms)).await;
        }

        if !all_leads.is_empty() {
            if let Err(e) = self.cache.save(&all_leads) {
                tracing::warn!("Failed to save lead cache: {}", e);
            }
        }

        tracing::info!("Fetched {} leads from Apollo", all_leads.len());
        all_leads
    }

    /// Search one page of people matching the configured criteria
    async fn search_page(&self, page: u32, per_page: u32) -> PeopleSearchResponse {
        let url = format!("{}/people/search", self.base_url);
        let payload = serde_json::json!({
            "page": page,
            "per_page": per_page,
            "person_titles": self.search.job_titles,
            "person_locations": self.search.regions,
            "q_organization_size_ranges": [format!(
                "{}-{}",
                self.search.company_size_min, self.search.company_size_max
            )],
        });

        let request = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .header("Cache-Control", "no-cache")
            .json(&payload);

        self.request_with_retry(request).await
    }

    /// Fetch organization detail used to enrich a lead
    async fn fetch_organization(&self, organization_id: &str) -> OrganizationResponse {
        let url = format!("{}/organizations/{}", self.base_url, organization_id);

        let request = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .header("Cache-Control", "no-cache");

        self.request_with_retry(request).await
    }

    /// Convert a raw person record into a Lead
    ///
    /// Organization detail is fetched when the person carries an
    /// organization id; enrichment failure leaves those fields empty.
    async fn build_lead(&self, person: PersonRecord) -> Lead {
        let organization = person.organization.unwrap_or_default();
        let organization_id = organization.id.unwrap_or_default();

        let detail = if organization_id.is_empty() {
            OrganizationDetail::default()
        } else {
            self.fetch_organization(&organization_id)
                .await
                .organization
                .unwrap_or_default()
        };

        let location = organization.location.unwrap_or_default();
        let region = classify_location(&location);

        Lead {
            first_name: person.first_name.unwrap_or_default(),
            last_name: person.last_name.unwrap_or_default(),
            email: person.email.unwrap_or_default(),
            title: person.title.unwrap_or_default(),
            company_name: organization.name.unwrap_or_default(),
            company_size: organization.employee_count.unwrap_or_default(),
            company_industry: organization.industry.unwrap_or_default(),
            company_location: location,
            linkedin_url: person.linkedin_url.unwrap_or_default(),
            apollo_id: person.id.unwrap_or_default(),
            company_domain: organization.domain.unwrap_or_default(),
            company_revenue: detail.estimated_annual_revenue.unwrap_or_default(),
            company_founded: detail.founded_year,
            region,
            ..Default::default()
        }
    }

    /// Run a request with retries, falling back to the type's default
    /// when every attempt fails
    ///
    /// The delay starts at the configured value and doubles after each
    /// failed attempt. It is local to this call, so one flaky request
    /// never inflates the backoff of later ones.
    async fn request_with_retry<T>(&self, request: reqwest::RequestBuilder) -> T
    where
        T: DeserializeOwned + Default,
    {
        let mut delay = Duration::from_secs(self.retry_delay_secs);

        for attempt in 1..=self.max_retries {
            let cloned = match request.try_clone() {
                Some(cloned) => cloned,
                None => {
                    tracing::error!("Request cannot be cloned for retrying, giving up");
                    return T::default();
                }
            };

            match self.execute(cloned).await {
                Ok(value) => return value,
                Err(e) if attempt < self.max_retries => {
                    tracing::warn!(
                        "Request attempt {}/{} failed: {}, retrying in {:?}",
                        attempt,
                        self.max_retries,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::error!("Request failed after {} attempts: {}", self.max_retries, e);
                }
            }
        }

        T::default()
    }

    async fn execute<T>(&self, request: reqwest::RequestBuilder) -> Result<T, ApolloError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(ApolloError::ApiError(format!(
                "Request failed with status {}",
                response.status()
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PeopleSearchResponse {
    people: Vec<PersonRecord>,
    pagination: Pagination,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Pagination {
    total_entries: u64,
    has_more: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PersonRecord {
    id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    title: Option<String>,
    linkedin_url: Option<String>,
    organization: Option<OrganizationSummary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrganizationSummary {
    id: Option<String>,
    name: Option<String>,
    employee_count: Option<u32>,
    industry: Option<String>,
    location: Option<String>,
    domain: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrganizationResponse {
    organization: Option<OrganizationDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrganizationDetail {
    estimated_annual_revenue: Option<String>,
    founded_year: Option<u32>,
}
