use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub apollo: ApolloSettings,
    pub search: SearchSettings,
    pub scoring: ScoringSettings,
    pub cache: CacheSettings,
    pub airtable: AirtableSettings,
    pub openai: OpenAiSettings,
    pub email: EmailSettings,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApolloSettings {
    #[serde(default = "default_apollo_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

impl Default for ApolloSettings {
    fn default() -> Self {
        Self {
            base_url: default_apollo_base_url(),
            api_key: String::new(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            retry_delay_secs: default_retry_delay_secs(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

fn default_apollo_base_url() -> String { "https://api.apollo.io/v1".to_string() }
fn default_max_retries() -> u32 { 3 }
fn default_timeout_secs() -> u64 { 30 }
fn default_retry_delay_secs() -> u64 { 1 }
fn default_page_delay_ms() -> u64 { 500 }

/// Search criteria sent to the lead source
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_job_titles")]
    pub job_titles: Vec<String>,
    #[serde(default = "default_company_size_min")]
    pub company_size_min: u32,
    #[serde(default = "default_company_size_max")]
    pub company_size_max: u32,
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            job_titles: default_job_titles(),
            company_size_min: default_company_size_min(),
            company_size_max: default_company_size_max(),
            regions: default_regions(),
        }
    }
}

fn default_job_titles() -> Vec<String> {
    vec![
        "CTO".to_string(),
        "Head of Security".to_string(),
        "Chief Technology Officer".to_string(),
        "VP of Engineering".to_string(),
    ]
}
fn default_company_size_min() -> u32 { 50 }
fn default_company_size_max() -> u32 { 500 }
fn default_regions() -> Vec<String> {
    vec!["North America".to_string(), "Europe".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            min_score: default_min_score(),
        }
    }
}

fn default_min_score() -> f64 { crate::core::DEFAULT_MIN_SCORE }

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_industry_weight")]
    pub industry: f64,
    #[serde(default = "default_company_size_weight")]
    pub company_size: f64,
    #[serde(default = "default_region_weight")]
    pub region: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            industry: default_industry_weight(),
            company_size: default_company_size_weight(),
            region: default_region_weight(),
        }
    }
}

impl From<WeightsConfig> for ScoringWeights {
    fn from(config: WeightsConfig) -> Self {
        Self {
            industry: config.industry,
            company_size: config.company_size,
            region: config.region,
        }
    }
}

fn default_industry_weight() -> f64 { 0.4 }
fn default_company_size_weight() -> f64 { 0.3 }
fn default_region_weight() -> f64 { 0.3 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_dir")]
    pub dir: String,
    #[serde(default = "default_cache_expiry_hours")]
    pub expiry_hours: f64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            expiry_hours: default_cache_expiry_hours(),
        }
    }
}

fn default_cache_dir() -> String { "cache".to_string() }
fn default_cache_expiry_hours() -> f64 { 24.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct AirtableSettings {
    #[serde(default = "default_airtable_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_id: String,
    #[serde(default = "default_table_name")]
    pub table_name: String,
}

impl Default for AirtableSettings {
    fn default() -> Self {
        Self {
            base_url: default_airtable_base_url(),
            api_key: String::new(),
            base_id: String::new(),
            table_name: default_table_name(),
        }
    }
}

fn default_airtable_base_url() -> String { "https://api.airtable.com/v0".to_string() }
fn default_table_name() -> String { "Leads".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            api_key: String::new(),
            model: default_openai_model(),
        }
    }
}

fn default_openai_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_openai_model() -> String { "gpt-4o-mini".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    #[serde(default = "default_gmail_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_email_subject")]
    pub subject: String,
    #[serde(default = "default_send_delay_secs")]
    pub send_delay_secs: u64,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            base_url: default_gmail_base_url(),
            sender: String::new(),
            access_token: String::new(),
            subject: default_email_subject(),
            send_delay_secs: default_send_delay_secs(),
        }
    }
}

fn default_gmail_base_url() -> String { "https://gmail.googleapis.com/gmail/v1".to_string() }
fn default_email_subject() -> String { "Quick question about your tech stack".to_string() }
fn default_send_delay_secs() -> u64 { 2 }

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    #[serde(default = "default_max_leads")]
    pub max_leads: usize,
    #[serde(default = "default_preview_only")]
    pub preview_only: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_leads: default_max_leads(),
            preview_only: default_preview_only(),
        }
    }
}

fn default_max_leads() -> usize { 10 }
fn default_preview_only() -> bool { true }

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with BDR__)
    ///    e.g., BDR__APOLLO__API_KEY -> apollo.api_key
    /// 4. Well-known plain variables such as APOLLO_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("BDR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Fail fast when required credentials are missing
    ///
    /// The Gmail token is deliberately not on this list: preview and
    /// no-email runs work without it, and the sender reports per-email
    /// failures when it is wrong.
    pub fn validate_required(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();

        if self.apollo.api_key.is_empty() {
            missing.push("APOLLO_API_KEY");
        }
        if self.openai.api_key.is_empty() {
            missing.push("OPENAI_API_KEY");
        }
        if self.airtable.api_key.is_empty() {
            missing.push("AIRTABLE_API_KEY");
        }
        if self.airtable.base_id.is_empty() {
            missing.push("AIRTABLE_BASE_ID");
        }
        if self.email.sender.is_empty() {
            missing.push("SENDER_EMAIL");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(format!(
                "Missing required configuration: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Apply the plain environment variable names most deployments already
/// carry in their .env files
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("apollo.api_key", env::var("APOLLO_API_KEY").ok()),
        ("openai.api_key", env::var("OPENAI_API_KEY").ok()),
        ("openai.model", env::var("OPENAI_MODEL").ok()),
        ("airtable.api_key", env::var("AIRTABLE_API_KEY").ok()),
        ("airtable.base_id", env::var("AIRTABLE_BASE_ID").ok()),
        ("airtable.table_name", env::var("AIRTABLE_TABLE_NAME").ok()),
        ("email.sender", env::var("SENDER_EMAIL").ok()),
        ("email.access_token", env::var("GMAIL_TOKEN").ok()),
        ("pipeline.preview_only", env::var("PREVIEW_ONLY").ok()),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (key, value) in overrides {
        if let Some(value) = value {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
