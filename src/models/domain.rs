use serde::{Deserialize, Serialize};

/// Geographic market bucket used by scoring and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Region {
    #[serde(rename = "North America")]
    NorthAmerica,
    Europe,
    Other,
    #[default]
    Unknown,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::Europe => "Europe",
            Region::Other => "Other",
            Region::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sourced prospect with company enrichment and scoring output.
///
/// Every field is optional on the wire; missing values deserialize to
/// their defaults so partially populated API records are still usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Lead {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub title: String,
    pub company_name: String,
    pub company_size: u32,
    pub company_industry: String,
    pub company_location: String,
    pub linkedin_url: String,
    pub apollo_id: String,
    pub company_domain: String,
    pub company_revenue: String,
    pub company_founded: Option<u32>,
    pub region: Region,
    pub score: f64,
    pub score_reasons: Vec<String>,
    pub industry_score: f64,
    pub company_size_score: f64,
    pub region_score: f64,
}

impl Lead {
    /// Display name, trimmed in case either part is empty
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A generated outreach email ready for preview or sending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub body: String,
}

/// Aggregate statistics over a scored batch
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct LeadSummary {
    pub total_leads: usize,
    pub average_score: f64,
    pub top_score: f64,
    pub bottom_score: f64,
    /// Region frequency counts in first-seen order
    pub regions: Vec<(String, usize)>,
    /// Top five industries by count; ties keep first-seen order
    pub top_industries: Vec<(String, usize)>,
    /// Company size histogram over the scoring buckets
    pub company_sizes: Vec<(String, usize)>,
}

/// Scoring weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub industry: f64,
    pub company_size: f64,
    pub region: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            industry: 0.4,
            company_size: 0.3,
            region: 0.3,
        }
    }
}
