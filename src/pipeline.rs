//! End-to-end pipeline orchestration.
//!
//! Wires the fetch, scoring, storage and outreach services together in
//! the order a full run executes them: source leads, score and filter,
//! sync to Airtable, draft outreach, then preview or send.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{OpenAiSettings, Settings};
use crate::core::{classify_location, LeadProcessor};
use crate::models::{EmailDraft, Lead};
use crate::services::{AirtableClient, ApolloClient, GmailSender, LeadCache, OutreachGenerator};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("No leads available to process")]
    NoLeads,
}

/// Options for a single run, resolved from CLI flags and configuration.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub max_leads: usize,
    pub min_score: f64,
    pub force_refresh: bool,
    pub preview_only: bool,
    pub no_email: bool,
}

/// Counters from a completed run
///
/// Steps that were skipped (no qualified leads, preview mode, --no-email)
/// leave their counters at zero.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PipelineReport {
    pub fetched: usize,
    pub qualified: usize,
    pub stored_created: usize,
    pub stored_updated: usize,
    pub stored_failed: usize,
    pub drafted: usize,
    pub emails_sent: usize,
    pub emails_failed: usize,
}

pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Execute a full run: fetch, score, store, draft and (optionally) send.
    pub async fn run(&self, options: RunOptions) -> Result<PipelineReport, PipelineError> {
        self.settings.validate_required()?;

        let mut report = PipelineReport::default();

        let cache = LeadCache::new(&self.settings.cache.dir, self.settings.cache.expiry_hours);
        let apollo = ApolloClient::new(&self.settings.apollo, &self.settings.search, cache);

        info!("Fetching up to {} leads", options.max_leads);
        let leads = apollo
            .fetch_leads(options.max_leads, options.force_refresh)
            .await;
        if leads.is_empty() {
            return Err(PipelineError::NoLeads);
        }
        report.fetched = leads.len();

        let processor = LeadProcessor::new(self.settings.scoring.weights.into());
        let result = processor.process(leads, options.min_score);
        report.qualified = result.leads.len();
        info!(
            "{} of {} leads scored at or above {:.2}",
            result.leads.len(),
            result.total_scored,
            options.min_score
        );

        if result.leads.is_empty() {
            warn!("No leads qualified; nothing to store or contact");
            return Ok(report);
        }

        let summary = &result.summary;
        info!(
            "Qualified batch: avg {:.3}, top {:.3}, bottom {:.3}",
            summary.average_score, summary.top_score, summary.bottom_score
        );
        debug!("Regions: {:?}", summary.regions);
        debug!("Top industries: {:?}", summary.top_industries);

        let airtable = AirtableClient::new(&self.settings.airtable);
        let store_report = airtable.push_leads(&result.leads).await;
        info!(
            "Airtable sync: {} created, {} updated, {} failed",
            store_report.created, store_report.updated, store_report.failed
        );
        report.stored_created = store_report.created;
        report.stored_updated = store_report.updated;
        report.stored_failed = store_report.failed;

        if options.no_email {
            info!("Email step skipped");
            return Ok(report);
        }

        let generator = OutreachGenerator::new(&self.settings.openai, &self.settings.email.subject);
        let drafts = generator.generate_batch(&result.leads).await;
        report.drafted = drafts.len();

        if options.preview_only {
            preview_drafts(&drafts);
            return Ok(report);
        }

        let sender = GmailSender::new(&self.settings.email);
        let send_report = sender.send_batch(&drafts).await;
        info!(
            "Sent {} of {} emails ({:.2}% success)",
            send_report.sent,
            send_report.total,
            send_report.success_rate()
        );
        report.emails_sent = send_report.sent;
        report.emails_failed = send_report.failed;

        Ok(report)
    }

    /// Score and draft a fixed batch of sample leads without any network calls.
    ///
    /// The generator runs with an empty API key, which keeps it on the
    /// offline template, so the demo works without credentials.
    pub async fn run_demo(&self, min_score: f64) {
        let processor = LeadProcessor::new(self.settings.scoring.weights.into());
        let result = processor.process(sample_leads(), min_score);

        println!(
            "Scored {} sample leads, {} qualified at {:.2}:",
            result.total_scored,
            result.leads.len(),
            min_score
        );
        println!();
        for lead in &result.leads {
            println!(
                "  {:.3}  {} ({} at {})  [{}]",
                lead.score,
                lead.full_name(),
                lead.title,
                lead.company_name,
                lead.score_reasons.join(", ")
            );
        }

        let generator =
            OutreachGenerator::new(&OpenAiSettings::default(), &self.settings.email.subject);
        let drafts = generator.generate_batch(&result.leads).await;
        preview_drafts(&drafts);
    }
}

/// Print drafts to stdout in preview form.
fn preview_drafts(drafts: &[EmailDraft]) {
    println!();
    println!("=== Email previews ({}) ===", drafts.len());
    for draft in drafts {
        println!();
        println!("To: {} <{}>", draft.to_name, draft.to_email);
        println!("Subject: {}", draft.subject);
        println!("{}", draft.body);
        println!("{}", "-".repeat(60));
    }
}

fn sample_lead(
    first: &str,
    last: &str,
    title: &str,
    company: &str,
    industry: &str,
    size: u32,
    location: &str,
) -> Lead {
    Lead {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        title: title.to_string(),
        company_name: company.to_string(),
        company_industry: industry.to_string(),
        company_size: size,
        company_location: location.to_string(),
        region: classify_location(location),
        ..Default::default()
    }
}

/// Sample leads covering the scoring bands end to end.
fn sample_leads() -> Vec<Lead> {
    vec![
        sample_lead(
            "John",
            "Smith",
            "CTO",
            "TechCorp Inc",
            "Technology",
            150,
            "San Francisco, USA",
        ),
        sample_lead(
            "Sarah",
            "Johnson",
            "VP of Engineering",
            "Innovate Solutions",
            "Software",
            200,
            "London, United Kingdom",
        ),
        sample_lead(
            "Miguel",
            "Alvarez",
            "Head of Security",
            "HealthBridge",
            "Healthcare",
            80,
            "Toronto, Canada",
        ),
        sample_lead(
            "Priya",
            "Narayan",
            "CTO",
            "ShopLocal",
            "Retail",
            700,
            "Sydney, Australia",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoringWeights;

    #[test]
    fn test_sample_leads_cover_the_scoring_bands() {
        let processor = LeadProcessor::new(ScoringWeights::default());
        let result = processor.process(sample_leads(), 0.6);

        assert_eq!(result.total_scored, 4);
        assert_eq!(result.leads.len(), 3);
        assert_eq!(result.leads[0].score, 1.0);
        assert_eq!(result.leads[0].full_name(), "John Smith");
        assert_eq!(result.leads[2].score, 0.82);
    }

    #[test]
    fn test_run_options_carry_flags() {
        let options = RunOptions {
            max_leads: 5,
            min_score: 0.7,
            force_refresh: true,
            preview_only: true,
            no_email: false,
        };
        assert_eq!(options.max_leads, 5);
        assert!(options.force_refresh);
    }
}
