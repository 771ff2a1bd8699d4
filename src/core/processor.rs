use crate::core::scoring::{
    calculate_company_size_score, calculate_industry_score, calculate_region_score,
    calculate_total_score, round_score,
};
use crate::models::{Lead, LeadSummary, ScoringWeights};

/// Default minimum score for the qualification filter
pub const DEFAULT_MIN_SCORE: f64 = 0.6;

/// Result of a full processing run
#[derive(Debug)]
pub struct ProcessResult {
    pub leads: Vec<Lead>,
    pub summary: LeadSummary,
    pub total_scored: usize,
}

/// Main lead processing orchestrator
///
/// # Pipeline Stages
/// 1. Score every lead and attach score fields in place
/// 2. Rank by total score, best first
/// 3. Filter out leads below the minimum score
/// 4. Summarize the qualifying batch
#[derive(Debug, Clone)]
pub struct LeadProcessor {
    weights: ScoringWeights,
}

impl LeadProcessor {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Score every lead in place and sort by score, best first
    ///
    /// Writes `score`, `score_reasons` and the per-criterion sub-scores
    /// onto each lead. The sort is stable, so leads with equal scores
    /// keep their fetch order.
    pub fn rank_leads(&self, leads: &mut Vec<Lead>) {
        for lead in leads.iter_mut() {
            let (score, reasons) = calculate_total_score(lead, &self.weights);
            lead.score = score;
            lead.score_reasons = reasons;
            lead.industry_score = calculate_industry_score(&lead.company_industry).0;
            lead.company_size_score = calculate_company_size_score(lead.company_size).0;
            lead.region_score = calculate_region_score(lead.region).0;
        }

        leads.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// Keep only leads at or above the minimum score
    ///
    /// # Arguments
    /// * `leads` - Previously ranked leads
    /// * `min_score` - Inclusive score threshold
    ///
    /// # Returns
    /// The qualifying leads in their ranked order
    pub fn filter_high_quality_leads(&self, leads: Vec<Lead>, min_score: f64) -> Vec<Lead> {
        leads
            .into_iter()
            .filter(|lead| lead.score >= min_score)
            .collect()
    }

    /// Summarize a scored batch
    ///
    /// Empty input produces the all-zero summary. Region and industry
    /// counts accumulate in first-seen order; industries are truncated
    /// to the top five by count, ties keeping that order. The company
    /// size histogram reuses the scoring bands, so the boundary sizes
    /// 100 and 300 are counted once, under "100-300".
    pub fn get_lead_summary(&self, leads: &[Lead]) -> LeadSummary {
        if leads.is_empty() {
            return LeadSummary::default();
        }

        let total: f64 = leads.iter().map(|lead| lead.score).sum();
        let top = leads
            .iter()
            .map(|lead| lead.score)
            .fold(f64::NEG_INFINITY, f64::max);
        let bottom = leads
            .iter()
            .map(|lead| lead.score)
            .fold(f64::INFINITY, f64::min);

        let mut regions: Vec<(String, usize)> = Vec::new();
        let mut industries: Vec<(String, usize)> = Vec::new();
        for lead in leads {
            bump_count(&mut regions, lead.region.to_string());

            let industry = if lead.company_industry.is_empty() {
                "Unknown".to_string()
            } else {
                lead.company_industry.clone()
            };
            bump_count(&mut industries, industry);
        }

        // Stable sort keeps first-seen order among equal counts
        industries.sort_by(|a, b| b.1.cmp(&a.1));
        industries.truncate(5);

        let in_band = |low: u32, high: u32| {
            leads
                .iter()
                .filter(|lead| lead.company_size >= low && lead.company_size <= high)
                .count()
        };

        LeadSummary {
            total_leads: leads.len(),
            average_score: round_score(total / leads.len() as f64),
            top_score: round_score(top),
            bottom_score: round_score(bottom),
            regions,
            top_industries: industries,
            company_sizes: vec![
                ("50-100".to_string(), in_band(50, 99)),
                ("100-300".to_string(), in_band(100, 300)),
                ("300-500".to_string(), in_band(301, 500)),
            ],
        }
    }

    /// Score, rank, filter and summarize in one pass
    ///
    /// # Arguments
    /// * `leads` - Raw leads from the fetch layer
    /// * `min_score` - Inclusive qualification threshold
    ///
    /// # Returns
    /// ProcessResult with the qualifying leads in ranked order, their
    /// summary, and the count of leads that entered scoring
    pub fn process(&self, mut leads: Vec<Lead>, min_score: f64) -> ProcessResult {
        let total_scored = leads.len();

        self.rank_leads(&mut leads);
        let filtered = self.filter_high_quality_leads(leads, min_score);
        let summary = self.get_lead_summary(&filtered);

        ProcessResult {
            leads: filtered,
            summary,
            total_scored,
        }
    }
}

impl Default for LeadProcessor {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

fn bump_count(counts: &mut Vec<(String, usize)>, key: String) {
    if let Some(entry) = counts.iter_mut().find(|(existing, _)| *existing == key) {
        entry.1 += 1;
    } else {
        counts.push((key, 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Region;

    fn create_lead(email: &str, industry: &str, company_size: u32, region: Region) -> Lead {
        Lead {
            email: email.to_string(),
            company_industry: industry.to_string(),
            company_size,
            region,
            ..Default::default()
        }
    }

    #[test]
    fn test_rank_orders_best_first() {
        let processor = LeadProcessor::with_default_weights();
        let mut leads = vec![
            create_lead("low@example.com", "Retail", 700, Region::Other),
            create_lead("high@example.com", "Software", 150, Region::NorthAmerica),
        ];

        processor.rank_leads(&mut leads);

        assert_eq!(leads[0].email, "high@example.com");
        assert!(leads[0].score > leads[1].score);
    }

    #[test]
    fn test_rank_is_stable_for_equal_scores() {
        let processor = LeadProcessor::with_default_weights();
        let mut leads = vec![
            create_lead("first@example.com", "SaaS", 200, Region::NorthAmerica),
            create_lead("second@example.com", "SaaS", 200, Region::NorthAmerica),
            create_lead("third@example.com", "SaaS", 200, Region::NorthAmerica),
        ];

        processor.rank_leads(&mut leads);

        let emails: Vec<&str> = leads.iter().map(|lead| lead.email.as_str()).collect();
        assert_eq!(
            emails,
            vec!["first@example.com", "second@example.com", "third@example.com"]
        );
    }

    #[test]
    fn test_filter_threshold_is_inclusive() {
        let processor = LeadProcessor::with_default_weights();
        let mut leads = vec![create_lead(
            "edge@example.com",
            "Healthcare",
            150,
            Region::NorthAmerica,
        )];

        processor.rank_leads(&mut leads);
        assert_eq!(leads[0].score, 0.88);

        let kept = processor.filter_high_quality_leads(leads.clone(), 0.88);
        assert_eq!(kept.len(), 1, "a lead exactly at the threshold must pass");

        let dropped = processor.filter_high_quality_leads(leads, 0.881);
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_summary_of_empty_batch_is_zeroed() {
        let processor = LeadProcessor::with_default_weights();
        let summary = processor.get_lead_summary(&[]);

        assert_eq!(summary, LeadSummary::default());
        assert_eq!(summary.average_score, 0.0);
        assert!(summary.regions.is_empty());
    }

    #[test]
    fn test_summary_counts_and_top_industries() {
        let processor = LeadProcessor::with_default_weights();
        let mut leads = vec![
            create_lead("a@example.com", "Software", 150, Region::NorthAmerica),
            create_lead("b@example.com", "Software", 80, Region::Europe),
            create_lead("c@example.com", "Fintech", 250, Region::NorthAmerica),
            create_lead("d@example.com", "", 0, Region::Unknown),
        ];
        processor.rank_leads(&mut leads);

        let summary = processor.get_lead_summary(&leads);

        assert_eq!(summary.total_leads, 4);
        assert_eq!(summary.top_industries[0], ("Software".to_string(), 2));
        assert!(summary
            .top_industries
            .contains(&("Unknown".to_string(), 1)));
        assert!(summary
            .regions
            .contains(&("North America".to_string(), 2)));
    }
}
