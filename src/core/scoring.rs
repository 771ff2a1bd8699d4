use crate::models::{Lead, Region, ScoringWeights};

/// Industry relevance table, ordered so the first matching key wins
const INDUSTRY_WEIGHTS: &[(&str, f64)] = &[
    ("technology", 1.0),
    ("software", 1.0),
    ("saas", 1.0),
    ("cybersecurity", 0.9),
    ("fintech", 0.8),
    ("healthcare", 0.7),
    ("ecommerce", 0.7),
    ("manufacturing", 0.6),
    ("consulting", 0.5),
    ("retail", 0.4),
    ("education", 0.4),
    ("non-profit", 0.3),
];

/// Discount for matching only one word of a multi-word industry key
const PARTIAL_MATCH_PENALTY: f64 = 0.8;

/// Sub-scores strictly above this threshold surface as "+" reasons
const REASON_THRESHOLD: f64 = 0.7;

/// Calculate a lead score (0-1) with the reasons that drove it
///
/// Scoring formula:
/// score = (
///     industry_score * 0.4 +       # Relevance of the industry to our ICP
///     size_score * 0.3 +           # Preferred employee-count band
///     region_score * 0.3           # Target geography
/// )
///
/// The weighted sum is rounded to 3 decimal places. Only sub-scores
/// strictly above 0.7 contribute a reason tag, so a lead can score well
/// with an empty reasons list.
pub fn calculate_total_score(lead: &Lead, weights: &ScoringWeights) -> (f64, Vec<String>) {
    let (industry_score, industry_reason) = calculate_industry_score(&lead.company_industry);
    let (size_score, size_reason) = calculate_company_size_score(lead.company_size);
    let (region_score, region_reason) = calculate_region_score(lead.region);

    let total_score = industry_score * weights.industry
        + size_score * weights.company_size
        + region_score * weights.region;

    let mut reasons = Vec::new();
    if industry_score > REASON_THRESHOLD {
        reasons.push(format!("+{}", industry_reason));
    }
    if size_score > REASON_THRESHOLD {
        reasons.push(format!("+{}", size_reason));
    }
    if region_score > REASON_THRESHOLD {
        reasons.push(format!("+{}", region_reason));
    }

    (round_score(total_score), reasons)
}

/// Calculate industry relevance (0-1), tagged with the matched table key
///
/// A case-insensitive substring pass over the table runs first; a second
/// pass accepts single-word fragments of multi-word keys at a discount.
/// Missing industry is neutral (0.5), an unmatched one scores low (0.3).
pub fn calculate_industry_score(industry: &str) -> (f64, String) {
    if industry.is_empty() {
        return (0.5, "industry:unknown".to_string());
    }

    let industry_lower = industry.to_lowercase();

    for &(key, weight) in INDUSTRY_WEIGHTS {
        if industry_lower.contains(key) {
            return (weight, format!("industry:{}", key));
        }
    }

    for &(key, weight) in INDUSTRY_WEIGHTS {
        if key.split_whitespace().any(|word| industry_lower.contains(word)) {
            return (
                weight * PARTIAL_MATCH_PENALTY,
                format!("industry:{}(partial)", key),
            );
        }
    }

    (0.3, "industry:unknown".to_string())
}

/// Calculate company size fit (0-1) against the preferred headcount bands
///
/// The 100-300 band takes priority, so the shared boundaries 100 and 300
/// always land in the strongest band.
pub fn calculate_company_size_score(company_size: u32) -> (f64, String) {
    match company_size {
        0 => (0.5, "size:unknown".to_string()),
        100..=300 => (1.0, "size:100-300".to_string()),
        50..=99 => (0.8, "size:50-100".to_string()),
        301..=500 => (0.7, "size:300-500".to_string()),
        1..=49 => (0.3, "size:too-small".to_string()),
        _ => (0.3, "size:too-large".to_string()),
    }
}

/// Calculate region fit (0-1); regions outside the table score 0.5
pub fn calculate_region_score(region: Region) -> (f64, String) {
    let weight = match region {
        Region::NorthAmerica => 1.0,
        Region::Europe => 0.9,
        Region::Other | Region::Unknown => 0.5,
    };

    (weight, format!("region:{}", region.as_str().to_lowercase()))
}

/// Round to the 3 decimal places reported everywhere
#[inline]
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
