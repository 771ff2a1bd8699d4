// Unit tests for the BDR engine

use bdr_engine::core::{
    processor::DEFAULT_MIN_SCORE,
    region::classify_location,
    scoring::{
        calculate_company_size_score, calculate_industry_score, calculate_region_score,
        calculate_total_score,
    },
    LeadProcessor,
};
use bdr_engine::models::{Lead, Region, ScoringWeights};

fn create_test_lead(first_name: &str, industry: &str, company_size: u32, region: Region) -> Lead {
    Lead {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        title: "CTO".to_string(),
        company_name: format!("{} Labs", first_name),
        company_industry: industry.to_string(),
        company_size,
        region,
        ..Default::default()
    }
}

#[test]
fn test_industry_table_values() {
    assert_eq!(calculate_industry_score("Technology").0, 1.0);
    assert_eq!(calculate_industry_score("Software").0, 1.0);
    assert_eq!(calculate_industry_score("SaaS").0, 1.0);
    assert_eq!(calculate_industry_score("Cybersecurity").0, 0.9);
    assert_eq!(calculate_industry_score("Fintech").0, 0.8);
    assert_eq!(calculate_industry_score("Healthcare").0, 0.7);
    assert_eq!(calculate_industry_score("Ecommerce").0, 0.7);
    assert_eq!(calculate_industry_score("Manufacturing").0, 0.6);
    assert_eq!(calculate_industry_score("Consulting").0, 0.5);
    assert_eq!(calculate_industry_score("Retail").0, 0.4);
    assert_eq!(calculate_industry_score("Education").0, 0.4);
    assert_eq!(
        calculate_industry_score("Non-Profit"),
        (0.3, "industry:non-profit".to_string())
    );
}

#[test]
fn test_industry_precedence_over_later_keys() {
    // "technology" sits above "healthcare" in the relevance table
    let (score, reason) = calculate_industry_score("Healthcare Technology");
    assert_eq!(score, 1.0);
    assert_eq!(reason, "industry:technology");
}

#[test]
fn test_industry_fallback_values() {
    assert_eq!(
        calculate_industry_score(""),
        (0.5, "industry:unknown".to_string())
    );
    assert_eq!(
        calculate_industry_score("Agriculture"),
        (0.3, "industry:unknown".to_string())
    );
}

#[test]
fn test_company_size_band_sweep() {
    let cases = [
        (0u32, 0.5),
        (1, 0.3),
        (49, 0.3),
        (50, 0.8),
        (99, 0.8),
        (100, 1.0),
        (150, 1.0),
        (300, 1.0),
        (301, 0.7),
        (500, 0.7),
        (501, 0.3),
    ];

    for (size, expected) in cases {
        assert_eq!(
            calculate_company_size_score(size).0,
            expected,
            "unexpected score for size {}",
            size
        );
    }
}

#[test]
fn test_region_weight_values() {
    assert_eq!(calculate_region_score(Region::NorthAmerica).0, 1.0);
    assert_eq!(calculate_region_score(Region::Europe).0, 0.9);
    assert_eq!(calculate_region_score(Region::Other).0, 0.5);
    assert_eq!(calculate_region_score(Region::Unknown).0, 0.5);
}

#[test]
fn test_classify_location_north_america() {
    assert_eq!(classify_location("San Francisco, USA"), Region::NorthAmerica);
    assert_eq!(classify_location("Toronto, Canada"), Region::NorthAmerica);
    assert_eq!(classify_location("Mexico City, Mexico"), Region::NorthAmerica);
}

#[test]
fn test_classify_location_europe() {
    assert_eq!(classify_location("Berlin, Germany"), Region::Europe);
    assert_eq!(classify_location("London, UK"), Region::Europe);
    assert_eq!(classify_location("madrid, spain"), Region::Europe);
}

#[test]
fn test_classify_location_checks_north_america_first() {
    // "Canada" wins over "London" matching anything European
    assert_eq!(classify_location("London, Canada"), Region::NorthAmerica);
}

#[test]
fn test_classify_location_fallbacks() {
    assert_eq!(classify_location("Tokyo, Japan"), Region::Other);
    assert_eq!(classify_location("Remote"), Region::Other);
    assert_eq!(classify_location(""), Region::Unknown);
}

#[test]
fn test_total_score_perfect_lead() {
    let lead = create_test_lead("Ada", "Software", 150, Region::NorthAmerica);
    let (score, reasons) = calculate_total_score(&lead, &ScoringWeights::default());

    assert_eq!(score, 1.0);
    assert_eq!(
        reasons,
        vec![
            "+industry:software",
            "+size:100-300",
            "+region:north america"
        ]
    );
}

#[test]
fn test_total_score_poor_lead_has_no_reasons() {
    let lead = create_test_lead("Bob", "Retail", 700, Region::Other);
    let (score, reasons) = calculate_total_score(&lead, &ScoringWeights::default());

    assert_eq!(score, 0.4);
    assert!(reasons.is_empty());
}

#[test]
fn test_total_score_with_custom_weights() {
    let weights = ScoringWeights {
        industry: 1.0,
        company_size: 0.0,
        region: 0.0,
    };
    let lead = create_test_lead("Fin", "Fintech", 10, Region::Other);

    assert_eq!(calculate_total_score(&lead, &weights).0, 0.8);
}

#[test]
fn test_rank_populates_sub_scores() {
    let processor = LeadProcessor::with_default_weights();
    let mut leads = vec![create_test_lead(
        "Ada",
        "Software",
        150,
        Region::NorthAmerica,
    )];

    processor.rank_leads(&mut leads);

    assert_eq!(leads[0].score, 1.0);
    assert_eq!(leads[0].industry_score, 1.0);
    assert_eq!(leads[0].company_size_score, 1.0);
    assert_eq!(leads[0].region_score, 1.0);
    assert_eq!(leads[0].score_reasons.len(), 3);
}

#[test]
fn test_process_ranks_filters_and_counts() {
    let processor = LeadProcessor::with_default_weights();
    let leads = vec![
        create_test_lead("Low", "Retail", 700, Region::Other),
        create_test_lead("High", "Software", 150, Region::NorthAmerica),
        create_test_lead("Mid", "Healthcare", 150, Region::NorthAmerica),
        create_test_lead("Edge", "Consulting", 80, Region::Europe),
    ];

    let result = processor.process(leads, DEFAULT_MIN_SCORE);

    assert_eq!(result.total_scored, 4);
    assert_eq!(result.leads.len(), 3);

    // Qualifying leads come back sorted by score
    for i in 1..result.leads.len() {
        assert!(
            result.leads[i - 1].score >= result.leads[i].score,
            "leads not sorted by score"
        );
    }
    for lead in &result.leads {
        assert!(lead.score >= DEFAULT_MIN_SCORE);
    }
}

#[test]
fn test_summary_statistics_round_to_three_decimals() {
    let processor = LeadProcessor::with_default_weights();
    let mut leads = vec![
        create_test_lead("High", "Software", 150, Region::NorthAmerica),
        create_test_lead("Mid", "Healthcare", 150, Region::NorthAmerica),
        create_test_lead("Low", "Retail", 700, Region::Other),
    ];
    processor.rank_leads(&mut leads);

    let summary = processor.get_lead_summary(&leads);

    assert_eq!(summary.total_leads, 3);
    assert_eq!(summary.average_score, 0.76);
    assert_eq!(summary.top_score, 1.0);
    assert_eq!(summary.bottom_score, 0.4);
}

#[test]
fn test_summary_histogram_bands_do_not_overlap() {
    let processor = LeadProcessor::with_default_weights();
    let leads: Vec<Lead> = [50u32, 99, 100, 300, 301, 500, 49, 501, 0]
        .iter()
        .map(|&size| create_test_lead("Size", "Software", size, Region::Europe))
        .collect();

    let summary = processor.get_lead_summary(&leads);

    assert_eq!(summary.company_sizes[0], ("50-100".to_string(), 2));
    assert_eq!(summary.company_sizes[1], ("100-300".to_string(), 2));
    assert_eq!(summary.company_sizes[2], ("300-500".to_string(), 2));

    // Sizes outside every band are left out of the histogram entirely
    let counted: usize = summary.company_sizes.iter().map(|(_, n)| n).sum();
    assert_eq!(counted, 6);
    assert_eq!(summary.total_leads, 9);
}

#[test]
fn test_summary_top_industries_truncates_to_five() {
    let processor = LeadProcessor::with_default_weights();
    let industries = [
        "Software",
        "Software",
        "Fintech",
        "Retail",
        "Education",
        "Consulting",
        "Manufacturing",
        "Healthcare",
    ];
    let leads: Vec<Lead> = industries
        .iter()
        .map(|&industry| create_test_lead("Ind", industry, 150, Region::Europe))
        .collect();

    let summary = processor.get_lead_summary(&leads);

    assert_eq!(summary.top_industries.len(), 5);
    assert_eq!(summary.top_industries[0], ("Software".to_string(), 2));

    // Ties keep first-seen order
    let names: Vec<&str> = summary.top_industries[1..]
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names, vec!["Fintech", "Retail", "Education", "Consulting"]);
}

#[test]
fn test_full_name_handles_missing_parts() {
    let full = create_test_lead("Ada", "Software", 150, Region::Europe);
    assert_eq!(full.full_name(), "Ada Tester");

    let first_only = Lead {
        first_name: "Ada".to_string(),
        ..Default::default()
    };
    assert_eq!(first_only.full_name(), "Ada");

    let last_only = Lead {
        last_name: "Lovelace".to_string(),
        ..Default::default()
    };
    assert_eq!(last_only.full_name(), "Lovelace");
}
