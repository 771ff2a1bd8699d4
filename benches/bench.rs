// Criterion benchmarks for the BDR engine

use bdr_engine::core::{classify_location, scoring::calculate_total_score, LeadProcessor};
use bdr_engine::models::{Lead, ScoringWeights};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_lead(i: usize) -> Lead {
    let industries = ["Software", "Fintech", "Healthcare", "Retail", "Agriculture"];
    let locations = [
        "San Francisco, USA",
        "Berlin, Germany",
        "Toronto, Canada",
        "Tokyo, Japan",
        "London, UK",
    ];

    Lead {
        first_name: format!("Lead{}", i),
        last_name: "Bench".to_string(),
        email: format!("lead{}@example.com", i),
        title: "CTO".to_string(),
        company_name: format!("Company {}", i),
        company_industry: industries[i % industries.len()].to_string(),
        company_size: ((i * 37) % 800) as u32,
        company_location: locations[i % locations.len()].to_string(),
        region: classify_location(locations[i % locations.len()]),
        ..Default::default()
    }
}

fn bench_total_score(c: &mut Criterion) {
    let lead = create_lead(1);
    let weights = ScoringWeights::default();

    c.bench_function("calculate_total_score", |b| {
        b.iter(|| calculate_total_score(black_box(&lead), black_box(&weights)));
    });
}

fn bench_classify_location(c: &mut Criterion) {
    c.bench_function("classify_location", |b| {
        b.iter(|| classify_location(black_box("Stockholm, Sweden")));
    });
}

fn bench_processing(c: &mut Criterion) {
    let processor = LeadProcessor::with_default_weights();

    let mut group = c.benchmark_group("processing");

    for lead_count in [10, 50, 100, 500, 1000].iter() {
        let leads: Vec<Lead> = (0..*lead_count).map(create_lead).collect();

        group.bench_with_input(
            BenchmarkId::new("process", lead_count),
            lead_count,
            |b, _| {
                b.iter(|| processor.process(black_box(leads.clone()), black_box(0.6)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_total_score,
    bench_classify_location,
    bench_processing
);

criterion_main!(benches);
