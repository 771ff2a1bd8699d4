mod cli;
mod config;
mod core;
mod models;
mod pipeline;
mod services;

use clap::Parser;
use cli::Cli;
use config::Settings;
use pipeline::{Pipeline, RunOptions};
use services::{CacheStatus, LeadCache};
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
    };
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting BDR engine...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        process::exit(1);
    });

    // Resolve run parameters before settings move into the pipeline
    let max_leads = cli.max_leads.unwrap_or(settings.pipeline.max_leads);
    let min_score = cli.min_score.unwrap_or(settings.scoring.min_score);
    let preview_only = cli.preview_only || settings.pipeline.preview_only;

    // Cache maintenance commands short-circuit the pipeline
    if cli.cache_status || cli.clear_cache {
        let cache = LeadCache::new(&settings.cache.dir, settings.cache.expiry_hours);
        if cli.clear_cache {
            match cache.clear() {
                Ok(()) => println!("Lead cache cleared"),
                Err(e) => {
                    error!("Failed to clear cache: {}", e);
                    process::exit(1);
                }
            }
        } else {
            match cache.status() {
                Ok(CacheStatus::NoCache) => println!("No lead cache present"),
                Ok(CacheStatus::Valid {
                    leads_count,
                    age_hours,
                    expires_in_hours,
                    created_at,
                }) => println!(
                    "Cache: {} leads, {:.2}h old, expires in {:.2}h (created {})",
                    leads_count, age_hours, expires_in_hours, created_at
                ),
                Ok(CacheStatus::Expired {
                    leads_count,
                    age_hours,
                    created_at,
                }) => println!(
                    "Cache: {} leads, expired ({:.2}h old, created {})",
                    leads_count, age_hours, created_at
                ),
                Err(e) => {
                    error!("Failed to read cache status: {}", e);
                    process::exit(1);
                }
            }
        }
        return;
    }

    let pipeline = Pipeline::new(settings);

    if cli.demo {
        pipeline.run_demo(min_score).await;
        return;
    }

    let options = RunOptions {
        max_leads,
        min_score,
        force_refresh: cli.force_refresh,
        preview_only,
        no_email: cli.no_email,
    };

    match pipeline.run(options).await {
        Ok(report) => info!(
            "Run complete: {} fetched, {} qualified, {} stored, {} emails sent",
            report.fetched,
            report.qualified,
            report.stored_created + report.stored_updated,
            report.emails_sent
        ),
        Err(e) => {
            error!("Pipeline run failed: {}", e);
            process::exit(1);
        }
    }
}
