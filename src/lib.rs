//! BDR Engine - Lead sourcing, scoring and outreach pipeline
//!
//! This library fetches leads from Apollo, scores them against an ideal
//! customer profile, syncs the qualified ones to Airtable and drafts
//! personalized outreach email for each.

pub mod cli;
pub mod config;
pub mod core;
pub mod models;
pub mod pipeline;
pub mod services;

// Re-export commonly used types
pub use core::{classify_location, LeadProcessor, ProcessResult};
pub use models::{EmailDraft, Lead, LeadSummary, Region, ScoringWeights};
