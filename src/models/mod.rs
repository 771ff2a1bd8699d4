// Model exports
pub mod domain;

pub use domain::{EmailDraft, Lead, LeadSummary, Region, ScoringWeights};
