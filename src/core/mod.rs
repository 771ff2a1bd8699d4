// Core algorithm exports
pub mod processor;
pub mod region;
pub mod scoring;

pub use processor::{LeadProcessor, ProcessResult, DEFAULT_MIN_SCORE};
pub use region::classify_location;
pub use scoring::{
    calculate_company_size_score, calculate_industry_score, calculate_region_score,
    calculate_total_score, round_score,
};
