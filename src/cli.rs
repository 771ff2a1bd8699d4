//! Command-line interface for the lead pipeline.

use clap::Parser;

/// Command-line options for a pipeline run.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bdr-engine",
    version,
    about = "Lead sourcing, scoring and outreach pipeline"
)]
pub struct Cli {
    /// Maximum number of leads to fetch and process
    #[arg(long)]
    pub max_leads: Option<usize>,

    /// Minimum score a lead must reach to qualify
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Print email drafts instead of sending them
    #[arg(long)]
    pub preview_only: bool,

    /// Skip email generation and sending entirely
    #[arg(long)]
    pub no_email: bool,

    /// Ignore cached leads and fetch fresh data
    #[arg(long)]
    pub force_refresh: bool,

    /// Run the offline demo against sample leads
    #[arg(long)]
    pub demo: bool,

    /// Show the lead cache status and exit
    #[arg(long)]
    pub cache_status: bool,

    /// Clear the lead cache and exit
    #[arg(long)]
    pub clear_cache: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::parse_from(["bdr-engine", "--max-leads", "25", "--force-refresh", "-v"]);
        assert_eq!(cli.max_leads, Some(25));
        assert!(cli.force_refresh);
        assert!(cli.verbose);
        assert!(!cli.demo);
    }

    #[test]
    fn test_cli_defaults_to_config_driven_run() {
        let cli = Cli::parse_from(["bdr-engine"]);
        assert_eq!(cli.max_leads, None);
        assert_eq!(cli.min_score, None);
        assert!(!cli.preview_only);
        assert!(!cli.no_email);
    }
}
