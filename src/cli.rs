//! CLI mode implementation
//!
//! Provides the command-line interface for the contract search tools

use crate::search::SearchMode;
use clap::{Parser, Subcommand, ValueEnum};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// contract-search CLI
#[derive(Parser, Debug)]
#[command(name = "contract-search")]
#[command(about = "Hybrid, exact and fuzzy search over contract-processing records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// JSON file holding an array of records
    #[arg(short = 'd', long, global = true, env = "CONTRACT_SEARCH_DATA")]
    pub data: Option<PathBuf>,

    /// Configuration file (defaults to the per-user config when present)
    #[arg(short = 'c', long, global = true, env = "CONTRACT_SEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search records
    Search(SearchArgs),
    /// Autocomplete a partial query
    Suggest(SuggestArgs),
    /// Success rates per agency
    Agencies(AgenciesArgs),
    /// Dataset overview, contract types and daily volume
    Overview,
    /// Interactive search session reading queries from stdin
    Shell(ShellArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Search tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SearchArgs {
    /// Free-text query, e.g. "contrats ko nvm septembre"
    #[arg(short = 'q', long)]
    #[schemars(description = "Free-text query, e.g. \"contrats ko nvm septembre\"")]
    pub query: String,

    /// Search mode
    #[arg(short = 'm', long, value_enum, default_value_t = SearchMode::Hybrid)]
    #[serde(default)]
    #[schemars(description = "hybrid (default), exact or fuzzy")]
    pub mode: SearchMode,

    /// Maximum number of rows shown (default 50, max 500)
    #[arg(short = 'l', long)]
    #[schemars(description = "Maximum number of rows shown (default 50, max 500)")]
    pub limit: Option<usize>,
}

/// Suggest tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SuggestArgs {
    /// Partial query, at least two characters
    #[arg(short = 'q', long)]
    #[schemars(description = "Partial query, at least two characters")]
    pub query: String,

    /// Maximum number of suggestions (defaults to the configured limit)
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,
}

/// Ordering of the agency table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AgencySort {
    /// Success rate, best first
    #[default]
    Rate,
    /// Failure count, most first
    Ko,
    /// Record count, most first
    Total,
}

/// Agency report arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct AgenciesArgs {
    /// Hide agencies below this success rate (0-100)
    #[arg(long, default_value_t = 0.0)]
    #[serde(default)]
    pub min_rate: f64,

    /// Table ordering
    #[arg(long, value_enum, default_value_t = AgencySort::Rate)]
    #[serde(default)]
    pub sort: AgencySort,

    /// Only list these agency codes (repeatable or comma-separated)
    #[arg(short = 'a', long = "agency", value_delimiter = ',')]
    #[serde(default)]
    #[schemars(description = "Agency codes to list; empty lists every agency")]
    pub agency: Vec<String>,
}

/// Interactive session arguments
#[derive(Parser, Clone, Debug)]
pub struct ShellArgs {
    /// Initial search mode
    #[arg(short = 'm', long, value_enum, default_value_t = SearchMode::Hybrid)]
    pub mode: SearchMode,

    /// Maximum number of rows shown per query
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,
}

/// Config command arguments
#[derive(Parser, Clone, Debug)]
pub struct ConfigArgs {
    /// Print the JSON schema of the config file instead
    #[arg(long)]
    pub schema: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args_defaults() {
        let cli = Cli::parse_from(["contract-search", "search", "-q", "ko nvm"]);
        match cli.command {
            Some(Commands::Search(args)) => {
                assert_eq!(args.query, "ko nvm");
                assert_eq!(args.mode, SearchMode::Hybrid);
                assert_eq!(args.limit, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "contract-search",
            "search",
            "-q",
            "173",
            "-m",
            "fuzzy",
            "--data",
            "records.json",
            "--verbose",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.data, Some(PathBuf::from("records.json")));
        match cli.command {
            Some(Commands::Search(args)) => assert_eq!(args.mode, SearchMode::Fuzzy),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_agencies_args() {
        let cli = Cli::parse_from(["contract-search", "agencies", "--min-rate", "60", "--sort", "ko"]);
        match cli.command {
            Some(Commands::Agencies(args)) => {
                assert_eq!(args.min_rate, 60.0);
                assert_eq!(args.sort, AgencySort::Ko);
                assert!(args.agency.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_agency_filter_list() {
        let cli = Cli::parse_from([
            "contract-search",
            "agencies",
            "-a",
            "NVM,ABC",
            "--agency",
            "LYO",
        ]);
        match cli.command {
            Some(Commands::Agencies(args)) => assert_eq!(args.agency, vec!["NVM", "ABC", "LYO"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_overview_command() {
        let cli = Cli::parse_from(["contract-search", "overview", "-d", "records.json"]);
        assert!(matches!(cli.command, Some(Commands::Overview)));
    }

    #[test]
    fn test_search_args_from_json() {
        let args: SearchArgs = serde_json::from_str(r#"{"query": "ko", "limit": 5}"#).unwrap();
        assert_eq!(args.mode, SearchMode::Hybrid);
        assert_eq!(args.limit, Some(5));
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let result = Cli::try_parse_from(["contract-search", "search", "-q", "x", "-m", "regex"]);
        assert!(result.is_err());
    }
}
