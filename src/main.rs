//! contract-search CLI
//!
//! Loads a JSON export of contract-processing records and runs one of the
//! tools on it:
//! - `search` - hybrid, exact or fuzzy search
//! - `suggest` - autocomplete a partial query
//! - `agencies` - success rate dashboard per agency
//! - `overview` - dataset shape, contract types and daily volume
//! - `shell` - interactive session reading queries from stdin
//! - `config` - print the effective configuration or its schema

use anyhow::Result;
use clap::Parser;
use contract_search::cli::{self, Cli, Commands};
use contract_search::config::{self, SearchConfig};
use contract_search::error::AppError;
use contract_search::tools::{self, util::load_store};
use std::path::Path;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    let result = match cli.command {
        Some(command) => run_command(command, cli.data.as_deref(), cli.config.as_deref()),
        None => {
            eprintln!("Error: No command specified. Use --help for usage information.");
            std::process::exit(1);
        }
    };

    // Handle result and exit with appropriate code
    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(get_exit_code(&e));
        }
    }
}

fn run_command(
    command: Commands,
    data: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<String> {
    let config = config::load_config(config_path)?;
    debug!("Effective config: {:?}", config);

    match command {
        Commands::Search(args) => {
            let store = load_store(data)?;
            Ok(tools::search::execute_search(&store, &config, &args)?)
        }
        Commands::Suggest(args) => {
            let store = load_store(data)?;
            Ok(tools::suggest::execute_suggest(&store, &config, &args)?)
        }
        Commands::Agencies(args) => {
            let store = load_store(data)?;
            Ok(tools::agencies::execute_agencies(&store, &args)?)
        }
        Commands::Overview => {
            let store = load_store(data)?;
            Ok(tools::overview::execute_overview(&store))
        }
        Commands::Shell(args) => execute_shell_cli(&config, data, args),
        Commands::Config(args) => execute_config_cli(&config, args),
    }
}

/// Execute shell command in CLI mode
fn execute_shell_cli(
    config: &SearchConfig,
    data: Option<&Path>,
    args: cli::ShellArgs,
) -> Result<String> {
    let store = load_store(data)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    tools::shell::run_shell(&store, config, &args, stdin.lock(), stdout.lock())?;
    Ok(String::new())
}

/// Execute config command in CLI mode
fn execute_config_cli(config: &SearchConfig, args: cli::ConfigArgs) -> Result<String> {
    if args.schema {
        return config::config_schema();
    }
    serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)).into())
}

/// Map errors to exit codes
fn get_exit_code(err: &anyhow::Error) -> i32 {
    if let Some(app_err) = err.downcast_ref::<AppError>() {
        return match app_err {
            AppError::InvalidInput(_) => 1,
            AppError::NotFound(_) => 3,
            _ => 5,
        };
    }

    let err_str = err.to_string().to_lowercase();
    if err_str.contains("invalid") || err_str.contains("usage") {
        1 // Invalid arguments or usage error
    } else if err_str.contains("not found") {
        3 // Not found error
    } else {
        5 // Other application errors
    }
}
