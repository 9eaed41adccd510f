//! Interactive search session
//!
//! Reads one query per line. Lines starting with `:` are commands:
//! `:mode <hybrid|exact|fuzzy>`, `:history`, `:suggest <text>`, `:help`
//! and `:quit`.

use super::search::{format_search_results, DEFAULT_LIMIT, MAX_LIMIT};
use super::suggest::format_suggestions;
use crate::cli::ShellArgs;
use crate::config::SearchConfig;
use crate::error::{validate_query, AppError};
use crate::records::RecordStore;
use crate::search::{SearchEngine, SearchMode, SuggestionGenerator};
use crate::session::SessionContext;
use clap::ValueEnum;
use std::io::{BufRead, Write};
use tracing::debug;

const PROMPT: &str = "search> ";

const HELP: &str = "\
Type a query to search, or one of:
  :mode <hybrid|exact|fuzzy>  switch search mode
  :history                    list recent queries
  :suggest <text>             autocomplete partial input
  :quit                       leave the session
";

/// Run a session until `:quit` or end of input
pub fn run_shell<R: BufRead, W: Write>(
    store: &RecordStore,
    config: &SearchConfig,
    args: &ShellArgs,
    input: R,
    mut output: W,
) -> Result<(), AppError> {
    let engine = SearchEngine::from_config(config);
    let generator = SuggestionGenerator::with_min_chars(config.min_suggestion_chars);
    let limit = args.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let mut session = SessionContext::with_capacity(config.history_capacity);
    session.mode = args.mode;

    write!(output, "{}", PROMPT)?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();

        if let Some(command) = line.strip_prefix(':') {
            let (name, rest) = command
                .split_once(char::is_whitespace)
                .map(|(name, rest)| (name, rest.trim()))
                .unwrap_or((command, ""));

            match name {
                "q" | "quit" | "exit" => break,
                "mode" => match SearchMode::from_str(rest, true) {
                    Ok(mode) => {
                        session.mode = mode;
                        writeln!(output, "Mode: {}", mode)?;
                    }
                    Err(_) => writeln!(
                        output,
                        "Unknown mode '{}', expected hybrid, exact or fuzzy",
                        rest
                    )?,
                },
                "history" => {
                    let mut empty = true;
                    for (i, query) in session.history().enumerate() {
                        writeln!(output, "{}. {}", i + 1, query)?;
                        empty = false;
                    }
                    if empty {
                        writeln!(output, "(no queries yet)")?;
                    }
                }
                "suggest" => {
                    let suggestions = generator.suggest(rest, store, config.suggestion_limit);
                    write!(output, "{}", format_suggestions(&suggestions, rest))?;
                }
                "help" | "h" => write!(output, "{}", HELP)?,
                other => writeln!(output, "Unknown command ':{}', try :help", other)?,
            }
        } else if !line.is_empty() {
            match validate_query(line) {
                Ok(()) => {
                    session.record_query(line);
                    let results = engine.search(line, store, session.mode);
                    debug!("Session query '{}' returned {} records", line, results.len());
                    write!(
                        output,
                        "{}",
                        format_search_results(&results, store, line, session.mode, limit)
                    )?;
                }
                Err(e) => writeln!(output, "Error: {}", e.message())?,
            }
        }

        write!(output, "\n{}", PROMPT)?;
        output.flush()?;
    }

    writeln!(output)?;
    Ok(())
}
