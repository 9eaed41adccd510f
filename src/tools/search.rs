//! Search tool implementation
//!
//! Implements the `search(query, mode, limit)` tool

use super::util::escape_cell;
use crate::cli::SearchArgs;
use crate::config::SearchConfig;
use crate::error::{validate_query, AppError};
use crate::records::RecordStore;
use crate::search::{SearchEngine, SearchMode, SearchResult};
use tracing::debug;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 500;

/// Run a search and render it as markdown
pub fn execute_search(
    store: &RecordStore,
    config: &SearchConfig,
    args: &SearchArgs,
) -> Result<String, AppError> {
    validate_query(&args.query)?;

    let limit = args.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    debug!(
        "Search request: query '{}', mode {}, limit {}",
        args.query, args.mode, limit
    );

    let engine = SearchEngine::from_config(config);
    let results = engine.search(&args.query, store, args.mode);
    Ok(format_search_results(&results, store, &args.query, args.mode, limit))
}

/// Format search results as a markdown table
///
/// Ranked modes get a leading score column and a score summary line.
pub fn format_search_results(
    results: &[SearchResult<'_>],
    store: &RecordStore,
    query: &str,
    mode: SearchMode,
    limit: usize,
) -> String {
    let mut md = String::new();
    md.push_str(&format!(
        "# Search Results · {} records ({})\n\n",
        results.len(),
        mode
    ));

    if results.is_empty() {
        md.push_str(&format!("No records match `{}`.\n", query.trim()));
        return md;
    }

    let scores: Vec<f64> = results.iter().filter_map(|r| r.score).collect();
    let ranked = !scores.is_empty();
    if ranked {
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let best = scores.iter().copied().fold(f64::MIN, f64::max);
        let min = scores.iter().copied().fold(f64::MAX, f64::min);
        md.push_str(&format!(
            "Score: mean {:.0} · best {:.0} · min {:.0}\n\n",
            mean, best, min
        ));
    }

    let columns = store.schema().columns();
    let mut header: Vec<String> = Vec::with_capacity(columns.len() + 1);
    if ranked {
        header.push("Score".to_string());
    }
    header.extend(columns.iter().map(|c| escape_cell(c)));

    md.push_str(&format!("| {} |\n", header.join(" | ")));
    md.push_str(&format!("|{}\n", "---|".repeat(header.len())));

    for result in results.iter().take(limit) {
        let mut cells: Vec<String> = Vec::with_capacity(header.len());
        if ranked {
            cells.push(format!("{:.0}", result.score.unwrap_or(0.0)));
        }
        cells.extend(
            result
                .record
                .values()
                .iter()
                .map(|value| escape_cell(&value.to_string())),
        );
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    if results.len() > limit {
        md.push_str(&format!("\n_Showing {} of {} records._\n", limit, results.len()));
    }

    md
}
