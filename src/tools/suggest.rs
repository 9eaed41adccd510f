//! Suggest tool implementation

use crate::cli::SuggestArgs;
use crate::config::SearchConfig;
use crate::error::{check_query_length, AppError};
use crate::records::RecordStore;
use crate::search::{Suggestion, SuggestionGenerator};

/// Autocomplete a partial query and render the suggestions as markdown
pub fn execute_suggest(
    store: &RecordStore,
    config: &SearchConfig,
    args: &SuggestArgs,
) -> Result<String, AppError> {
    check_query_length(&args.query)?;

    let generator = SuggestionGenerator::with_min_chars(config.min_suggestion_chars);
    let limit = args.limit.unwrap_or(config.suggestion_limit);
    let suggestions = generator.suggest(&args.query, store, limit);
    Ok(format_suggestions(&suggestions, &args.query))
}

pub fn format_suggestions(suggestions: &[Suggestion], partial: &str) -> String {
    if suggestions.is_empty() {
        return format!("No suggestions for `{}`.\n", partial.trim());
    }

    let mut md = format!("# Suggestions · {}\n\n", suggestions.len());
    for suggestion in suggestions {
        md.push_str(&format!(
            "- **{}**: {} ({})\n",
            suggestion.kind, suggestion.value, suggestion.score
        ));
    }
    md
}
