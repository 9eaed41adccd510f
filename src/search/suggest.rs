//! Autocomplete suggestions for partial queries

use super::parser::MONTHS;
use super::similarity::{partial_ratio, Similarity};
use crate::records::{Field, RecordStore};
use serde::Serialize;
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

/// Fewest characters worth suggesting for
pub const MIN_INPUT_CHARS: usize = 2;

const STATUS_SCORE: Similarity = 100;
const AGENCY_SCORE: Similarity = 100;
const MONTH_SCORE: Similarity = 90;

/// Full month names, indexed by month number - 1
const MONTH_NAMES: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];

/// What a suggestion would search for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SuggestionKind {
    Contrat,
    Agence,
    Statut,
    Mois,
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SuggestionKind::Contrat => "Contrat",
            SuggestionKind::Agence => "Agence",
            SuggestionKind::Statut => "Statut",
            SuggestionKind::Mois => "Mois",
        };
        f.write_str(label)
    }
}

/// One autocomplete candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub value: String,
    pub score: Similarity,
}

impl Suggestion {
    fn new(kind: SuggestionKind, value: impl Into<String>, score: Similarity) -> Self {
        Self {
            kind,
            value: value.into(),
            score,
        }
    }
}

/// Suggestion generator
#[derive(Debug, Clone)]
pub struct SuggestionGenerator {
    min_chars: usize,
}

impl Default for SuggestionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionGenerator {
    pub fn new() -> Self {
        Self {
            min_chars: MIN_INPUT_CHARS,
        }
    }

    pub fn with_min_chars(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Suggest up to `limit` completions for `partial`, best first
    pub fn suggest(&self, partial: &str, store: &RecordStore, limit: usize) -> Vec<Suggestion> {
        let partial = partial.trim();
        if partial.graphemes(true).count() < self.min_chars {
            return Vec::new();
        }
        let needle = partial.to_lowercase();

        let mut suggestions = Vec::new();
        suggestions.extend(contract_suggestions(&needle, store, limit));
        suggestions.extend(agency_suggestions(&needle, store));
        suggestions.extend(status_suggestions(&needle));
        suggestions.extend(month_suggestions(&needle));

        suggestions.sort_by(|a, b| b.score.cmp(&a.score));
        suggestions.truncate(limit);
        suggestions
    }
}

fn contract_suggestions(needle: &str, store: &RecordStore, limit: usize) -> Vec<Suggestion> {
    if !store.has_field(Field::Contract) {
        return Vec::new();
    }
    store
        .contracts()
        .iter()
        .filter_map(|contract| {
            let lower = contract.to_lowercase();
            lower.contains(needle).then(|| {
                let score = partial_ratio(needle, &lower);
                Suggestion::new(SuggestionKind::Contrat, contract.as_str(), score)
            })
        })
        .take(limit)
        .collect()
}

fn agency_suggestions(needle: &str, store: &RecordStore) -> Vec<Suggestion> {
    store
        .agencies()
        .iter()
        .filter(|agency| agency.to_lowercase().contains(needle))
        .map(|agency| Suggestion::new(SuggestionKind::Agence, agency.as_str(), AGENCY_SCORE))
        .collect()
}

fn status_suggestions(needle: &str) -> Vec<Suggestion> {
    let mut out = Vec::new();
    if needle.contains("ko") {
        out.push(Suggestion::new(SuggestionKind::Statut, "KO", STATUS_SCORE));
    }
    if needle.contains("ok") {
        out.push(Suggestion::new(SuggestionKind::Statut, "OK", STATUS_SCORE));
    }
    out
}

/// One entry per month whose name or abbreviation prefixes, or is prefixed
/// by, the input
fn month_suggestions(needle: &str) -> Vec<Suggestion> {
    let mut seen = [false; 12];
    let mut out = Vec::new();

    for token in MONTHS {
        let slot = (token.month - 1) as usize;
        if seen[slot] {
            continue;
        }
        if token.name.starts_with(needle) || needle.starts_with(token.name) {
            seen[slot] = true;
            out.push(Suggestion::new(SuggestionKind::Mois, MONTH_NAMES[slot], MONTH_SCORE));
        }
    }
    out
}
