//! Search Engine Integration
//!
//! Ties together query parsing, pre-filtering, fuzzy matching and ranking
//! behind a single `search` entry point with three modes.

use super::filters::FilterPolicy;
use super::fuzzy::FuzzyMatcher;
use super::parser::QueryParser;
use super::ranking::RelevanceScorer;
use crate::config::SearchConfig;
use crate::records::{Field, RecordRef, RecordStore};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// How a query is interpreted
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Natural-language filters plus additive relevance scoring
    #[default]
    Hybrid,
    /// Case-insensitive substring match on any column
    Exact,
    /// Token-sort similarity on contract identifiers
    Fuzzy,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMode::Hybrid => "hybrid",
            SearchMode::Exact => "exact",
            SearchMode::Fuzzy => "fuzzy",
        };
        f.write_str(name)
    }
}

/// A matched record and its relevance
///
/// `score` is `None` in exact mode, which does not rank.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult<'a> {
    pub record: RecordRef<'a>,
    pub score: Option<f64>,
}

/// Search engine that combines parsing, matching, and ranking
#[derive(Debug, Clone)]
pub struct SearchEngine {
    fuzzy_matcher: FuzzyMatcher,
    scorer: RelevanceScorer,
    policy: FilterPolicy,
    fuzzy_limit: usize,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    /// Create a new search engine with default configuration
    pub fn new() -> Self {
        Self::from_config(&SearchConfig::default())
    }

    /// Create a search engine from loaded configuration
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            fuzzy_matcher: FuzzyMatcher::with_threshold(config.fuzzy_threshold),
            scorer: RelevanceScorer::new(config.weights.clone()),
            policy: config.prefilter,
            fuzzy_limit: config.fuzzy_limit,
        }
    }

    /// Search a store, returning results in presentation order
    ///
    /// Ranked modes sort by descending score; equal scores keep the
    /// original record order. A blank query matches nothing.
    pub fn search<'a>(
        &self,
        query: &str,
        store: &'a RecordStore,
        mode: SearchMode,
    ) -> Vec<SearchResult<'a>> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let results = match mode {
            SearchMode::Hybrid => self.search_hybrid(query, store),
            SearchMode::Exact => self.search_exact(query, store),
            SearchMode::Fuzzy => self.search_fuzzy(query, store),
        };

        debug!(
            "{} search for {:?} returned {} of {} records",
            mode,
            query,
            results.len(),
            store.len()
        );
        results
    }

    fn search_hybrid<'a>(&self, query: &str, store: &'a RecordStore) -> Vec<SearchResult<'a>> {
        let filters = QueryParser::parse(query, store);
        if !filters.is_empty() {
            debug!("Detected filters: {}", filters);
        }

        let scorer = self.scorer.prepare(store, query, &filters);
        let mut results: Vec<SearchResult<'a>> = store
            .iter()
            .filter(|record| filters.admits(record, store, &self.policy))
            .filter_map(|record| {
                let score = scorer.score(&record);
                (score > 0.0).then_some(SearchResult {
                    record,
                    score: Some(score),
                })
            })
            .collect();

        sort_by_score(&mut results);
        results
    }

    fn search_exact<'a>(&self, query: &str, store: &'a RecordStore) -> Vec<SearchResult<'a>> {
        let needle = query.to_lowercase();

        store
            .iter()
            .filter(|record| {
                record
                    .values()
                    .iter()
                    .any(|value| value.as_text().to_lowercase().contains(&needle))
            })
            .map(|record| SearchResult {
                record,
                score: None,
            })
            .collect()
    }

    fn search_fuzzy<'a>(&self, query: &str, store: &'a RecordStore) -> Vec<SearchResult<'a>> {
        if !store.has_field(Field::Contract) {
            debug!("Fuzzy search skipped: no {} column", Field::Contract.column_name());
            return Vec::new();
        }

        let matches = self
            .fuzzy_matcher
            .extract(query, store.contracts(), self.fuzzy_limit);
        let scores: HashMap<&str, f64> = matches
            .iter()
            .map(|m| (m.candidate.as_str(), f64::from(m.score)))
            .collect();

        let mut results: Vec<SearchResult<'a>> = store
            .iter()
            .filter_map(|record| {
                let contract = record.text(Field::Contract)?;
                let score = *scores.get(&*contract)?;
                Some(SearchResult {
                    record,
                    score: Some(score),
                })
            })
            .collect();

        sort_by_score(&mut results);
        results
    }
}

/// Stable sort, highest score first
fn sort_by_score(results: &mut [SearchResult<'_>]) {
    results.sort_by(|a, b| {
        let a = a.score.unwrap_or(0.0);
        let b = b.score.unwrap_or(0.0);
        b.total_cmp(&a)
    });
}
