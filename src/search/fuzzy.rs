//! Fuzzy Matching Engine
//!
//! Ranks candidate strings against a query with token-sort similarity, so
//! "173 NVM 001" and "001-NVM-173" compare as the same contract.

use super::similarity::{token_sort_ratio, Similarity};

/// Matches at or below this similarity are discarded
pub const DEFAULT_THRESHOLD: Similarity = 50;

/// A candidate with its similarity to the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub candidate: String,
    pub score: Similarity,
}

/// Fuzzy matcher with a minimum-relevance floor
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    threshold: Similarity,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyMatcher {
    /// Create a matcher with the default threshold
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Create a matcher with a custom threshold
    pub fn with_threshold(threshold: Similarity) -> Self {
        Self { threshold }
    }

    /// Return at most `limit` candidates scoring above the threshold
    ///
    /// Results are ordered by descending score; equal scores keep candidate
    /// order. The threshold is applied before the limit.
    pub fn extract<S: AsRef<str>>(
        &self,
        query: &str,
        candidates: &[S],
        limit: usize,
    ) -> Vec<FuzzyMatch> {
        if query.trim().is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<FuzzyMatch> = candidates
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|candidate| !candidate.trim().is_empty())
            .filter_map(|candidate| {
                let score = token_sort_ratio(query, candidate);
                (score > self.threshold).then(|| FuzzyMatch {
                    candidate: candidate.to_string(),
                    score,
                })
            })
            .collect();

        // sort_by is stable, so ties keep candidate order
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches.truncate(limit);
        matches
    }
}
