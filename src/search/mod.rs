//! Hybrid search over contract records
//!
//! Natural-language filter detection, fuzzy matching, additive relevance
//! scoring and autocomplete suggestions.

pub mod engine;
pub mod filters;
pub mod fuzzy;
pub mod parser;
pub mod ranking;
pub mod similarity;
pub mod suggest;


pub use engine::{SearchEngine, SearchMode, SearchResult};
pub use filters::FilterPolicy;
pub use fuzzy::{FuzzyMatch, FuzzyMatcher};
pub use parser::{FilterSet, Phase, QueryParser, Status};
pub use ranking::{RelevanceScorer, ScoringWeights};
pub use suggest::{Suggestion, SuggestionGenerator, SuggestionKind};
