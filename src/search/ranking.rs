//! Ranking & Scoring System
//!
//! Relevance is a sum of independent signals. Each signal is declared in
//! [`SIGNALS`] together with the field it reads; signals whose field is not
//! part of the store's schema are dropped once per query, not per record.

use super::parser::FilterSet;
use super::similarity::partial_ratio;
use crate::records::{Field, RecordRef, RecordStore};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Points awarded by each scoring signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoringWeights {
    /// Query found verbatim inside the contract identifier
    pub contract_exact: f64,
    /// Multiplier applied to the partial similarity (0-100) otherwise
    pub contract_partial: f64,
    /// Agency matches the detected agency
    pub agency: f64,
    /// Outcome matches the detected status
    pub status: f64,
    /// Contract type matches the detected type
    pub contract_type: f64,
    /// Initial/amendment matches the detected phase
    pub phase: f64,
    /// Integration month matches the detected month
    pub month: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            contract_exact: 100.0,
            contract_partial: 0.5,
            agency: 50.0,
            status: 50.0,
            contract_type: 40.0,
            phase: 30.0,
            month: 40.0,
        }
    }
}

/// Per-query inputs shared by every signal
pub struct ScoringContext<'q> {
    /// Lower-cased query text
    pub query: String,
    pub filters: &'q FilterSet,
    pub weights: &'q ScoringWeights,
}

/// A scoring signal and the field it depends on
pub struct Signal {
    pub name: &'static str,
    pub field: Field,
    pub score: fn(&RecordRef<'_>, &ScoringContext<'_>) -> f64,
}

/// All relevance signals
pub static SIGNALS: &[Signal] = &[
    Signal {
        name: "contract",
        field: Field::Contract,
        score: contract_signal,
    },
    Signal {
        name: "agency",
        field: Field::Agency,
        score: agency_signal,
    },
    Signal {
        name: "status",
        field: Field::Status,
        score: status_signal,
    },
    Signal {
        name: "type",
        field: Field::ContractType,
        score: contract_type_signal,
    },
    Signal {
        name: "phase",
        field: Field::Phase,
        score: phase_signal,
    },
    Signal {
        name: "month",
        field: Field::IntegrationDate,
        score: month_signal,
    },
];

fn contract_signal(record: &RecordRef<'_>, ctx: &ScoringContext<'_>) -> f64 {
    let Some(contract) = record.text(Field::Contract) else {
        return 0.0;
    };
    let contract = contract.to_lowercase();

    if contract.contains(&ctx.query) {
        ctx.weights.contract_exact
    } else {
        ctx.weights.contract_partial * f64::from(partial_ratio(&ctx.query, &contract))
    }
}

fn agency_signal(record: &RecordRef<'_>, ctx: &ScoringContext<'_>) -> f64 {
    award(ctx.filters.agency_matches(record), ctx.weights.agency)
}

fn status_signal(record: &RecordRef<'_>, ctx: &ScoringContext<'_>) -> f64 {
    award(ctx.filters.status_matches(record), ctx.weights.status)
}

fn contract_type_signal(record: &RecordRef<'_>, ctx: &ScoringContext<'_>) -> f64 {
    award(ctx.filters.contract_type_matches(record), ctx.weights.contract_type)
}

fn phase_signal(record: &RecordRef<'_>, ctx: &ScoringContext<'_>) -> f64 {
    award(ctx.filters.phase_matches(record), ctx.weights.phase)
}

fn month_signal(record: &RecordRef<'_>, ctx: &ScoringContext<'_>) -> f64 {
    award(ctx.filters.month_matches(record), ctx.weights.month)
}

fn award(matched: bool, points: f64) -> f64 {
    if matched {
        points
    } else {
        0.0
    }
}

/// Additive relevance scorer
#[derive(Debug, Clone, Default)]
pub struct RelevanceScorer {
    weights: ScoringWeights,
}

impl RelevanceScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Resolve the applicable signals for one query against one store
    pub fn prepare<'q>(
        &'q self,
        store: &RecordStore,
        query: &str,
        filters: &'q FilterSet,
    ) -> PreparedScorer<'q> {
        let signals = SIGNALS
            .iter()
            .filter(|signal| store.has_field(signal.field))
            .collect();

        PreparedScorer {
            context: ScoringContext {
                query: query.to_lowercase(),
                filters,
                weights: &self.weights,
            },
            signals,
        }
    }

    /// Score a single record
    pub fn score(&self, record: &RecordRef<'_>, query: &str, filters: &FilterSet) -> f64 {
        self.prepare(record.store(), query, filters).score(record)
    }
}

/// Scorer bound to one query and one store schema
pub struct PreparedScorer<'q> {
    context: ScoringContext<'q>,
    signals: Vec<&'static Signal>,
}

impl PreparedScorer<'_> {
    /// Sum of all applicable signals, never negative
    pub fn score(&self, record: &RecordRef<'_>) -> f64 {
        let total: f64 = self
            .signals
            .iter()
            .map(|signal| (signal.score)(record, &self.context))
            .sum();
        total.max(0.0)
    }

    /// Names of the signals that apply to this store
    pub fn signal_names(&self) -> Vec<&'static str> {
        self.signals.iter().map(|signal| signal.name).collect()
    }
}
