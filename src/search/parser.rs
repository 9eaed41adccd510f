//! Query Parser
//!
//! Extracts structured filter hints from a free-text query. Detection runs
//! against the lower-cased query; for each dimension the first vocabulary
//! entry found wins.

use crate::records::{Field, RecordStore};
use serde::Serialize;
use std::fmt;

/// Tokens meaning a failed outcome; checked before the success tokens
const FAILURE_TOKENS: &[&str] = &["ko", "échec", "echec", "erreur", "rejet", "échoué", "echoue"];

/// Tokens meaning a successful outcome
const SUCCESS_TOKENS: &[&str] = &["ok", "réussi", "reussi", "succès", "succes", "validé"];

const INITIAL_TOKENS: &[&str] = &["initial", "initiaux"];
const AMENDMENT_TOKENS: &[&str] = &["avenant", "avenants"];

/// Entry of the month vocabulary
#[derive(Debug, Clone, Copy)]
pub struct MonthToken {
    pub name: &'static str,
    pub month: u32,
    /// Abbreviations only count as a whole word of the query
    pub abbreviation: bool,
}

const fn full(name: &'static str, month: u32) -> MonthToken {
    MonthToken {
        name,
        month,
        abbreviation: false,
    }
}

const fn abbr(name: &'static str, month: u32) -> MonthToken {
    MonthToken {
        name,
        month,
        abbreviation: true,
    }
}

/// Month names and abbreviations, in detection order
pub const MONTHS: &[MonthToken] = &[
    full("janvier", 1),
    abbr("jan", 1),
    full("février", 2),
    full("fevrier", 2),
    abbr("fev", 2),
    full("mars", 3),
    full("avril", 4),
    full("mai", 5),
    full("juin", 6),
    full("juillet", 7),
    full("août", 8),
    full("aout", 8),
    full("septembre", 9),
    abbr("sept", 9),
    full("octobre", 10),
    full("novembre", 11),
    full("décembre", 12),
    full("decembre", 12),
    abbr("dec", 12),
];

impl MonthToken {
    fn found_in(&self, query: &str) -> bool {
        if self.abbreviation {
            words(query).any(|word| word == self.name)
        } else {
            query.contains(self.name)
        }
    }
}

/// Outcome filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "KO")]
    Ko,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Ko => "KO",
        }
    }
}

/// Initial contract versus amendment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Initial,
    Avenant,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Initial => "Initial",
            Phase::Avenant => "Avenant",
        }
    }
}

/// Structured constraints extracted from a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSet {
    pub statut: Option<Status>,
    pub agence: Option<String>,
    pub mois: Option<u32>,
    pub init_avenant: Option<Phase>,
    #[serde(rename = "type")]
    pub contract_type: Option<String>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        self.statut.is_none()
            && self.agence.is_none()
            && self.mois.is_none()
            && self.init_avenant.is_none()
            && self.contract_type.is_none()
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(statut) = self.statut {
            parts.push(format!("statut:{}", statut.as_str()));
        }
        if let Some(agence) = &self.agence {
            parts.push(format!("agence:{}", agence));
        }
        if let Some(mois) = self.mois {
            parts.push(format!("mois:{}", mois));
        }
        if let Some(phase) = self.init_avenant {
            parts.push(format!("init_avenant:{}", phase.as_str()));
        }
        if let Some(contract_type) = &self.contract_type {
            parts.push(format!("type:{}", contract_type));
        }
        f.write_str(&parts.join(", "))
    }
}

/// Natural-language query parser
pub struct QueryParser;

impl QueryParser {
    /// Parse a query against the vocabulary of a record store
    pub fn parse(query: &str, store: &RecordStore) -> FilterSet {
        let query = query.to_lowercase();

        FilterSet {
            statut: Self::detect_status(&query),
            agence: Self::detect_value(&query, store, Field::Agency, store.agencies()),
            mois: Self::detect_month(&query),
            init_avenant: Self::detect_phase(&query),
            contract_type: Self::detect_value(
                &query,
                store,
                Field::ContractType,
                store.contract_types(),
            ),
        }
    }

    /// Status tokens must start a word, so `invalidé` is not `validé`
    fn detect_status(query: &str) -> Option<Status> {
        if starts_any_word(query, FAILURE_TOKENS) {
            Some(Status::Ko)
        } else if starts_any_word(query, SUCCESS_TOKENS) {
            Some(Status::Ok)
        } else {
            None
        }
    }

    fn detect_month(query: &str) -> Option<u32> {
        MONTHS
            .iter()
            .find(|token| token.found_in(query))
            .map(|token| token.month)
    }

    fn detect_phase(query: &str) -> Option<Phase> {
        if contains_any(query, INITIAL_TOKENS) {
            Some(Phase::Initial)
        } else if contains_any(query, AMENDMENT_TOKENS) {
            Some(Phase::Avenant)
        } else {
            None
        }
    }

    /// First distinct store value whose lower-cased form occurs in the query
    fn detect_value(
        query: &str,
        store: &RecordStore,
        field: Field,
        candidates: &[String],
    ) -> Option<String> {
        if !store.has_field(field) {
            return None;
        }
        candidates
            .iter()
            .find(|value| query.contains(&value.to_lowercase()))
            .cloned()
    }
}

fn contains_any(query: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| query.contains(token))
}

fn starts_any_word(query: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| {
        query.match_indices(token).any(|(at, _)| {
            query[..at]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric())
        })
    })
}

fn words(query: &str) -> impl Iterator<Item = &str> {
    query.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}
