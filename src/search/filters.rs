//! Filter predicates and pre-filter policy
//!
//! The same predicates drive both hard pre-filtering in hybrid search and
//! the matching scoring signals, so the two can never disagree.

use super::parser::{FilterSet, Status};
use crate::records::{Field, RecordRef, RecordStore};
use chrono::Datelike;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which detected filters act as hard pre-filters in hybrid search
///
/// Every key is a pre-filter by default; a disabled key still contributes
/// its scoring signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilterPolicy {
    pub status: bool,
    pub agency: bool,
    pub month: bool,
    pub phase: bool,
    pub contract_type: bool,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            status: true,
            agency: true,
            month: true,
            phase: true,
            contract_type: true,
        }
    }
}

impl FilterSet {
    /// Status filter set and the record's outcome agrees with it
    pub fn status_matches(&self, record: &RecordRef<'_>) -> bool {
        matches!(
            (self.statut, record.is_success()),
            (Some(Status::Ko), Some(false)) | (Some(Status::Ok), Some(true))
        )
    }

    /// Agency filter set and equal to the record's agency code
    pub fn agency_matches(&self, record: &RecordRef<'_>) -> bool {
        match (&self.agence, record.text(Field::Agency)) {
            (Some(wanted), Some(agency)) => agency == wanted.as_str(),
            _ => false,
        }
    }

    /// Month filter set and the record's integration date falls in it
    pub fn month_matches(&self, record: &RecordRef<'_>) -> bool {
        match (self.mois, record.integration_date()) {
            (Some(month), Some(date)) => date.month() == month,
            _ => false,
        }
    }

    /// Phase filter set and named (case-insensitively) in the record
    pub fn phase_matches(&self, record: &RecordRef<'_>) -> bool {
        match (self.init_avenant, record.text(Field::Phase)) {
            (Some(phase), Some(value)) => value
                .to_lowercase()
                .contains(&phase.as_str().to_lowercase()),
            _ => false,
        }
    }

    /// Type filter set and equal to the record's type label
    pub fn contract_type_matches(&self, record: &RecordRef<'_>) -> bool {
        match (&self.contract_type, record.text(Field::ContractType)) {
            (Some(wanted), Some(label)) => label == wanted.as_str(),
            _ => false,
        }
    }

    /// Hard pre-filter: every set and enabled key whose field exists must match
    pub fn admits(&self, record: &RecordRef<'_>, store: &RecordStore, policy: &FilterPolicy) -> bool {
        let checks: [(bool, bool, Field, fn(&Self, &RecordRef<'_>) -> bool); 5] = [
            (self.statut.is_some(), policy.status, Field::Status, Self::status_matches),
            (self.agence.is_some(), policy.agency, Field::Agency, Self::agency_matches),
            (self.mois.is_some(), policy.month, Field::IntegrationDate, Self::month_matches),
            (self.init_avenant.is_some(), policy.phase, Field::Phase, Self::phase_matches),
            (
                self.contract_type.is_some(),
                policy.contract_type,
                Field::ContractType,
                Self::contract_type_matches,
            ),
        ];

        checks
            .iter()
            .filter(|(set, enabled, field, _)| *set && *enabled && store.has_field(*field))
            .all(|(_, _, _, matches)| matches(self, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::parser::Phase;

    fn store() -> RecordStore {
        RecordStore::from_pairs(vec![
            vec![
                ("Contrat", "001-NVM-173"),
                ("Code_Unite", "NVM"),
                ("Statut_Final", "KO"),
                ("Date_Integration", "2024-09-15"),
                ("Initial/Avenant", "Initial"),
            ],
            vec![
                ("Contrat", "002-NVM-174"),
                ("Code_Unite", "NVM"),
                ("Statut_Final", "OK"),
                ("Date_Integration", "invalide"),
                ("Initial/Avenant", "AVENANT 1"),
            ],
        ])
    }

    #[test]
    fn test_status_predicate() {
        let s = store();
        let ko = FilterSet {
            statut: Some(Status::Ko),
            ..Default::default()
        };
        assert!(ko.status_matches(&s.record(0).unwrap()));
        assert!(!ko.status_matches(&s.record(1).unwrap()));
        assert!(!FilterSet::default().status_matches(&s.record(0).unwrap()));
    }

    #[test]
    fn test_month_excludes_unparseable_dates() {
        let s = store();
        let filters = FilterSet {
            mois: Some(9),
            ..Default::default()
        };
        let policy = FilterPolicy::default();
        assert!(filters.admits(&s.record(0).unwrap(), &s, &policy));
        assert!(!filters.admits(&s.record(1).unwrap(), &s, &policy));
    }

    #[test]
    fn test_phase_case_insensitive() {
        let s = store();
        let filters = FilterSet {
            init_avenant: Some(Phase::Avenant),
            ..Default::default()
        };
        assert!(filters.phase_matches(&s.record(1).unwrap()));
        assert!(!filters.phase_matches(&s.record(0).unwrap()));
    }

    #[test]
    fn test_disabled_key_is_not_a_prefilter() {
        let s = store();
        let filters = FilterSet {
            init_avenant: Some(Phase::Avenant),
            ..Default::default()
        };
        let policy = FilterPolicy {
            phase: false,
            ..Default::default()
        };
        assert!(filters.admits(&s.record(0).unwrap(), &s, &policy));
    }

    #[test]
    fn test_absent_field_is_skipped() {
        let s = RecordStore::from_pairs(vec![vec![("Contrat", "X-1")]]);
        let filters = FilterSet {
            statut: Some(Status::Ok),
            contract_type: Some("Prêt".to_string()),
            ..Default::default()
        };
        assert!(filters.admits(&s.record(0).unwrap(), &s, &FilterPolicy::default()));
    }

    #[test]
    fn test_empty_filters_admit_everything() {
        let s = store();
        let filters = FilterSet::default();
        assert!(s
            .iter()
            .all(|r| filters.admits(&r, &s, &FilterPolicy::default())));
    }
}
