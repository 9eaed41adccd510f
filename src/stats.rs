//! Aggregates over a record store: dataset overview, success-rate metrics
//! per agency, failure-status breakdown, contract types and daily volume

use crate::records::{Field, RecordStore};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Agencies below this success rate are at risk
pub const AT_RISK_RATE: f64 = 60.0;
const EXCELLENT_RATE: f64 = 80.0;

/// Performance band of an agency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Band {
    Excellent,
    Moyen,
    Critique,
}

impl Band {
    pub fn for_rate(rate: f64) -> Self {
        if rate >= EXCELLENT_RATE {
            Band::Excellent
        } else if rate >= AT_RISK_RATE {
            Band::Moyen
        } else {
            Band::Critique
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Band::Excellent => "🟢 Excellent",
            Band::Moyen => "🟡 Moyen",
            Band::Critique => "🔴 Critique",
        };
        f.write_str(label)
    }
}

/// Metrics of one agency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyStats {
    pub agency: String,
    pub total: usize,
    pub ok: usize,
    pub ko: usize,
    /// Percentage of OK records, one decimal
    pub rate: f64,
    /// 1 is best; equal rates share the lowest rank
    pub rank: usize,
    /// Rate minus the mean rate, one decimal
    pub deviation: f64,
    pub band: Band,
}

/// Agency dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyReport {
    /// Ordered by rank, ties in first-seen order
    pub agencies: Vec<AgencyStats>,
    pub best: String,
    pub worst: String,
    pub mean_rate: f64,
    pub at_risk: usize,
}

impl AgencyReport {
    /// Agencies whose rate is below the at-risk threshold
    pub fn at_risk_agencies(&self) -> impl Iterator<Item = &AgencyStats> + '_ {
        self.agencies.iter().filter(|a| a.rate < AT_RISK_RATE)
    }
}

/// Compute the agency report
///
/// Returns `None` when the agency or status column is missing or no record
/// names an agency. A blank status counts as a failure.
pub fn agency_report(store: &RecordStore) -> Option<AgencyReport> {
    if !store.has_field(Field::Agency) || !store.has_field(Field::Status) {
        return None;
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize, usize)> = Vec::new();
    for record in store.iter() {
        let Some(agency) = record.text(Field::Agency) else {
            continue;
        };
        if agency.trim().is_empty() {
            continue;
        }
        let slot = *index.entry(agency.to_string()).or_insert_with(|| {
            counts.push((agency.to_string(), 0, 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
        if record.is_success() == Some(true) {
            counts[slot].2 += 1;
        }
    }

    if counts.is_empty() {
        return None;
    }

    let rates: Vec<f64> = counts
        .iter()
        .map(|(_, total, ok)| round1(*ok as f64 / *total as f64 * 100.0))
        .collect();
    let mean_rate = rates.iter().sum::<f64>() / rates.len() as f64;

    let mut agencies: Vec<AgencyStats> = counts
        .into_iter()
        .zip(rates.iter())
        .map(|((agency, total, ok), &rate)| AgencyStats {
            agency,
            total,
            ok,
            ko: total - ok,
            rate,
            rank: 1 + rates.iter().filter(|&&other| other > rate).count(),
            deviation: round1(rate - mean_rate),
            band: Band::for_rate(rate),
        })
        .collect();

    // first occurrence wins on ties
    let best = agencies
        .iter()
        .fold(&agencies[0], |best, a| if a.rate > best.rate { a } else { best })
        .agency
        .clone();
    let worst = agencies
        .iter()
        .fold(&agencies[0], |worst, a| if a.rate < worst.rate { a } else { worst })
        .agency
        .clone();
    let at_risk = agencies.iter().filter(|a| a.rate < AT_RISK_RATE).count();

    agencies.sort_by_key(|a| a.rank);

    Some(AgencyReport {
        agencies,
        best,
        worst,
        mean_rate: round1(mean_rate),
        at_risk,
    })
}

/// Count of one failure status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
    /// Share of all failures, one decimal
    pub share: f64,
}

/// Outcome totals and failure detail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBreakdown {
    pub total: usize,
    pub ok: usize,
    pub ko: usize,
    /// Most frequent first; blank statuses count as failures but are not listed
    pub failures: Vec<StatusCount>,
}

/// Break down record outcomes; `None` without a status column
pub fn status_breakdown(store: &RecordStore) -> Option<StatusBreakdown> {
    if !store.has_field(Field::Status) {
        return None;
    }

    let mut ok = 0;
    let mut failures: Vec<StatusCount> = Vec::new();
    for record in store.iter() {
        if record.is_success() == Some(true) {
            ok += 1;
            continue;
        }
        let Some(status) = record.text(Field::Status) else {
            continue;
        };
        if status.trim().is_empty() {
            continue;
        }
        match failures.iter_mut().find(|f| f.status == *status) {
            Some(entry) => entry.count += 1,
            None => failures.push(StatusCount {
                status: status.into_owned(),
                count: 1,
                share: 0.0,
            }),
        }
    }

    let total = store.len();
    let ko = total - ok;
    for entry in &mut failures {
        entry.share = round1(entry.count as f64 / ko as f64 * 100.0);
    }
    failures.sort_by(|a, b| b.count.cmp(&a.count));

    Some(StatusBreakdown {
        total,
        ok,
        ko,
        failures,
    })
}

/// Shape of the loaded data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub rows: usize,
    pub columns: usize,
    /// Rows identical to an earlier row
    pub duplicates: usize,
    /// `None` without a status column
    pub ok: Option<usize>,
}

pub fn overview(store: &RecordStore) -> Overview {
    let mut seen = HashSet::new();
    let mut duplicates = 0;
    for record in store.iter() {
        // Debug form keeps Text("1") and Number(1.0) apart
        if !seen.insert(format!("{:?}", record.values())) {
            duplicates += 1;
        }
    }

    let ok = store
        .has_field(Field::Status)
        .then(|| store.iter().filter(|r| r.is_success() == Some(true)).count());

    Overview {
        rows: store.len(),
        columns: store.schema().columns().len(),
        duplicates,
        ok,
    }
}

/// Number of records of one contract type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeCount {
    pub label: String,
    pub count: usize,
}

/// Records per contract type, most frequent first
///
/// Blank labels are not counted. `None` without a type column.
pub fn type_counts(store: &RecordStore) -> Option<Vec<TypeCount>> {
    if !store.has_field(Field::ContractType) {
        return None;
    }

    let mut counts: Vec<TypeCount> = store
        .contract_types()
        .iter()
        .map(|label| TypeCount {
            label: label.clone(),
            count: 0,
        })
        .collect();
    let index: HashMap<&str, usize> = store
        .contract_types()
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();

    for record in store.iter() {
        let Some(label) = record.get(Field::ContractType) else {
            continue;
        };
        if let Some(&slot) = index.get(label.to_string().as_str()) {
            counts[slot].count += 1;
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Some(counts)
}

/// Records integrated on one day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Records per integration day, oldest first
///
/// Dates that do not parse are left out. `None` without a date column.
pub fn daily_volume(store: &RecordStore) -> Option<Vec<DailyCount>> {
    if !store.has_field(Field::IntegrationDate) {
        return None;
    }

    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in store.iter().filter_map(|r| r.integration_date()) {
        *days.entry(date).or_default() += 1;
    }

    Some(
        days.into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect(),
    )
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(pairs: &[(&str, &str)]) -> RecordStore {
        RecordStore::from_pairs(pairs.iter().map(|&(agency, status)| {
            vec![("Code_Unite", agency), ("Statut_Final", status)]
        }))
    }

    #[test]
    fn test_rates_and_bands() {
        let store = rows(&[
            ("NVM", "OK"),
            ("NVM", "KO"),
            ("NVM", "ok"),
            ("ABC", "OK"),
            ("LYO", "Rejet"),
        ]);
        let report = agency_report(&store).unwrap();

        let abc = &report.agencies[0];
        assert_eq!(abc.agency, "ABC");
        assert_eq!(abc.rate, 100.0);
        assert_eq!(abc.rank, 1);
        assert_eq!(abc.band, Band::Excellent);

        let nvm = &report.agencies[1];
        assert_eq!((nvm.total, nvm.ok, nvm.ko), (3, 2, 1));
        assert_eq!(nvm.rate, 66.7);
        assert_eq!(nvm.band, Band::Moyen);

        let lyo = &report.agencies[2];
        assert_eq!(lyo.rate, 0.0);
        assert_eq!(lyo.band, Band::Critique);

        assert_eq!(report.best, "ABC");
        assert_eq!(report.worst, "LYO");
        assert_eq!(report.mean_rate, 55.6);
        assert_eq!(report.at_risk, 1);
        assert_eq!(lyo.deviation, -55.6);
    }

    #[test]
    fn test_ties_share_min_rank() {
        let store = rows(&[("A", "OK"), ("B", "OK"), ("C", "KO")]);
        let report = agency_report(&store).unwrap();
        let ranks: Vec<(&str, usize)> = report
            .agencies
            .iter()
            .map(|a| (a.agency.as_str(), a.rank))
            .collect();
        assert_eq!(ranks, vec![("A", 1), ("B", 1), ("C", 3)]);
        assert_eq!(report.best, "A");
    }

    #[test]
    fn test_missing_columns() {
        let store = RecordStore::from_pairs(vec![vec![("Code_Unite", "NVM")]]);
        assert!(agency_report(&store).is_none());
        assert!(status_breakdown(&store).is_none());
    }

    #[test]
    fn test_blank_status_is_failure() {
        let store = rows(&[("NVM", ""), ("NVM", "OK")]);
        let report = agency_report(&store).unwrap();
        assert_eq!(report.agencies[0].ko, 1);
        assert_eq!(report.agencies[0].rate, 50.0);
    }

    #[test]
    fn test_status_breakdown() {
        let store = rows(&[
            ("A", "OK"),
            ("A", "Rejet"),
            ("B", "KO"),
            ("B", "Rejet"),
            ("C", ""),
        ]);
        let breakdown = status_breakdown(&store).unwrap();
        assert_eq!((breakdown.total, breakdown.ok, breakdown.ko), (5, 1, 4));
        assert_eq!(breakdown.failures[0].status, "Rejet");
        assert_eq!(breakdown.failures[0].count, 2);
        assert_eq!(breakdown.failures[0].share, 50.0);
        assert_eq!(breakdown.failures[1].status, "KO");
        assert_eq!(breakdown.failures[1].share, 25.0);
        assert_eq!(breakdown.failures.len(), 2);
    }

    #[test]
    fn test_overview() {
        let store = RecordStore::from_pairs(vec![
            vec![("Contrat", "001"), ("Statut_Final", "OK")],
            vec![("Contrat", "002"), ("Statut_Final", "KO")],
            vec![("Contrat", "001"), ("Statut_Final", "OK")],
            vec![("Contrat", "001"), ("Statut_Final", "ok")],
        ]);
        let overview = overview(&store);
        assert_eq!(overview.rows, 4);
        assert_eq!(overview.columns, 2);
        assert_eq!(overview.duplicates, 1);
        assert_eq!(overview.ok, Some(3));
    }

    #[test]
    fn test_overview_without_status() {
        let store = RecordStore::from_pairs(vec![vec![("Contrat", "1")], vec![("Contrat", "1")]]);
        let overview = overview(&store);
        assert_eq!(overview.duplicates, 1);
        assert_eq!(overview.ok, None);
    }

    #[test]
    fn test_type_counts() {
        let store = RecordStore::from_pairs(vec![
            vec![("Type (libellé)", "Crédit conso")],
            vec![("Type (libellé)", "Prêt immo")],
            vec![("Type (libellé)", "")],
            vec![("Type (libellé)", "Prêt immo")],
        ]);
        let counts = type_counts(&store).unwrap();
        assert_eq!(
            counts,
            vec![
                TypeCount {
                    label: "Prêt immo".to_string(),
                    count: 2
                },
                TypeCount {
                    label: "Crédit conso".to_string(),
                    count: 1
                },
            ]
        );
        assert!(type_counts(&rows(&[("A", "OK")])).is_none());
    }

    #[test]
    fn test_daily_volume_skips_unparseable_dates() {
        let store = RecordStore::from_pairs(vec![
            vec![("Date_Integration", "2024-09-16 08:00:00")],
            vec![("Date_Integration", "15/09/2024")],
            vec![("Date_Integration", "n/a")],
            vec![("Date_Integration", "2024-09-16")],
            vec![("Date_Integration", "")],
        ]);
        let volume = daily_volume(&store).unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2024, 9, d).unwrap();
        assert_eq!(
            volume,
            vec![
                DailyCount {
                    date: day(15),
                    count: 1
                },
                DailyCount {
                    date: day(16),
                    count: 2
                },
            ]
        );
        assert!(daily_volume(&rows(&[("A", "OK")])).is_none());
    }
}
