//! Agency dashboard tool
//!
//! Renders the per-agency success report followed by the failure-status
//! breakdown.

use super::util::{escape_cell, percent};
use crate::cli::{AgenciesArgs, AgencySort};
use crate::error::AppError;
use crate::records::{Field, RecordStore};
use crate::stats::{agency_report, status_breakdown, AgencyStats, AT_RISK_RATE};
use tracing::debug;

pub fn execute_agencies(store: &RecordStore, args: &AgenciesArgs) -> Result<String, AppError> {
    if !(0.0..=100.0).contains(&args.min_rate) {
        return Err(AppError::InvalidInput(format!(
            "min-rate must be between 0 and 100, got {}",
            args.min_rate
        )));
    }

    let report = agency_report(store).ok_or_else(|| {
        AppError::NotFound(format!(
            "agency report needs the {} and {} columns",
            Field::Agency.column_name(),
            Field::Status.column_name()
        ))
    })?;
    debug!("Agency report over {} agencies", report.agencies.len());

    if let Some(unknown) = args
        .agency
        .iter()
        .find(|wanted| !report.agencies.iter().any(|a| a.agency.eq_ignore_ascii_case(wanted)))
    {
        return Err(AppError::InvalidInput(format!("unknown agency '{}'", unknown)));
    }

    let mut md = String::new();
    md.push_str(&format!("# Agencies · {}\n\n", report.agencies.len()));
    md.push_str(&format!(
        "- Best: {}\n- Worst: {}\n- Mean rate: {}\n- Below {:.0}%: {}\n\n",
        report.best,
        report.worst,
        percent(report.mean_rate),
        AT_RISK_RATE,
        report.at_risk
    ));

    let mut rows: Vec<&AgencyStats> = report
        .agencies
        .iter()
        .filter(|a| {
            args.agency.is_empty()
                || args.agency.iter().any(|wanted| a.agency.eq_ignore_ascii_case(wanted))
        })
        .filter(|a| a.rate >= args.min_rate)
        .collect();
    match args.sort {
        AgencySort::Rate => {}
        AgencySort::Ko => rows.sort_by(|a, b| b.ko.cmp(&a.ko)),
        AgencySort::Total => rows.sort_by(|a, b| b.total.cmp(&a.total)),
    }

    md.push_str("| Rank | Agency | Total | OK | KO | Rate | Deviation | Band |\n");
    md.push_str("|---|---|---|---|---|---|---|---|\n");
    for a in &rows {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {:+.1} | {} |\n",
            a.rank,
            escape_cell(&a.agency),
            a.total,
            a.ok,
            a.ko,
            percent(a.rate),
            a.deviation,
            a.band
        ));
    }

    let at_risk: Vec<&AgencyStats> = report.at_risk_agencies().collect();
    if !at_risk.is_empty() {
        md.push_str(&format!("\n## At risk · {}\n\n", at_risk.len()));
        for a in at_risk {
            md.push_str(&format!("- {}: {} ({} KO)\n", a.agency, percent(a.rate), a.ko));
        }
    }

    if let Some(breakdown) = status_breakdown(store) {
        if breakdown.ko > 0 && !breakdown.failures.is_empty() {
            md.push_str(&format!(
                "\n## Failures · {} of {}\n\n| Status | Count | Share |\n|---|---|---|\n",
                breakdown.ko, breakdown.total
            ));
            for failure in &breakdown.failures {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    escape_cell(&failure.status),
                    failure.count,
                    percent(failure.share)
                ));
            }
        }
    }

    Ok(md)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecordStore {
        RecordStore::from_pairs(
            [
                ("NVM", "OK"),
                ("NVM", "KO"),
                ("NVM", "KO"),
                ("ABC", "OK"),
                ("LYO", "Rejet"),
            ]
            .iter()
            .map(|&(agency, status)| vec![("Code_Unite", agency), ("Statut_Final", status)]),
        )
    }

    fn args(min_rate: f64, sort: AgencySort) -> AgenciesArgs {
        AgenciesArgs {
            min_rate,
            sort,
            agency: Vec::new(),
        }
    }

    #[test]
    fn test_dashboard() {
        let md = execute_agencies(&store(), &args(0.0, AgencySort::Rate)).unwrap();
        assert!(md.contains("- Best: ABC"));
        assert!(md.contains("- Worst: LYO"));
        assert!(md.contains("| 1 | ABC | 1 | 1 | 0 | 100.0% |"));
        assert!(md.contains("## At risk · 2"));
        assert!(md.contains("| KO | 2 | 66.7% |"));
        assert!(md.contains("| Rejet | 1 | 33.3% |"));
    }

    #[test]
    fn test_min_rate_and_sort() {
        let md = execute_agencies(&store(), &args(30.0, AgencySort::Ko)).unwrap();
        assert!(!md.contains("| 3 | LYO"));
        let nvm = md.find("| NVM |").unwrap();
        let abc = md.find("| ABC |").unwrap();
        assert!(nvm < abc);
    }

    #[test]
    fn test_agency_selection() {
        let args = AgenciesArgs {
            agency: vec!["nvm".to_string(), "LYO".to_string()],
            ..args(0.0, AgencySort::Rate)
        };
        let md = execute_agencies(&store(), &args).unwrap();
        assert!(md.contains("| NVM |"));
        assert!(md.contains("| LYO |"));
        assert!(!md.contains("| ABC |"));
        // the summary still covers every agency
        assert!(md.contains("- Best: ABC"));
    }

    #[test]
    fn test_unknown_agency() {
        let args = AgenciesArgs {
            agency: vec!["XYZ".to_string()],
            ..args(0.0, AgencySort::Rate)
        };
        let err = execute_agencies(&store(), &args).unwrap_err();
        assert_eq!(err.error_code(), "invalid_input");
        assert!(err.message().contains("XYZ"));
    }

    #[test]
    fn test_invalid_min_rate() {
        let err = execute_agencies(&store(), &args(120.0, AgencySort::Rate)).unwrap_err();
        assert_eq!(err.error_code(), "invalid_input");
    }

    #[test]
    fn test_missing_columns() {
        let store = RecordStore::from_pairs(vec![vec![("Contrat", "X")]]);
        let err = execute_agencies(&store, &args(0.0, AgencySort::Rate)).unwrap_err();
        assert_eq!(err.error_code(), "not_found");
    }
}
