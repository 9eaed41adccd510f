//! Dataset overview tool
//!
//! Shape of the loaded data, outcome totals, records per contract type and
//! records per integration day.

use super::util::{escape_cell, percent};
use crate::records::RecordStore;
use crate::stats::{daily_volume, overview, status_breakdown, type_counts};
use tracing::debug;

pub fn execute_overview(store: &RecordStore) -> String {
    let summary = overview(store);
    debug!("Overview: {:?}", summary);

    let mut md = String::from("# Overview\n\n");
    md.push_str(&format!(
        "- Rows: {}\n- Columns: {}\n- Duplicate rows: {}\n",
        summary.rows, summary.columns, summary.duplicates
    ));

    if let Some(breakdown) = status_breakdown(store) {
        if breakdown.total > 0 {
            let share = |n: usize| percent(n as f64 / breakdown.total as f64 * 100.0);
            md.push_str(&format!(
                "- OK: {} ({})\n- KO: {} ({})\n",
                breakdown.ok,
                share(breakdown.ok),
                breakdown.ko,
                share(breakdown.ko)
            ));
        }
    }

    if let Some(types) = type_counts(store) {
        md.push_str("\n## Types\n\n| Type | Count |\n|---|---|\n");
        for entry in &types {
            md.push_str(&format!("| {} | {} |\n", escape_cell(&entry.label), entry.count));
        }
    }

    if let Some(days) = daily_volume(store) {
        md.push_str(&format!("\n## Daily volume · {} days\n\n", days.len()));
        if days.is_empty() {
            md.push_str("No parseable integration dates.\n");
        } else {
            md.push_str("| Date | Count |\n|---|---|\n");
            for day in &days {
                md.push_str(&format!("| {} | {} |\n", day.date.format("%Y-%m-%d"), day.count));
            }
        }
    }

    md
}
