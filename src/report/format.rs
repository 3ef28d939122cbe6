//! Formatted terminal output.
//!
//! Kept separate from the engine/batch code so output changes stay
//! localized and the core results remain plain data.

use std::collections::BTreeMap;

use crate::batch::BatchReport;
use crate::domain::DomainStatus;

pub fn format_status(statuses: &BTreeMap<String, DomainStatus>) -> String {
    let mut out = String::from("=== model status ===\n");
    let width = statuses.keys().map(String::len).max().unwrap_or(0);
    for (domain, status) in statuses {
        out.push_str(&format!("{domain:width$}  {status}\n"));
    }
    out
}

pub fn format_batch_summary(report: &BatchReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== batch summary ({}) ===\n", report.domain));
    out.push_str(&format!("Started:      {}\n", report.started_at.to_rfc3339()));
    out.push_str(&format!("Rows:         {}\n", report.rows.len()));
    out.push_str(&format!("Succeeded:    {}\n", report.success_count()));
    out.push_str(&format!("Failed:       {}\n", report.failure_count()));
    out.push_str(&format!(
        "Success rate: {:.1}%\n",
        report.success_rate() * 100.0
    ));
    out.push_str(&format!(
        "Avg row time: {:.3} ms\n",
        report.mean_row_time().as_secs_f64() * 1000.0
    ));
    out
}
