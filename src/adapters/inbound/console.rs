//! Console Report
//!
//! Plain-text rendering of a locate outcome for the command line.

use crate::application::{LocateOutcome, LocateReport};
use crate::domain::entities::RankedCarrier;
use std::fmt;

const HEADERS: [&str; 4] = ["Carrier", "State", "Address", "Distance"];

/// Format an outcome for stdout.
///
/// Success prints a table of the closest carriers; anything else prints the
/// outcome message.
pub fn format_outcome(outcome: &LocateOutcome) -> String {
    match outcome.report() {
        Some(report) => format_report(report),
        None => format!("{}\n", outcome.message()),
    }
}

/// Format a successful report as a results table.
pub fn format_report(report: &LocateReport) -> String {
    ReportTable(report).to_string()
}

/// Aligned results table for a report.
struct ReportTable<'a>(&'a LocateReport);

impl fmt::Display for ReportTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let rows: Vec<[String; 4]> = report.carriers.iter().map(table_row).collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        writeln!(f, "Closest carriers to {} {}", report.address, report.location)?;
        writeln!(f)?;
        write_row(f, &HEADERS.map(String::from), &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("  "))?;
        for row in &rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn table_row(ranked: &RankedCarrier) -> [String; 4] {
    let distance = if ranked.is_reachable() {
        format!("{:.2} km", ranked.distance_km)
    } else {
        "unknown".to_string()
    };
    [
        ranked.carrier.name.clone(),
        ranked.carrier.state.clone(),
        ranked.carrier.address.clone(),
        distance,
    ]
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String; 4], widths: &[usize; 4]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}
