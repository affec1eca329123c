//! Output formatting for aggregation results

use clap::ValueEnum;
use colored::Colorize;
use confeti_types::ReportResponse;
use std::fmt::Write;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Render conference tables sorted by conference, then year, then count
/// descending
pub fn render_table(entries: &[ReportResponse]) -> String {
    let mut out = String::new();

    if entries.iter().all(ReportResponse::is_empty) {
        let _ = writeln!(out, "{}", "No reports matched".dimmed());
        return out;
    }

    let mut entries: Vec<&ReportResponse> = entries.iter().collect();
    entries.sort_by(|a, b| a.conference_name.cmp(&b.conference_name));

    for entry in entries {
        let mut years: Vec<_> = entry.data.iter().collect();
        years.sort_by_key(|(year, _)| **year);

        for (year, counts) in years {
            let _ = writeln!(
                out,
                "{} {}",
                entry.conference_name.bold().cyan(),
                year.to_string().bold()
            );

            let mut rows: Vec<_> = counts.iter().collect();
            rows.sort_by(|(a_name, a_count), (b_name, b_count)| {
                b_count.cmp(a_count).then_with(|| a_name.cmp(b_name))
            });

            if rows.is_empty() {
                let _ = writeln!(out, "  {}", "(no categories)".dimmed());
            }
            for (category, count) in rows {
                let _ = writeln!(out, "  {:<32} {:>6}", category, count.to_string().green());
            }
        }
    }

    out
}
