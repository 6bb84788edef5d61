use crate::reports::Metric;
use crate::types::{RankingRow, SummaryStats};
use crate::util::{format_dollars, format_int, format_number};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn markdown_table<T: Tabled + Clone>(rows: &[T]) -> String {
    Table::new(rows.to_vec()).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    println!("{}\n", markdown_table(&slice));
}

/// One chart plus its ranking, as it appears in the report document.
pub struct ReportSection<'a> {
    pub metric: Metric,
    /// Chart path relative to the document.
    pub chart_file: &'a str,
    pub rows: &'a [RankingRow],
}

pub fn render_report_document(summary: &SummaryStats, sections: &[ReportSection<'_>]) -> String {
    let mut doc = String::new();
    let period = match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => "no events".to_string(),
    };

    // `write!` into a String cannot fail.
    let _ = writeln!(doc, "# Most Harmful and Costly Severe Weather Categories\n");
    let _ = writeln!(doc, "Period covered: {}\n", period);
    let _ = writeln!(doc, "- Events analysed: {}", format_int(summary.total_events));
    let _ = writeln!(
        doc,
        "- Events matched to a weather category: {}",
        format_int(summary.categorized_events)
    );
    let _ = writeln!(
        doc,
        "- Uncategorized events (raw label kept): {}%",
        format_number(summary.uncategorized_pct, 2)
    );
    let _ = writeln!(doc, "- Total fatalities: {}", format_number(summary.total_fatalities, 0));
    let _ = writeln!(doc, "- Total injuries: {}", format_number(summary.total_injuries, 0));
    let _ = writeln!(
        doc,
        "- Total economic damage: {}",
        format_dollars(summary.total_economic_damage)
    );
    if summary.parse_errors > 0 {
        let _ = writeln!(doc, "- Rows skipped as unreadable: {}", format_int(summary.parse_errors));
    }

    for section in sections {
        let _ = writeln!(doc, "\n## {}\n", section.metric.title());
        let _ = writeln!(doc, "![{}]({})\n", section.metric.title(), section.chart_file);
        if section.rows.is_empty() {
            let _ = writeln!(doc, "(no rows)");
        } else {
            let _ = writeln!(doc, "{}", markdown_table(section.rows));
        }
    }
    doc
}

pub fn write_report_document(
    path: &Path,
    summary: &SummaryStats,
    sections: &[ReportSection<'_>],
) -> Result<()> {
    let doc = render_report_document(summary, sections);
    std::fs::write(path, doc).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
