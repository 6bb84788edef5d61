// Report generation: rankings, charts, tables and the summary document.
use crate::charts::render_bar_chart;
use crate::loader::LoadReport;
use crate::output::{write_csv, write_json, write_report_document, ReportSection};
use crate::reports::{aggregate_by_category, generate_summary, ranking_rows, top_categories, Metric};
use crate::types::{RankingRow, StormEvent, SummaryStats};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DOCUMENT_FILE: &str = "report.md";
pub const SUMMARY_FILE: &str = "summary.json";

pub struct MetricReport {
    pub metric: Metric,
    pub rows: Vec<RankingRow>,
    pub chart_path: PathBuf,
    pub csv_path: PathBuf,
}

pub struct GeneratedReport {
    pub sections: Vec<MetricReport>,
    pub summary: SummaryStats,
    pub document_path: PathBuf,
}

/// Aggregate `events` and write every report artifact into `output_dir`.
pub fn generate_reports(
    events: &[StormEvent],
    load_report: &LoadReport,
    output_dir: &Path,
    top_n: usize,
) -> Result<GeneratedReport> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let totals = aggregate_by_category(events);
    info!(categories = totals.len(), events = events.len(), "aggregated events");

    let mut sections = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let ranked = top_categories(&totals, metric, top_n);
        let chart_path = output_dir.join(format!("{}.svg", metric.file_stem()));
        let csv_path = output_dir.join(format!("{}.csv", metric.file_stem()));
        render_bar_chart(&chart_path, metric.title(), metric.unit(), &ranked)?;
        let rows = ranking_rows(&ranked, metric);
        write_csv(&csv_path, &rows)?;
        sections.push(MetricReport { metric, rows, chart_path, csv_path });
    }

    let summary = generate_summary(events, load_report);
    write_json(&output_dir.join(SUMMARY_FILE), &summary)?;

    let chart_names: Vec<String> = Metric::ALL
        .iter()
        .map(|m| format!("{}.svg", m.file_stem()))
        .collect();
    let doc_sections: Vec<ReportSection<'_>> = sections
        .iter()
        .zip(&chart_names)
        .map(|(s, chart)| ReportSection { metric: s.metric, chart_file: chart, rows: &s.rows })
        .collect();
    let document_path = output_dir.join(DOCUMENT_FILE);
    write_report_document(&document_path, &summary, &doc_sections)?;
    info!(path = %document_path.display(), "report written");

    Ok(GeneratedReport { sections, summary, document_path })
}
