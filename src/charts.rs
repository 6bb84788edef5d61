// Static SVG bar charts, one bar per ranked category.
use crate::types::RankedCategory;
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

const CHART_SIZE: (u32, u32) = (1100, 700);
const BAR_COLOR: RGBColor = RGBColor(70, 110, 170);

/// Render `ranked` as a vertical bar chart in rank order.
///
/// Category names go on the x axis rotated 90 degrees since several of them
/// are long raw labels. An empty ranking renders an empty frame.
pub fn render_bar_chart(path: &Path, title: &str, y_desc: &str, ranked: &[RankedCategory]) -> Result<()> {
    debug!(path = %path.display(), bars = ranked.len(), "rendering chart");
    draw(path, title, y_desc, ranked)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("failed to render chart {}", path.display()))
}

fn draw(
    path: &Path,
    title: &str,
    y_desc: &str,
    ranked: &[RankedCategory],
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let bars = ranked.len().max(1);
    let max_value = ranked.iter().map(|r| r.value).fold(0.0_f64, f64::max);
    let y_top = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 26))
        .margin(20)
        .x_label_area_size(190)
        .y_label_area_size(100)
        .build_cartesian_2d((0..bars).into_segmented(), 0.0..y_top)?;

    let label_for = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => ranked.get(*i).map(|r| r.category.clone()).unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars)
        .x_label_formatter(&label_for)
        .x_label_style(("sans-serif", 13).into_font().transform(FontTransform::Rotate90))
        .y_desc(y_desc)
        .y_label_formatter(&|v| compact(*v))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(8)
            .data(ranked.iter().enumerate().map(|(i, r)| (i, r.value))),
    )?;

    root.present()?;
    Ok(())
}

/// Axis tick label, shortened with an SI-style suffix.
fn compact(v: f64) -> String {
    let a = v.abs();
    if a >= 1e9 {
        format!("{:.0}B", v / 1e9)
    } else if a >= 1e6 {
        format!("{:.0}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.0}K", v / 1e3)
    } else {
        format!("{:.0}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    fn ranked(name: &str, value: f64, rank: usize) -> RankedCategory {
        RankedCategory { rank, category: name.to_string(), events: 1, value }
    }

    #[test]
    fn test_chart_is_written_with_category_labels() {
        let path = env::temp_dir().join(format!("storm_report_chart_{}.svg", std::process::id()));
        let data = vec![ranked("Tornado", 5633.0, 1), ranked("Extreme Heat", 3138.0, 2)];
        render_bar_chart(&path, "Fatalities", "Fatalities", &data).expect("chart should render");
        let svg = fs::read_to_string(&path).expect("svg written");
        assert!(svg.contains("<svg"), "output should be an SVG document");
        assert!(svg.contains("Tornado"));
        assert!(svg.contains("Extreme Heat"));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_empty_ranking_still_renders() {
        let path = env::temp_dir().join(format!("storm_report_empty_{}.svg", std::process::id()));
        render_bar_chart(&path, "Nothing", "Count", &[]).expect("empty chart should render");
        assert!(path.exists());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_compact_tick_labels() {
        assert_eq!(compact(150e9), "150B");
        assert_eq!(compact(2e6), "2M");
        assert_eq!(compact(5000.0), "5K");
        assert_eq!(compact(12.0), "12");
    }
}
