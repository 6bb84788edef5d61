use crate::loader::LoadReport;
use crate::types::{CategoryTotals, RankedCategory, RankingRow, StormEvent, SummaryStats};
use crate::util::{format_dollars, format_int, format_number, percent};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The three quantities the report ranks categories by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Fatalities,
    Injuries,
    EconomicDamage,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Fatalities, Metric::Injuries, Metric::EconomicDamage];

    pub fn title(self) -> &'static str {
        match self {
            Metric::Fatalities => "Fatalities by Weather Category",
            Metric::Injuries => "Injuries by Weather Category",
            Metric::EconomicDamage => "Economic Damage by Weather Category",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Fatalities => "Fatalities",
            Metric::Injuries => "Injuries",
            Metric::EconomicDamage => "Property + crop damage (USD)",
        }
    }

    /// File name without extension used for the chart and the CSV table.
    pub fn file_stem(self) -> &'static str {
        match self {
            Metric::Fatalities => "fatalities",
            Metric::Injuries => "injuries",
            Metric::EconomicDamage => "economic_damage",
        }
    }

    pub fn value(self, totals: &CategoryTotals) -> f64 {
        match self {
            Metric::Fatalities => totals.fatalities,
            Metric::Injuries => totals.injuries,
            Metric::EconomicDamage => totals.economic_damage(),
        }
    }

    pub fn format(self, value: f64) -> String {
        match self {
            Metric::Fatalities | Metric::Injuries => format_number(value, 0),
            Metric::EconomicDamage => format_dollars(value),
        }
    }
}

/// Sum casualties and damage per category.
///
/// Groups come back in ascending category-name order; this is the
/// "grouping order" rankings fall back to on ties.
pub fn aggregate_by_category(events: &[StormEvent]) -> Vec<CategoryTotals> {
    let mut map: BTreeMap<&str, CategoryTotals> = BTreeMap::new();
    for e in events {
        let acc = map.entry(e.category.as_str()).or_insert_with(|| CategoryTotals {
            category: e.category.clone(),
            ..CategoryTotals::default()
        });
        acc.events += 1;
        acc.fatalities += e.fatalities;
        acc.injuries += e.injuries;
        acc.property_damage += e.property_damage;
        acc.crop_damage += e.crop_damage;
    }
    map.into_values().collect()
}

/// Top `n` categories by `metric`, largest first.
///
/// The sort is stable, so equal totals keep their grouping order.
pub fn top_categories(totals: &[CategoryTotals], metric: Metric, n: usize) -> Vec<RankedCategory> {
    let mut scored: Vec<(f64, &CategoryTotals)> =
        totals.iter().map(|t| (metric.value(t), t)).collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(idx, (value, t))| RankedCategory {
            rank: idx + 1,
            category: t.category.clone(),
            events: t.events,
            value,
        })
        .collect()
}

/// Percentage of events whose category is the fallback raw label.
pub fn uncategorized_pct(events: &[StormEvent]) -> f64 {
    let raw = events.iter().filter(|e| !e.canonical).count();
    percent(raw, events.len())
}

pub fn ranking_rows(ranked: &[RankedCategory], metric: Metric) -> Vec<RankingRow> {
    ranked
        .iter()
        .map(|r| RankingRow {
            rank: r.rank,
            category: r.category.clone(),
            events: format_int(r.events),
            total: metric.format(r.value),
        })
        .collect()
}

pub fn generate_summary(events: &[StormEvent], load_report: &LoadReport) -> SummaryStats {
    let categorized_events = events.iter().filter(|e| e.canonical).count();
    SummaryStats {
        total_events: events.len(),
        first_date: events.iter().map(|e| e.begin_date).min(),
        last_date: events.iter().map(|e| e.begin_date).max(),
        categorized_events,
        uncategorized_pct: uncategorized_pct(events),
        total_fatalities: events.iter().map(|e| e.fatalities).sum(),
        total_injuries: events.iter().map(|e| e.injuries).sum(),
        total_economic_damage: events.iter().map(StormEvent::economic_damage).sum(),
        parse_errors: load_report.parse_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::classify;
    use chrono::NaiveDate;

    fn event(label: &str, fatalities: f64, injuries: f64, prop: f64, crop: f64) -> StormEvent {
        let category = classify(label);
        StormEvent {
            begin_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            event_type: label.to_string(),
            fatalities,
            injuries,
            prop_magnitude: prop,
            prop_exp: String::new(),
            crop_magnitude: crop,
            crop_exp: String::new(),
            property_damage: prop,
            crop_damage: crop,
            refnum: 0,
            canonical: category.is_canonical(),
            category: category.into_name(),
        }
    }

    fn totals(name: &str, fatalities: f64) -> CategoryTotals {
        CategoryTotals {
            category: name.to_string(),
            events: 1,
            fatalities,
            ..CategoryTotals::default()
        }
    }

    #[test]
    fn test_aggregation_sums_per_category_in_name_order() {
        let events = vec![
            event("TORNADO", 2.0, 10.0, 100.0, 0.0),
            event("HAIL", 0.0, 1.0, 5.0, 50.0),
            event("TORNADO F1", 1.0, 0.0, 20.0, 1.0),
        ];
        let agg = aggregate_by_category(&events);
        assert_eq!(agg.len(), 2);
        assert_eq!(agg[0].category, "Hail");
        assert_eq!(agg[1].category, "Tornado");
        assert_eq!(agg[1].events, 2);
        assert_eq!(agg[1].fatalities, 3.0);
        assert_eq!(agg[1].injuries, 10.0);
        assert_eq!(agg[1].economic_damage(), 121.0);
        assert_eq!(agg[0].economic_damage(), 55.0);
    }

    #[test]
    fn test_raw_labels_differing_in_case_are_one_group() {
        let events = vec![
            event("Dense Fog", 0.0, 2.0, 0.0, 0.0),
            event("DENSE FOG", 1.0, 0.0, 0.0, 0.0),
        ];
        let agg = aggregate_by_category(&events);
        assert_eq!(agg.len(), 1, "case variants should not split totals");
        assert_eq!(agg[0].category, "DENSE FOG");
        assert_eq!((agg[0].events, agg[0].fatalities, agg[0].injuries), (2, 1.0, 2.0));
    }

    #[test]
    fn test_top_categories_sorts_descending_and_slices() {
        let t = vec![totals("A", 1.0), totals("B", 5.0), totals("C", 3.0)];
        let top = top_categories(&t, Metric::Fatalities, 2);
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].rank, top[0].category.as_str()), (1, "B"));
        assert_eq!((top[1].rank, top[1].category.as_str()), (2, "C"));
    }

    #[test]
    fn test_ties_keep_grouping_order() {
        let t = vec![totals("Alpha", 4.0), totals("Bravo", 9.0), totals("Charlie", 4.0), totals("Delta", 4.0)];
        let top = top_categories(&t, Metric::Fatalities, 15);
        let names: Vec<&str> = top.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["Bravo", "Alpha", "Charlie", "Delta"]);
    }

    #[test]
    fn test_top_n_larger_than_groups_returns_all() {
        let t = vec![totals("A", 1.0)];
        assert_eq!(top_categories(&t, Metric::Injuries, 15).len(), 1);
        assert!(top_categories(&[], Metric::Injuries, 15).is_empty());
    }

    #[test]
    fn test_uncategorized_pct_counts_raw_labels() {
        let events = vec![
            event("TORNADO", 0.0, 0.0, 0.0, 0.0),
            event("DENSE FOG", 0.0, 0.0, 0.0, 0.0),
            event("HAIL", 0.0, 0.0, 0.0, 0.0),
            event("OTHER", 0.0, 0.0, 0.0, 0.0),
        ];
        assert_eq!(uncategorized_pct(&events), 50.0);
        assert_eq!(uncategorized_pct(&[]), 0.0);
    }

    #[test]
    fn test_ranking_rows_format_values_per_metric() {
        let ranked = vec![RankedCategory {
            rank: 1,
            category: "Flood".to_string(),
            events: 12345,
            value: 150_000_000_000.0,
        }];
        let rows = ranking_rows(&ranked, Metric::EconomicDamage);
        assert_eq!(rows[0].events, "12,345");
        assert_eq!(rows[0].total, "$150.00B");
        let rows = ranking_rows(&ranked, Metric::Fatalities);
        assert_eq!(rows[0].total, "150,000,000,000");
    }

    #[test]
    fn test_summary_reports_period_and_totals() {
        let mut early = event("TORNADO", 1.0, 2.0, 3.0, 4.0);
        early.begin_date = NaiveDate::from_ymd_opt(1950, 4, 18).unwrap();
        let events = vec![early, event("FOG", 0.0, 1.0, 0.0, 0.0)];
        let report = LoadReport { parse_errors: 3, ..LoadReport::default() };
        let s = generate_summary(&events, &report);
        assert_eq!(s.total_events, 2);
        assert_eq!(s.categorized_events, 1);
        assert_eq!(s.uncategorized_pct, 50.0);
        assert_eq!(s.first_date, NaiveDate::from_ymd_opt(1950, 4, 18));
        assert_eq!(s.last_date, NaiveDate::from_ymd_opt(2000, 1, 1));
        assert_eq!(s.total_injuries, 3.0);
        assert_eq!(s.total_economic_damage, 7.0);
        assert_eq!(s.parse_errors, 3);
    }
}
