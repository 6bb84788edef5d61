use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One row of the storm dataset, projected to the columns the report uses.
///
/// The source file has 37 columns; serde skips the rest without decoding
/// them, which matters because the free-text `REMARKS` column is not always
/// valid UTF-8.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "BGN_DATE")]
    pub bgn_date: Option<String>,
    #[serde(rename = "EVTYPE")]
    pub evtype: Option<String>,
    #[serde(rename = "FATALITIES")]
    pub fatalities: Option<String>,
    #[serde(rename = "INJURIES")]
    pub injuries: Option<String>,
    #[serde(rename = "PROPDMG")]
    pub propdmg: Option<String>,
    #[serde(rename = "PROPDMGEXP")]
    pub propdmgexp: Option<String>,
    #[serde(rename = "CROPDMG")]
    pub cropdmg: Option<String>,
    #[serde(rename = "CROPDMGEXP")]
    pub cropdmgexp: Option<String>,
    #[serde(rename = "REFNUM")]
    pub refnum: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StormEvent {
    pub begin_date: NaiveDate,
    pub event_type: String,
    pub fatalities: f64,
    pub injuries: f64,
    pub prop_magnitude: f64,
    pub prop_exp: String,
    pub crop_magnitude: f64,
    pub crop_exp: String,
    pub property_damage: f64,
    pub crop_damage: f64,
    pub refnum: u64,
    pub category: String,
    /// `false` when `category` is the fallback raw label.
    pub canonical: bool,
}

impl StormEvent {
    pub fn economic_damage(&self) -> f64 {
        self.property_damage + self.crop_damage
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    pub category: String,
    pub events: usize,
    pub fatalities: f64,
    pub injuries: f64,
    pub property_damage: f64,
    pub crop_damage: f64,
}

impl CategoryTotals {
    pub fn economic_damage(&self) -> f64 {
        self.property_damage + self.crop_damage
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCategory {
    pub rank: usize,
    pub category: String,
    pub events: usize,
    pub value: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Events")]
    #[tabled(rename = "Events")]
    pub events: String,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_events: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub categorized_events: usize,
    pub uncategorized_pct: f64,
    pub total_fatalities: f64,
    pub total_injuries: f64,
    pub total_economic_damage: f64,
    pub parse_errors: usize,
}
