use crate::categories::classify;
use crate::config::ReportConfig;
use crate::damage::damage_amount;
use crate::types::{RawRow, StormEvent};
use crate::util::{parse_amount, parse_date_safe, parse_f64_safe};
use anyhow::{Context, Result};
use bzip2::read::MultiBzDecoder;
use chrono::Datelike;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub out_of_range: usize,
    pub parse_errors: usize,
}

/// Open the dataset, transparently decompressing `.bz2` files.
pub fn open_dataset(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let is_bz2 = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("bz2"));
    if is_bz2 {
        Ok(Box::new(MultiBzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

pub fn load_events(path: &Path, config: &ReportConfig) -> Result<(Vec<StormEvent>, LoadReport)> {
    info!(path = %path.display(), "loading storm events");
    let reader = open_dataset(path)?;
    read_events(reader, config)
}

/// Parse, project and clean every row of `reader`.
///
/// Rows are read as raw bytes and only the projected columns are decoded,
/// the free-text columns of the real dataset contain stray Latin-1 bytes.
pub fn read_events<R: Read>(reader: R, config: &ReportConfig) -> Result<(Vec<StormEvent>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.byte_headers().context("failed to read CSV header")?.clone();

    let mut report = LoadReport::default();
    let mut events: Vec<StormEvent> = Vec::new();

    for result in rdr.byte_records() {
        report.total_rows += 1;
        let row: RawRow = match result.map_err(anyhow::Error::from).and_then(|rec| {
            rec.deserialize::<RawRow>(Some(&headers)).map_err(anyhow::Error::from)
        }) {
            Ok(r) => r,
            Err(e) => {
                debug!(row = report.total_rows, error = %e, "skipping unreadable row");
                report.parse_errors += 1;
                continue;
            }
        };

        let Some(event) = clean_row(row) else {
            report.parse_errors += 1;
            continue;
        };

        if !config.year_in_range(event.begin_date.year()) {
            report.out_of_range += 1;
            continue;
        }
        events.push(event);
    }

    report.kept_rows = events.len();
    info!(
        total = report.total_rows,
        kept = report.kept_rows,
        out_of_range = report.out_of_range,
        parse_errors = report.parse_errors,
        "finished loading"
    );
    Ok((events, report))
}

/// Turn a projected row into a cleaned, classified event.
///
/// Returns `None` when the date or any numeric field is present but
/// unparseable. Blank counts and magnitudes are zero.
pub fn clean_row(row: RawRow) -> Option<StormEvent> {
    let begin_date = parse_date_safe(row.bgn_date.as_deref())?;
    let fatalities = parse_amount(row.fatalities.as_deref())?;
    let injuries = parse_amount(row.injuries.as_deref())?;
    let prop_magnitude = parse_amount(row.propdmg.as_deref())?;
    let crop_magnitude = parse_amount(row.cropdmg.as_deref())?;
    let refnum = parse_f64_safe(row.refnum.as_deref()).map_or(0, |v| v as u64);

    let prop_exp = row.propdmgexp.unwrap_or_default().trim().to_string();
    let crop_exp = row.cropdmgexp.unwrap_or_default().trim().to_string();
    let event_type = row.evtype.unwrap_or_default().trim().to_string();

    let category = classify(&event_type);
    let canonical = category.is_canonical();

    Some(StormEvent {
        begin_date,
        property_damage: damage_amount(prop_magnitude, &prop_exp),
        crop_damage: damage_amount(crop_magnitude, &crop_exp),
        event_type,
        fatalities,
        injuries,
        prop_magnitude,
        prop_exp,
        crop_magnitude,
        crop_exp,
        refnum,
        category: category.into_name(),
        canonical,
    })
}
