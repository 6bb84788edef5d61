// Severe weather impact report over the NOAA storm event database.
//
// The pipeline is linear: fetch the compressed CSV, load and classify the
// events, then rank categories by fatalities, injuries and economic damage
// and render the three charts into a Markdown report.
pub mod categories;
pub mod charts;
pub mod config;
pub mod damage;
pub mod fetch;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod reports;
pub mod types;
pub mod util;
