// Report configuration.
//
// Values come from `storm_report.toml` when present, then from environment
// variables (a `.env` file is honored), then fall back to the defaults
// below. A missing default config file is not an error.
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "storm_report.toml";
pub const DEFAULT_DATA_URL: &str =
    "https://d396qusza40orc.cloudfront.net/repdata%2Fdata%2FStormData.csv.bz2";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub data_url: String,
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    /// Number of categories kept in each ranking.
    pub top_n: usize,
    /// Inclusive year window on the event begin date.
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub download_timeout_secs: u64,
    pub log_level: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            data_path: PathBuf::from("data/StormData.csv.bz2"),
            output_dir: PathBuf::from("report"),
            top_n: 15,
            start_year: None,
            end_year: None,
            download_timeout_secs: 600,
            log_level: "info".to_string(),
        }
    }
}

impl ReportConfig {
    /// Load the config file.
    ///
    /// With `None` the default file name is tried and silently skipped when
    /// absent; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !path.exists() {
            if required {
                bail!("config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: ReportConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `STORM_*` environment overrides on top of the file values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("STORM_DATA_URL") {
            self.data_url = v;
        }
        if let Some(v) = lookup("STORM_DATA_PATH") {
            self.data_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("STORM_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("STORM_TOP_N") {
            self.top_n = v
                .trim()
                .parse()
                .with_context(|| format!("STORM_TOP_N is not a number: {:?}", v))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            bail!("top_n must be at least 1");
        }
        if let (Some(start), Some(end)) = (self.start_year, self.end_year) {
            if start > end {
                bail!("start_year {} is after end_year {}", start, end);
            }
        }
        Ok(())
    }

    pub fn year_in_range(&self, year: i32) -> bool {
        self.start_year.map_or(true, |s| year >= s) && self.end_year.map_or(true, |e| year <= e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = ReportConfig::from_toml("").expect("empty config is valid");
        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.top_n, 15);
    }

    #[test]
    fn test_partial_toml_overrides_only_given_fields() {
        let config = ReportConfig::from_toml("top_n = 10\nstart_year = 1996\n")
            .expect("partial config should parse");
        assert_eq!(config.top_n, 10);
        assert_eq!(config.start_year, Some(1996));
        assert_eq!(config.data_url, DEFAULT_DATA_URL);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(ReportConfig::from_toml("top_n = 0").is_err(), "top_n of zero");
        assert!(
            ReportConfig::from_toml("start_year = 2000\nend_year = 1990").is_err(),
            "inverted year window"
        );
        assert!(ReportConfig::from_toml("colour = \"red\"").is_err(), "unknown key");
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let missing = env::temp_dir().join("storm_report_no_such_config.toml");
        assert!(ReportConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let vars: HashMap<&str, &str> =
            [("STORM_OUTPUT_DIR", "out"), ("STORM_TOP_N", "5")].into_iter().collect();
        let mut config = ReportConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .expect("overrides should apply");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.data_path, PathBuf::from("data/StormData.csv.bz2"));
    }

    #[test]
    fn test_bad_top_n_override_is_an_error() {
        let mut config = ReportConfig::default();
        assert!(config.apply_overrides(|k| (k == "STORM_TOP_N").then(|| "many".to_string())).is_err());
    }

    #[test]
    fn test_year_window_is_inclusive() {
        let config = ReportConfig {
            start_year: Some(1996),
            end_year: Some(2000),
            ..ReportConfig::default()
        };
        assert!(config.year_in_range(1996));
        assert!(config.year_in_range(2000));
        assert!(!config.year_in_range(1995));
        assert!(!config.year_in_range(2001));
        assert!(ReportConfig::default().year_in_range(1950));
    }
}
