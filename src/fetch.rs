// Acquisition of the raw dataset.
//
// The compressed CSV is cached at `data_path`; once it is there the network
// is never touched again.
use crate::config::ReportConfig;
use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Return the local dataset path, downloading it first if it is missing.
pub fn ensure_dataset(config: &ReportConfig) -> Result<PathBuf> {
    let path = config.data_path.clone();
    if path.exists() {
        info!(path = %path.display(), "dataset already cached, skipping download");
        return Ok(path);
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .build()?;
    download(&client, &config.data_url, &path)?;
    Ok(path)
}

/// Stream `url` into `dest`.
///
/// The body is written to a `.part` sibling first and renamed on success so
/// an interrupted download never leaves a truncated file at `dest`.
pub fn download(client: &reqwest::blocking::Client, url: &str, dest: &Path) -> Result<u64> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    info!(url, dest = %dest.display(), "downloading dataset");
    let mut response = client
        .get(url)
        .send()
        .with_context(|| format!("request to {} failed", url))?;
    if !response.status().is_success() {
        bail!("download of {} failed: HTTP {}", url, response.status());
    }

    let part = part_path(dest);
    let result = (|| -> Result<u64> {
        let mut writer = BufWriter::new(File::create(&part)?);
        let bytes = response.copy_to(&mut writer)?;
        writer.flush()?;
        Ok(bytes)
    })();

    match result {
        Ok(bytes) => {
            fs::rename(&part, dest)
                .with_context(|| format!("failed to move download into {}", dest.display()))?;
            info!(bytes, "download complete");
            Ok(bytes)
        }
        Err(e) => {
            if let Err(rm) = fs::remove_file(&part) {
                warn!(error = %rm, "could not remove partial download");
            }
            Err(e.context(format!("failed to save {}", url)))
        }
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
