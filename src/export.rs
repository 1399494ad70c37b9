use crate::rate_provider::RateSnapshot;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug)]
pub struct ExportPaths {
    pub current: PathBuf,
    pub history: Option<PathBuf>,
}

/// Writes the latest snapshot and the session history to timestamped CSV
/// files in `dir`. The history file is only written when the session
/// recorded at least one snapshot.
pub fn export_csv(
    dir: &Path,
    snapshot: &RateSnapshot,
    history: &[RateSnapshot],
) -> Result<ExportPaths> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");

    let current_path = dir.join(format!("exchange_rates_{stamp}.csv"));
    write_snapshots(&current_path, std::slice::from_ref(snapshot))?;
    debug!("Wrote current rates to {}", current_path.display());

    let history_path = if history.is_empty() {
        None
    } else {
        let path = dir.join(format!("exchange_rates_{stamp}_history.csv"));
        write_snapshots(&path, history)?;
        debug!(
            "Wrote {} history snapshots to {}",
            history.len(),
            path.display()
        );
        Some(path)
    };

    Ok(ExportPaths {
        current: current_path,
        history: history_path,
    })
}

fn write_snapshots(path: &Path, snapshots: &[RateSnapshot]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;

    writer.write_record(["Base", "Currency", "Rate", "Date", "Retrieved At"])?;

    for snapshot in snapshots {
        let retrieved_at = snapshot.retrieved_at.format(TIMESTAMP_FORMAT).to_string();
        for (currency, rate) in &snapshot.rates {
            let rate = rate.to_string();
            writer.write_record([
                snapshot.base.as_str(),
                currency.as_str(),
                rate.as_str(),
                snapshot.date.as_str(),
                retrieved_at.as_str(),
            ])?;
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write export file: {}", path.display()))
}
