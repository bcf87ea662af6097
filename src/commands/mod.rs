pub mod config;
pub mod players;
pub mod stats;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;

use crate::data_provider::{DatasetSource, RecordSource};
use crate::fixtures;
use crate::records::DateRange;
use crate::types::GameMode;

/// Parse an optional YYYY-MM-DD date
///
/// Returns an error if the date string is malformed.
pub fn parse_date(date: Option<&str>) -> Result<Option<NaiveDate>> {
    date.map(|date_str| {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
    })
    .transpose()
}

/// Inclusive date bounds from the `--from` / `--to` flags
pub fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange> {
    let range = DateRange {
        start: parse_date(from)?,
        end: parse_date(to)?,
    };
    if let (Some(start), Some(end)) = (range.start, range.end) {
        anyhow::ensure!(start <= end, "--from {} is after --to {}", start, end);
    }
    Ok(range)
}

/// Lobbies from their numeric room ids
pub fn parse_modes(ids: &[u32]) -> Result<Vec<GameMode>> {
    ids.iter()
        .map(|&id| GameMode::from_id(id).with_context(|| format!("Unknown mode id {}", id)))
        .collect()
}

/// Open the record source: an explicit dataset file, or the bundled demo data
pub fn open_source(dataset: Option<&Path>) -> Result<Arc<dyn RecordSource>> {
    match dataset {
        Some(path) => {
            let source = DatasetSource::open(path)
                .with_context(|| format!("Failed to load dataset {}", path.display()))?;
            Ok(Arc::new(source))
        }
        None => Ok(Arc::new(DatasetSource::new(fixtures::demo_dataset()))),
    }
}
