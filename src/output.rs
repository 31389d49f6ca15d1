//! CSV export of the joined county data, for inspection outside the chart.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use tracing::debug;

use crate::model::JoinedCounty;

/// Appends the joined counties to a CSV file, one row per county.
///
/// Creates the file with headers if it does not already exist.
pub fn export_joined(path: &str, joined: &[JoinedCounty]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = joined.len(), "writing joined CSV");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for county in joined {
        writer.serialize(county)?;
    }
    writer.flush()?;

    Ok(())
}
