//! CSV export for generated readings.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::SecondsFormat;

use crate::sim::types::Reading;

/// Column header for CSV reading export.
const HEADER: &str = "ts,building_id,channel,volume_m3,t_celsius";

/// Exports readings to a CSV file at the given path.
///
/// Writes a header row followed by one data row per reading. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(readings: &[Reading], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(readings, buf)
}

/// Writes readings as CSV to any writer.
///
/// Timestamps are RFC3339 with second precision, volumes carry three
/// decimals, and a missing temperature becomes an empty field.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(readings: &[Reading], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in readings {
        wtr.write_record(&[
            r.ts.to_rfc3339_opts(SecondsFormat::Secs, true),
            r.building_id.clone(),
            r.channel.as_str().to_string(),
            format!("{:.3}", r.volume_m3),
            r.t_celsius.map_or_else(String::new, |t| format!("{t:.1}")),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
