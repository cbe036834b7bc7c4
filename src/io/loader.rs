//! CSV ingest for the three input series (prices, PV output, load).
//!
//! Input files are `timestamp,value` CSVs with a header row; only the last
//! column is read. Sub-hourly series are averaged down to hourly means
//! before normalization.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a numeric series from a CSV file, taking the last column of every
/// record after the header.
pub fn read_series(path: &Path) -> Result<Vec<f64>> {
    let file =
        File::open(path).with_context(|| format!("cannot open \"{}\"", path.display()))?;
    read_series_from(file).with_context(|| format!("cannot parse \"{}\"", path.display()))
}

/// Reads a numeric series from any reader (CSV with header row).
pub fn read_series_from(reader: impl Read) -> Result<Vec<f64>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut values = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("malformed CSV record {}", i + 1))?;
        let field = record
            .iter()
            .last()
            .with_context(|| format!("empty CSV record {}", i + 1))?;
        let value: f64 = field
            .trim()
            .replace(',', ".")
            .parse()
            .with_context(|| format!("record {}: \"{}\" is not a number", i + 1, field))?;
        values.push(value);
    }
    Ok(values)
}

/// Averages fixed-size groups of sub-hourly samples into hourly means.
/// A trailing partial group is averaged over its actual length.
/// `samples_per_hour == 1` returns the series unchanged.
pub fn aggregate_hourly(values: &[f64], samples_per_hour: usize) -> Vec<f64> {
    assert!(samples_per_hour > 0, "samples_per_hour must be positive");
    if samples_per_hour == 1 {
        return values.to_vec();
    }
    values
        .chunks(samples_per_hour)
        .map(|chunk| chunk.iter().sum::<f64>() / chunk.len() as f64)
        .collect()
}

/// Hour offset of Feb 28 00:00 in a non-leap-year hourly series (58 days).
const FEB_28_START: usize = 1344;
/// Hour offset where Feb 29 would begin.
const FEB_29_START: usize = 1368;

/// Patches a non-leap-year load profile for a leap year by repeating the
/// 24 hours of Feb 28 as Feb 29. Price and PV data for a leap year already
/// contain the extra day; the standard load profile does not.
pub fn insert_leap_day(load: Vec<f64>) -> Result<Vec<f64>> {
    if load.len() < FEB_29_START {
        bail!(
            "load profile too short for leap-day insertion: {} hours, need at least {}",
            load.len(),
            FEB_29_START
        );
    }
    let mut patched = Vec::with_capacity(load.len() + 24);
    patched.extend_from_slice(&load[..FEB_29_START]);
    patched.extend_from_slice(&load[FEB_28_START..FEB_29_START]);
    patched.extend_from_slice(&load[FEB_29_START..]);
    Ok(patched)
}
