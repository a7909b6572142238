use crate::data::bar::Bar;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Bar sequence is empty")]
    Empty,
    #[error("Malformed bar at index {index}: {source}")]
    MalformedBar {
        index: usize,
        source: crate::data::bar::BarError,
    },
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(default)]
    timestamp: Option<String>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

//loads bars from a headered csv file
//the timestamp column is optional; when present it must be rfc3339 and
//the bars are sorted chronologically after loading
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        //parse timestamp if the column carries one
        let timestamp = match record.timestamp {
            Some(raw) if !raw.is_empty() => {
                let parsed = DateTime::parse_from_rfc3339(&raw)
                    .context(format!(
                        "Failed to parse timestamp '{}' at line {}",
                        raw,
                        index + 2
                    ))?
                    .with_timezone(&Utc);
                Some(parsed)
            }
            _ => None,
        };

        let bar = Bar::new_unchecked(
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
            timestamp,
        );

        bars.push(bar);
    }

    //sort by timestamp to ensure chronological order when stamps exist
    if bars.iter().all(|b| b.timestamp.is_some()) {
        bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    }

    Ok(bars)
}

//rejects an empty or malformed bar sequence before a run starts
pub fn validate_bars(bars: &[Bar]) -> Result<(), DataError> {
    if bars.is_empty() {
        return Err(DataError::Empty);
    }
    for (index, bar) in bars.iter().enumerate() {
        Bar::new(bar.open, bar.high, bar.low, bar.close, bar.volume, bar.timestamp)
            .map_err(|source| DataError::MalformedBar { index, source })?;
    }
    Ok(())
}
