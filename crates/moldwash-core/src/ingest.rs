//! Reads a raw job-table CSV into the canonical DataFrame.
//!
//! Timestamps that fail to parse become null rather than aborting the run; a
//! missing header is fatal because the schema of the rest of the table cannot
//! be trusted.

use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use polars::prelude::*;
use tracing::warn;

use crate::error::{PipelineError, Result};
use crate::schema;

static TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

pub fn read_jobs_csv<R: Read>(reader: R) -> Result<DataFrame> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut indices = Vec::with_capacity(schema::RAW_TO_CANONICAL.len());
    for (raw, _) in schema::RAW_TO_CANONICAL {
        let idx = headers
            .iter()
            .position(|header| header.trim() == raw)
            .ok_or_else(|| PipelineError::MissingColumn(raw.to_string()))?;
        indices.push(idx);
    }

    let mut job_no: Vec<Option<String>> = Vec::new();
    let mut plant: Vec<Option<String>> = Vec::new();
    let mut status: Vec<Option<String>> = Vec::new();
    let mut timestamps: [Vec<Option<i64>>; 4] = Default::default();
    let mut unparseable = [0usize; 4];

    for record in csv_reader.records() {
        let record = record?;
        job_no.push(clean_optional(record.get(indices[0])));
        plant.push(clean_optional(record.get(indices[1])));
        status.push(clean_optional(record.get(indices[2])));
        for (slot, column) in timestamps.iter_mut().enumerate() {
            let raw = record.get(indices[3 + slot]).unwrap_or("");
            let parsed = parse_timestamp(raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                unparseable[slot] += 1;
            }
            column.push(parsed);
        }
    }

    for (slot, name) in schema::TIMESTAMP_COLUMNS.into_iter().enumerate() {
        if unparseable[slot] > 0 {
            warn!(
                column = name,
                count = unparseable[slot],
                "timestamps failed to parse and were nulled"
            );
        }
    }

    let mut cols: Vec<Column> = vec![
        Series::new(schema::JOB_NO.into(), job_no).into(),
        Series::new(schema::PLANT.into(), plant).into(),
        Series::new(schema::STATUS.into(), status).into(),
    ];
    for (name, values) in schema::TIMESTAMP_COLUMNS.iter().zip(timestamps) {
        let series = Series::new((*name).into(), values)
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
        cols.push(series.into());
    }

    Ok(DataFrame::new(cols)?)
}

fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

/// Timezone-naive parse into epoch microseconds. Bare dates land on midnight.
fn parse_timestamp(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.and_utc().timestamp_micros());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc().timestamp_micros())
}
