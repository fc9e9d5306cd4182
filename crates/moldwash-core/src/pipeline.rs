//! The outlier-filtered daily aggregation pipeline.
//!
//! A single deterministic pass: derive timing columns, keep the configured
//! plants and statuses, bucket rows by (plant, status, date), narrow each
//! bucket with the sequential per-column IQR filter, then average what
//! survives. No side effects beyond tracing.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;
use tracing::info;

use crate::config::ReportConfig;
use crate::derive;
use crate::error::{PipelineError, Result};
use crate::outliers;
use crate::schema;
use crate::summary::SummaryRow;

type GroupKey = (String, String, String);

/// Row-aligned duration and job-id columns for one (plant, status, date)
/// bucket. Built once from the filtered frame, never mutated afterwards; the
/// outlier filter narrows an index set instead of rewriting the vectors.
#[derive(Default)]
struct GroupRows {
    job_no: Vec<Option<String>>,
    time_to_wash: Vec<Option<f64>>,
    waiting_in: Vec<Option<f64>>,
    waiting_out: Vec<Option<f64>>,
}

/// Produces one summary row per non-empty (plant, status, date) group,
/// ordered by plant, then status, then date.
///
/// `df` is the canonical job frame as produced by [`crate::ingest`]; the
/// derived timing columns are computed here.
pub fn summarize(df: &DataFrame, config: &ReportConfig) -> Result<Vec<SummaryRow>> {
    ensure_schema(df)?;
    let derived = derive::with_timing_columns(df)?;
    let filtered = apply_allowlists(&derived, config)?;
    let groups = group_rows(&filtered)?;

    let mut rows = Vec::with_capacity(groups.len());
    for ((plant, status, date), group) in groups {
        if let Some(row) = summarize_group(plant, status, date, &group, config.iqr_multiplier) {
            rows.push(row);
        }
    }

    info!(
        rows_in = df.height(),
        rows_after_filter = filtered.height(),
        groups = rows.len(),
        "daily summary computed"
    );

    Ok(rows)
}

fn ensure_schema(df: &DataFrame) -> Result<()> {
    for name in schema::REQUIRED_COLUMNS {
        if df.column(name).is_err() {
            return Err(PipelineError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Keeps rows whose status and plant are both on the configured allow-lists.
/// A null in either column never matches.
fn apply_allowlists(df: &DataFrame, config: &ReportConfig) -> Result<DataFrame> {
    let status = df.column(schema::STATUS)?.str()?;
    let plant = df.column(schema::PLANT)?.str()?;

    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let status_ok = status
            .get(idx)
            .is_some_and(|value| config.status_allowlist.iter().any(|allowed| allowed == value));
        let plant_ok = plant
            .get(idx)
            .is_some_and(|value| config.plant_allowlist.iter().any(|allowed| allowed == value));
        keep.push(status_ok && plant_ok);
    }

    let mask = Series::new("keep".into(), keep);
    Ok(df.filter(mask.bool()?)?)
}

fn group_rows(df: &DataFrame) -> Result<BTreeMap<GroupKey, GroupRows>> {
    let plant = df.column(schema::PLANT)?.str()?;
    let status = df.column(schema::STATUS)?.str()?;
    let date = df.column(schema::DATE)?.str()?;
    let job_no = df.column(schema::JOB_NO)?.str()?;
    let time_to_wash = df.column(schema::TIME_TO_WASH_MIN)?.f64()?;
    let waiting_in = df.column(schema::WAITING_IN_MIN)?.f64()?;
    let waiting_out = df.column(schema::WAITING_OUT_MIN)?.f64()?;

    let mut groups: BTreeMap<GroupKey, GroupRows> = BTreeMap::new();
    for idx in 0..df.height() {
        // A row without an intake date has no daily bucket to land in.
        let (Some(plant), Some(status), Some(date)) =
            (plant.get(idx), status.get(idx), date.get(idx))
        else {
            continue;
        };
        let key = (plant.to_string(), status.to_string(), date.to_string());
        let group = groups.entry(key).or_default();
        group.job_no.push(job_no.get(idx).map(str::to_string));
        group.time_to_wash.push(time_to_wash.get(idx));
        group.waiting_in.push(waiting_in.get(idx));
        group.waiting_out.push(waiting_out.get(idx));
    }
    Ok(groups)
}

/// Applies the three column filters in order, each narrowing the previous
/// step's survivors, then averages the survivors. Returns `None` for a group
/// the filters emptied.
fn summarize_group(
    plant: String,
    status: String,
    date: String,
    group: &GroupRows,
    multiplier: f64,
) -> Option<SummaryRow> {
    let mut survivors: Vec<usize> = (0..group.job_no.len()).collect();
    for column in [&group.time_to_wash, &group.waiting_in, &group.waiting_out] {
        survivors = outliers::retain_within_iqr(column, &survivors, multiplier);
    }
    if survivors.is_empty() {
        return None;
    }

    let distinct_jobs: BTreeSet<&str> = survivors
        .iter()
        .filter_map(|&idx| group.job_no[idx].as_deref())
        .collect();

    Some(SummaryRow {
        plant,
        status,
        date,
        avg_time_to_wash: mean(&group.time_to_wash, &survivors)?,
        avg_waiting_in: mean(&group.waiting_in, &survivors)?,
        avg_waiting_out: mean(&group.waiting_out, &survivors)?,
        mold_count: distinct_jobs.len() as u32,
    })
}

/// Mean over the survivors' known values; unknowns never count as zero.
fn mean(column: &[Option<f64>], survivors: &[usize]) -> Option<f64> {
    let values: Vec<f64> = survivors.iter().filter_map(|&idx| column[idx]).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
