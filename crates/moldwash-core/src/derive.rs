use chrono::DateTime;
use polars::prelude::*;

use crate::schema;

const MICROS_PER_MINUTE: f64 = 60.0 * 1_000_000.0;

/// Appends the three elapsed-time columns (minutes) and the intake calendar
/// date used for daily grouping. A null operand yields a null result; negative
/// elapsed times pass through as signed values.
pub fn with_timing_columns(df: &DataFrame) -> Result<DataFrame, PolarsError> {
    let len = df.height();
    let start = df.column(schema::START_WASHING)?.datetime()?;
    let finish = df.column(schema::FINISH_WASHING)?.datetime()?;
    let take_in = df.column(schema::TAKE_IN)?.datetime()?;
    let take_out = df.column(schema::TAKE_OUT)?.datetime()?;

    let mut time_to_wash: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut waiting_in: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut waiting_out: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut date: Vec<Option<String>> = Vec::with_capacity(len);

    for idx in 0..len {
        time_to_wash.push(minutes_between(start.get(idx), finish.get(idx)));
        waiting_in.push(minutes_between(take_in.get(idx), start.get(idx)));
        waiting_out.push(minutes_between(finish.get(idx), take_out.get(idx)));
        date.push(take_in.get(idx).and_then(intake_date));
    }

    let mut output = df.clone();
    output.hstack_mut(&mut [
        Series::new(schema::TIME_TO_WASH_MIN.into(), time_to_wash).into(),
        Series::new(schema::WAITING_IN_MIN.into(), waiting_in).into(),
        Series::new(schema::WAITING_OUT_MIN.into(), waiting_out).into(),
        Series::new(schema::DATE.into(), date).into(),
    ])?;

    Ok(output)
}

fn minutes_between(from: Option<i64>, to: Option<i64>) -> Option<f64> {
    match (from, to) {
        (Some(from), Some(to)) => Some((to - from) as f64 / MICROS_PER_MINUTE),
        _ => None,
    }
}

fn intake_date(micros: i64) -> Option<String> {
    DateTime::from_timestamp_micros(micros)
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
}
