use std::io::Write;

use polars::prelude::*;

/// One aggregated row per (plant, status, date) group.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub plant: String,
    pub status: String,
    pub date: String,
    /// Mean wash duration in minutes over the group's outlier-free rows.
    pub avg_time_to_wash: f64,
    pub avg_waiting_in: f64,
    pub avg_waiting_out: f64,
    /// Distinct job identifiers among survivors, not the row count.
    pub mold_count: u32,
}

/// Export header, matching the downloadable report of the original tool.
pub const CSV_HEADER: [&str; 7] = [
    "PLANT",
    "STATUS",
    "Date",
    "avg_time_to_wash",
    "avg_waiting_in",
    "avg_waiting_out",
    "mold_count",
];

/// Writes the summary as UTF-8 CSV: header row, comma separated, quoting only
/// where needed, no index column, means to two decimal places.
pub fn write_csv<W: Write>(writer: W, rows: &[SummaryRow]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for row in rows {
        csv_writer.write_record(&[
            row.plant.clone(),
            row.status.clone(),
            row.date.clone(),
            format!("{:.2}", row.avg_time_to_wash),
            format!("{:.2}", row.avg_waiting_in),
            format!("{:.2}", row.avg_waiting_out),
            row.mold_count.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Summary as a DataFrame for programmatic consumers.
pub fn to_dataframe(rows: &[SummaryRow]) -> PolarsResult<DataFrame> {
    let plant: Vec<&str> = rows.iter().map(|row| row.plant.as_str()).collect();
    let status: Vec<&str> = rows.iter().map(|row| row.status.as_str()).collect();
    let date: Vec<&str> = rows.iter().map(|row| row.date.as_str()).collect();
    let avg_time_to_wash: Vec<f64> = rows.iter().map(|row| row.avg_time_to_wash).collect();
    let avg_waiting_in: Vec<f64> = rows.iter().map(|row| row.avg_waiting_in).collect();
    let avg_waiting_out: Vec<f64> = rows.iter().map(|row| row.avg_waiting_out).collect();
    let mold_count: Vec<u32> = rows.iter().map(|row| row.mold_count).collect();

    DataFrame::new(vec![
        Series::new("plant".into(), plant).into(),
        Series::new("status".into(), status).into(),
        Series::new("date".into(), date).into(),
        Series::new("avg_time_to_wash".into(), avg_time_to_wash).into(),
        Series::new("avg_waiting_in".into(), avg_waiting_in).into(),
        Series::new("avg_waiting_out".into(), avg_waiting_out).into(),
        Series::new("mold_count".into(), mold_count).into(),
    ])
}
