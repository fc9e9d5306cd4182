use std::fs;
use std::path::PathBuf;

use crate::config::ReportConfig;
use crate::error::PipelineError;
use crate::ingest::read_jobs_csv;
use crate::pipeline::summarize;
use crate::summary::{self, SummaryRow};

fn fixture(path: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

fn summarize_csv(raw: &str) -> Vec<SummaryRow> {
    let df = read_jobs_csv(raw.as_bytes()).expect("ingest failed");
    summarize(&df, &ReportConfig::default()).expect("pipeline failed")
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn summarizes_sample_jobs_end_to_end() {
    let rows = summarize_csv(&fixture("jobs_sample.csv"));

    assert_eq!(rows.len(), 2);

    let urgent = &rows[0];
    assert_eq!(
        (urgent.plant.as_str(), urgent.status.as_str(), urgent.date.as_str()),
        ("OS1", "Urgent", "2024-03-01")
    );
    // J1 appears twice: one distinct job, averaged over both rows.
    assert_eq!(urgent.mold_count, 1);
    assert!(close(urgent.avg_time_to_wash, 11.0));
    assert!(close(urgent.avg_waiting_in, 30.0));
    assert!(close(urgent.avg_waiting_out, 20.0));

    let spear = &rows[1];
    assert_eq!(
        (spear.plant.as_str(), spear.status.as_str(), spear.date.as_str()),
        ("OS2-2", "Spear", "2024-03-01")
    );
    // The 100-minute wash is an IQR outlier among [10, 11, 12, 100].
    assert_eq!(spear.mold_count, 3);
    assert!(close(spear.avg_time_to_wash, 11.0));
    assert!(close(spear.avg_waiting_in, 60.0));
    assert!(close(spear.avg_waiting_out, 30.0));
}

#[test]
fn disallowed_status_and_plant_never_reach_the_output() {
    let rows = summarize_csv(&fixture("jobs_sample.csv"));
    for row in &rows {
        assert_ne!(row.status, "Cancelled");
        assert_ne!(row.plant, "OS9");
        // J4's only row lost every duration to an unparseable timestamp, so
        // its group empties out as well.
        assert_ne!(row.plant, "OS2-1");
    }
}

#[test]
fn mean_ignores_unknown_durations() {
    let raw = "\
JOB NO,PLANT,STATUS,START WASHING DATE,FINISH WASHING DATETIME,TAKE IN DATETIME,TAKE OUT DATETIME
J1,OS1,Urgent,2024-03-01 08:00:00,2024-03-01 08:30:00,2024-03-01 07:30:00,2024-03-01 09:00:00
JX,OS1,Urgent,2024-03-01 08:00:00,broken,2024-03-01 07:30:00,2024-03-01 09:00:00
";
    let rows = summarize_csv(raw);
    assert_eq!(rows.len(), 1);
    assert!(close(rows[0].avg_time_to_wash, 30.0));
    assert_eq!(rows[0].mold_count, 1);
}

#[test]
fn negative_durations_are_reported_as_signed_values() {
    let raw = "\
JOB NO,PLANT,STATUS,START WASHING DATE,FINISH WASHING DATETIME,TAKE IN DATETIME,TAKE OUT DATETIME
J1,OS1,Return,2024-03-01 09:00:00,2024-03-01 08:30:00,2024-03-01 08:00:00,2024-03-01 09:30:00
";
    let rows = summarize_csv(raw);
    assert_eq!(rows.len(), 1);
    assert!(close(rows[0].avg_time_to_wash, -30.0));
    assert!(close(rows[0].avg_waiting_in, 60.0));
    assert!(close(rows[0].avg_waiting_out, 60.0));
}

#[test]
fn empty_result_after_filtering_is_not_an_error() {
    let raw = "\
JOB NO,PLANT,STATUS,START WASHING DATE,FINISH WASHING DATETIME,TAKE IN DATETIME,TAKE OUT DATETIME
J1,OS1,Cancelled,2024-03-01 08:00:00,2024-03-01 08:30:00,2024-03-01 07:30:00,2024-03-01 09:00:00
";
    let rows = summarize_csv(raw);
    assert!(rows.is_empty());
}

#[test]
fn allowlists_come_from_the_config_not_the_code() {
    let raw = "\
JOB NO,PLANT,STATUS,START WASHING DATE,FINISH WASHING DATETIME,TAKE IN DATETIME,TAKE OUT DATETIME
J1,OS7,Rework,2024-03-01 08:00:00,2024-03-01 08:30:00,2024-03-01 07:30:00,2024-03-01 09:00:00
";
    let df = read_jobs_csv(raw.as_bytes()).unwrap();
    let config = ReportConfig {
        status_allowlist: vec!["Rework".to_string()],
        plant_allowlist: vec!["OS7".to_string()],
        iqr_multiplier: 1.5,
    };
    let rows = summarize(&df, &config).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].plant, "OS7");
}

#[test]
fn missing_required_column_fails_the_run() {
    let raw = "JOB NO,PLANT,START WASHING DATE,FINISH WASHING DATETIME,TAKE IN DATETIME,TAKE OUT DATETIME\n";
    let err = read_jobs_csv(raw.as_bytes()).unwrap_err();
    assert!(matches!(err, PipelineError::MissingColumn(column) if column == "STATUS"));
}

#[test]
fn csv_round_trip_preserves_groups_and_rounded_means() {
    let rows = summarize_csv(&fixture("jobs_sample.csv"));

    let mut buffer = Vec::new();
    summary::write_csv(&mut buffer, &rows).unwrap();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(buffer.as_slice());
    let parsed: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

    assert_eq!(parsed.len(), rows.len());
    for (record, row) in parsed.iter().zip(&rows) {
        assert_eq!(&record[0], row.plant.as_str());
        assert_eq!(&record[1], row.status.as_str());
        assert_eq!(&record[2], row.date.as_str());
        assert_eq!(record[6].parse::<u32>().unwrap(), row.mold_count);

        let reparsed: f64 = record[3].parse().unwrap();
        assert!((reparsed - row.avg_time_to_wash).abs() < 0.005);
        let reparsed: f64 = record[4].parse().unwrap();
        assert!((reparsed - row.avg_waiting_in).abs() < 0.005);
        let reparsed: f64 = record[5].parse().unwrap();
        assert!((reparsed - row.avg_waiting_out).abs() < 0.005);
    }
}
