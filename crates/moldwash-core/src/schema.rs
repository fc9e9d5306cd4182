//! Column-name contract for the mold-washing job table.
//!
//! The raw spreadsheet headers are case-preserving and fixed; everything past
//! ingestion works on the canonical snake_case names.

pub const JOB_NO: &str = "job_no";
pub const PLANT: &str = "plant";
pub const STATUS: &str = "status";
pub const START_WASHING: &str = "start_washing";
pub const FINISH_WASHING: &str = "finish_washing";
pub const TAKE_IN: &str = "take_in";
pub const TAKE_OUT: &str = "take_out";

pub const TIME_TO_WASH_MIN: &str = "time_to_wash_min";
pub const WAITING_IN_MIN: &str = "waiting_in_min";
pub const WAITING_OUT_MIN: &str = "waiting_out_min";
pub const DATE: &str = "date";

/// Raw header paired with its canonical column name, in table order.
pub const RAW_TO_CANONICAL: [(&str, &str); 7] = [
    ("JOB NO", JOB_NO),
    ("PLANT", PLANT),
    ("STATUS", STATUS),
    ("START WASHING DATE", START_WASHING),
    ("FINISH WASHING DATETIME", FINISH_WASHING),
    ("TAKE IN DATETIME", TAKE_IN),
    ("TAKE OUT DATETIME", TAKE_OUT),
];

pub const TIMESTAMP_COLUMNS: [&str; 4] = [START_WASHING, FINISH_WASHING, TAKE_IN, TAKE_OUT];

/// Duration columns in the order the per-group outlier filter narrows them.
pub const DURATION_COLUMNS: [&str; 3] = [TIME_TO_WASH_MIN, WAITING_IN_MIN, WAITING_OUT_MIN];

/// Canonical columns the pipeline requires on its input frame.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    JOB_NO,
    PLANT,
    STATUS,
    START_WASHING,
    FINISH_WASHING,
    TAKE_IN,
    TAKE_OUT,
];
