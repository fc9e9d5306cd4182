use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Tunable report parameters. A value of this type is passed into the
/// pipeline entry point; nothing in the pipeline reads process-wide state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Statuses that participate in the daily summary.
    pub status_allowlist: Vec<String>,
    /// Plants that participate in the daily summary.
    pub plant_allowlist: Vec<String>,
    /// Width of the IQR acceptance range, in multiples of Q3 - Q1.
    pub iqr_multiplier: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            status_allowlist: vec![
                "Send to production line".to_string(),
                "Urgent".to_string(),
                "Spear".to_string(),
                "Return".to_string(),
            ],
            plant_allowlist: vec![
                "OS1".to_string(),
                "OS2-1".to_string(),
                "OS2-2".to_string(),
            ],
            iqr_multiplier: 1.5,
        }
    }
}

impl ReportConfig {
    /// Parses a TOML override file; absent fields keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}
