// crates/moldwash-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config file error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Input table is missing required column '{0}'")]
    MissingColumn(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
