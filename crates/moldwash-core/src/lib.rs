pub mod config;
pub mod derive;
pub mod error;
pub mod ingest;
pub mod outliers;
pub mod pipeline;
pub mod schema;
pub mod summary;

pub use config::ReportConfig;
pub use error::{PipelineError, Result};
pub use pipeline::summarize;
pub use summary::SummaryRow;

#[cfg(test)]
mod tests;
