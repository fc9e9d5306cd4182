use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use moldwash_core::{ingest, pipeline, schema, summary, ReportConfig, SummaryRow};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Daily mold-washing timing report
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate a job table into the per-plant daily summary
    Summarize(SummarizeArgs),
    /// Check a job table against the expected schema
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    /// Path to the job table CSV
    #[arg(short, long)]
    input: PathBuf,

    /// TOML file overriding the allow-lists or the IQR multiplier
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the summary as CSV to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Path to the job table CSV
    #[arg(short, long)]
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Summarize(args) => run_summarize(args),
        Command::Validate(args) => run_validate(args),
    }
}

fn run_summarize(args: SummarizeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ReportConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ReportConfig::default(),
    };

    let file = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let jobs = ingest::read_jobs_csv(file)?;
    let rows = pipeline::summarize(&jobs, &config)?;

    if rows.is_empty() {
        println!("No jobs matched the configured plants and statuses.");
    } else {
        println!("{}", render_table(&rows));
    }

    if let Some(path) = &args.output {
        let out = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        summary::write_csv(out, &rows)?;
        info!(path = %path.display(), rows = rows.len(), "summary exported");
    }

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let jobs = ingest::read_jobs_csv(file)
        .with_context(|| format!("{} does not match the job table schema", args.input.display()))?;

    println!("Schema OK: {} data row(s).", jobs.height());
    for name in schema::TIMESTAMP_COLUMNS {
        let nulls = jobs.column(name)?.null_count();
        if nulls > 0 {
            println!("  {name}: {nulls} missing or unparseable timestamp(s)");
        }
    }
    Ok(())
}

fn render_table(rows: &[SummaryRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(summary::CSV_HEADER.to_vec());
    for row in rows {
        table.add_row(vec![
            row.plant.clone(),
            row.status.clone(),
            row.date.clone(),
            format!("{:.2}", row.avg_time_to_wash),
            format!("{:.2}", row.avg_waiting_in),
            format!("{:.2}", row.avg_waiting_out),
            row.mold_count.to_string(),
        ]);
    }
    table
}
