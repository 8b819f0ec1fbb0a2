//! Roster Worker - bulk employee roster importer for the Fleetline platform
//!
//! Parses an uploaded roster file, maps its columns onto the canonical
//! employee fields, normalizes and validates every row, submits the valid
//! batch to the backend and exports created-account credentials as CSV.

mod cli;
mod config;
mod defaults;
mod error;
mod services;
mod session;
mod types;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::services::{credentials, submitter, submitter::SubmitClient};
use crate::session::UploadSession;
use crate::types::{CanonicalField, ColumnMapping};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs directory - use LOGS_DIR env var or default to ./logs
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "./logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "roster-worker.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,roster_worker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect { file } => run_inspect(&file),
        Command::Import {
            file,
            map,
            dry_run,
            credentials_out,
        } => run_import(&file, map, dry_run, &credentials_out).await,
    }
}

/// Read the roster file into a fresh session.
fn load_session(file: &Path) -> Result<UploadSession> {
    let bytes =
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let mut session = UploadSession::new();
    session.load_file(filename, &bytes)?;
    Ok(session)
}

fn run_inspect(file: &Path) -> Result<()> {
    let mut session = load_session(file)?;
    let sheet = session.sheet()?;

    println!("File: {}", file.display());
    println!("Columns ({}): {}", sheet.columns.len(), sheet.columns.join(", "));
    println!("Data rows: {}", sheet.rows.len());
    if sheet.truncated {
        println!(
            "Warning: file exceeded the {} row cap; the overflow was dropped",
            defaults::MAX_UPLOAD_ROWS
        );
    }

    let mapping = session.suggest_mapping()?;
    println!("\nSuggested mapping:");
    for field in CanonicalField::ALL {
        let column = mapping.get(field).unwrap_or("(unmapped)");
        let marker = if field.required() { "*" } else { " " };
        println!("  {}{:<9} -> {}", marker, field.label(), column);
    }

    if mapping.confirm().is_err() {
        println!("\nRequired fields are unmapped; validation skipped.");
        return Ok(());
    }

    session.confirm_mapping(mapping)?;
    println!(
        "\nValidation: {} valid, {} with errors",
        session.valid_records().count(),
        session.invalid_records().count()
    );
    for record in session.invalid_records() {
        if let Some(errors) = session.report().errors_for(&record.client_row_id) {
            // +2 for the header row and 1-based file numbering.
            let file_row = record.source_index + 2;
            for (field, message) in errors {
                println!("  row {}: {}: {}", file_row, field, message);
            }
        }
    }

    Ok(())
}

async fn run_import(
    file: &Path,
    overrides: Vec<(CanonicalField, String)>,
    dry_run: bool,
    credentials_out: &Path,
) -> Result<()> {
    let config = config::Config::from_env()?;
    let mut session = load_session(file)?;

    let mut mapping = session.suggest_mapping()?;
    apply_overrides(&mut mapping, overrides);
    session.confirm_mapping(mapping)?;

    info!(
        "normalized {} rows ({} valid, {} invalid)",
        session.records().len(),
        session.valid_records().count(),
        session.invalid_records().count()
    );
    session.ensure_submittable()?;

    if dry_run {
        let payloads = submitter::build_payloads(session.records());
        let size = submitter::check_payload_size(&payloads, config.max_payload_bytes)?;
        println!(
            "Dry run: {} records, {} byte payload (cap {}), nothing submitted",
            payloads.len(),
            size,
            config.max_payload_bytes
        );
        return Ok(());
    }

    let api_url = config
        .api_url
        .clone()
        .context("ROSTER_API_URL must be set for a live import")?;
    let client = SubmitClient::new(api_url, config.max_payload_bytes);
    let outcome = session.submit(&client).await?;

    println!(
        "Created {} employee(s), {} row error(s) at {}",
        outcome.result.created_count,
        outcome.result.error_count,
        outcome.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for row_error in &outcome.result.errors {
        match &row_error.field {
            Some(field) => println!("  row {}: {} ({})", row_error.index, row_error.error, field),
            None => println!("  row {}: {}", row_error.index, row_error.error),
        }
    }

    if !outcome.credentials.is_empty() {
        credentials::export_credentials_file(credentials_out, &outcome.credentials)?;
        println!("Credentials written to {}", credentials_out.display());
    }

    Ok(())
}

fn apply_overrides(mapping: &mut ColumnMapping, overrides: Vec<(CanonicalField, String)>) {
    for (field, column) in overrides {
        mapping.set(field, column);
    }
}
