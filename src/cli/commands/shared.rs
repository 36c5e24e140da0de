//! Shared components for CLI commands
//!
//! Logging setup, human-readable formatting and the run summary printer.

use crate::ImportReport;
use crate::constants::TOP_SKIP_REASONS;
use anyhow::{Context, Result};
use colored::*;
use std::time::Duration;
use tracing::debug;

/// Set up structured logging on stderr
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `log_level`.
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flight_importer={}", log_level)));

    if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Byte count in B, KB, MB, GB or TB
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Whole seconds as `1h 2m 3s`, `2m 3s` or `3s`
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Print the summary of a finished or aborted run
pub fn print_import_summary(report: &ImportReport, completed: bool) {
    if completed {
        println!("\n{}", "Import complete".green().bold());
    } else {
        println!("\n{}", "Import aborted".red().bold());
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   • Duration: {}", format_duration(report.duration()));
    println!("   • Total rows in file: {}", report.total_rows());
    println!("   • Attempted rows: {}", report.attempted_rows());
    println!(
        "   • Processed rows: {}",
        report.processed_rows().to_string().green()
    );

    let skipped = report.skipped_rows().to_string();
    if report.skipped_rows() > 0 {
        println!("   • Skipped rows: {}", skipped.yellow());
    } else {
        println!("   • Skipped rows: {}", skipped);
    }

    println!("   • Success rate: {:.2}%", report.success_rate());
    println!("   • Cancelled flights: {}", report.cancelled_flights());
    println!("   • Diverted flights: {}", report.diverted_flights());
    println!("   • Unique airlines: {}", report.unique_airlines());
    println!("   • Unique airports: {}", report.unique_airports());

    let reasons = report.top_skip_reasons(TOP_SKIP_REASONS);
    if !reasons.is_empty() {
        println!("\n{}", "Skip reasons:".bold());
        for (label, count) in reasons {
            println!("   • {}: {}", label, count);
        }
    }

    println!(
        "\nAudit log saved to: {}",
        report.log_path().display().to_string().cyan()
    );
    if report.audit_write_failures() > 0 {
        println!(
            "{}",
            format!(
                "   {} lines could not be written to the audit log",
                report.audit_write_failures()
            )
            .yellow()
        );
    }
    println!();
}
