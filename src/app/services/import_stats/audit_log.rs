//! Durable per-run audit log
//!
//! One plain-text file per run, named after the run's start time. Every line
//! is flushed as soon as it is written so the log survives a run that fails
//! part way through.
//!
//! Only creating the log can fail a run. Once it exists, a line that cannot
//! be written is reported through `tracing` and counted, and the run goes on.

use super::stats::ImportStats;
use crate::app::models::SkipReason;
use crate::constants::{AUDIT_LOG_PREFIX, AUDIT_LOG_TIMESTAMP_FORMAT, TOP_SKIP_REASONS};
use crate::{Error, Result};
use chrono::{DateTime, Local};
use std::error::Error as StdError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const RULE: &str = "----------------------------------------";
const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only anomaly log for a single import run
pub struct AuditLog {
    path: PathBuf,
    writer: Box<dyn Write>,
    failed_writes: usize,
}

impl AuditLog {
    /// Log file location for a run started at `started_at`
    pub fn path_for(log_dir: &Path, started_at: &DateTime<Local>) -> PathBuf {
        log_dir.join(format!(
            "{}{}.log",
            AUDIT_LOG_PREFIX,
            started_at.format(AUDIT_LOG_TIMESTAMP_FORMAT)
        ))
    }

    /// Create the log directory and file and write the start banner
    pub fn create(log_dir: &Path, started_at: &DateTime<Local>) -> Result<Self> {
        fs::create_dir_all(log_dir).map_err(|e| {
            Error::io(
                format!("Failed to create log directory {}", log_dir.display()),
                e,
            )
        })?;

        let path = Self::path_for(log_dir, started_at);
        let file = File::create(&path).map_err(|e| {
            Error::io(format!("Failed to create audit log {}", path.display()), e)
        })?;

        let mut log = Self::from_writer(path, BufWriter::new(file));
        log.try_write_line(&format!(
            "Import log started at {}",
            started_at.format(DISPLAY_TIMESTAMP_FORMAT)
        ))?;
        log.try_write_line(RULE)?;

        debug!("Audit log created at {}", log.path.display());
        Ok(log)
    }

    /// Log over an already open sink; `path` is only reported, never opened
    pub fn from_writer(path: PathBuf, writer: impl Write + 'static) -> Self {
        Self {
            path,
            writer: Box::new(writer),
            failed_writes: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines that could not be written since the log was created
    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    pub fn record_source(&mut self, file: &Path, total_rows: usize) {
        self.write_line(&format!(
            "Source file: {} ({} data rows)",
            file.display(),
            total_rows
        ))
    }

    pub fn record_columns(&mut self, headers: &[String]) {
        self.write_line(&format!("Detected columns: {}", headers.join(", ")))
    }

    /// Note essential columns the header lacks; rows will fall back to blanks
    pub fn record_missing_columns(&mut self, missing: &[&str]) {
        if missing.is_empty() {
            return;
        }
        self.write_line(&format!("Missing expected columns: {}", missing.join(", ")))
    }

    pub fn record_skip(&mut self, line_number: usize, reason: &SkipReason) {
        self.write_line(&format!("Line {}: Skipped - {}", line_number, reason))
    }

    pub fn record_warning(&mut self, line_number: usize, message: &str) {
        self.write_line(&format!("Line {}: Warning - {}", line_number, message))
    }

    /// Unexpected row failure, with its full cause chain
    pub fn record_error(&mut self, line_number: usize, error: &Error) {
        self.write_line(&format!(
            "Line {}: Error ({}) - {}",
            line_number,
            error.kind(),
            error
        ));
        self.write_causes(error);
    }

    pub fn record_progress(&mut self, stats: &ImportStats) {
        self.write_line(&format!(
            "[{}] Progress: {} processed, {} skipped, {} of {} rows attempted",
            Local::now().format(DISPLAY_TIMESTAMP_FORMAT),
            stats.processed_rows,
            stats.skipped_rows,
            stats.attempted_rows,
            stats.total_rows
        ))
    }

    /// Final summary block
    pub fn record_summary(
        &mut self,
        stats: &ImportStats,
        finished_at: &DateTime<Local>,
    ) {
        self.write_line("");
        self.write_line(RULE);
        self.write_line(&format!(
            "Import completed at {}",
            finished_at.format(DISPLAY_TIMESTAMP_FORMAT)
        ));
        self.write_line(&format!("Total rows in file: {}", stats.total_rows));
        self.write_line(&format!("Attempted rows: {}", stats.attempted_rows));
        self.write_line(&format!("Processed rows: {}", stats.processed_rows));
        self.write_line(&format!("Skipped rows: {}", stats.skipped_rows));
        self.write_line(&format!("Cancelled flights: {}", stats.cancelled_flights));
        self.write_line(&format!("Diverted flights: {}", stats.diverted_flights));
        self.write_line(&format!("Success rate: {:.2}%", stats.success_rate()));

        self.write_line("");
        self.write_line("Skip reasons:");
        for (label, count) in stats.top_skip_reasons(TOP_SKIP_REASONS) {
            self.write_line(&format!("  {}: {}", label, count));
        }

        self.write_line("");
        self.write_line(&format!("Unique airlines: {}", stats.unique_airlines()));
        self.write_line(&format!("Unique airports: {}", stats.unique_airports()))
    }

    /// Fatal failure that ended the run early
    pub fn record_abort(&mut self, stats: &ImportStats, error: &Error) {
        self.write_line("");
        self.write_line(RULE);
        self.write_line(&format!(
            "Import aborted at {} after {} attempted rows: {}",
            Local::now().format(DISPLAY_TIMESTAMP_FORMAT),
            stats.attempted_rows,
            error
        ));
        self.write_causes(error);
    }

    fn write_causes(&mut self, error: &Error) {
        let mut source = StdError::source(error);
        while let Some(cause) = source {
            self.write_line(&format!("    caused by: {}", cause));
            source = StdError::source(cause);
        }
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = self.try_write_line(line) {
            self.failed_writes += 1;
            warn!("{}", e);
        }
    }

    fn try_write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| {
                Error::io(
                    format!("Failed to write audit log {}", self.path.display()),
                    e,
                )
            })
    }
}
