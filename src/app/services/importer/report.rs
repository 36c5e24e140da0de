//! Immutable summary of an import run

use crate::app::services::import_stats::{ImportStats, success_rate, top_skip_reasons};
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Final counters of a run, read by whoever reports on it
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    total_rows: usize,
    attempted_rows: usize,
    processed_rows: usize,
    skipped_rows: usize,
    cancelled_flights: usize,
    diverted_flights: usize,
    unique_airlines: usize,
    unique_airports: usize,
    skip_reasons: HashMap<String, usize>,
    log_path: PathBuf,
    audit_write_failures: usize,
    started_at: DateTime<Local>,
    duration: Duration,
}

impl ImportReport {
    /// Snapshot the run statistics
    pub fn from_stats(
        stats: &ImportStats,
        log_path: &Path,
        started_at: DateTime<Local>,
        duration: Duration,
    ) -> Self {
        Self {
            total_rows: stats.total_rows,
            attempted_rows: stats.attempted_rows,
            processed_rows: stats.processed_rows,
            skipped_rows: stats.skipped_rows,
            cancelled_flights: stats.cancelled_flights,
            diverted_flights: stats.diverted_flights,
            unique_airlines: stats.unique_airlines(),
            unique_airports: stats.unique_airports(),
            skip_reasons: stats.skip_reasons.clone(),
            log_path: log_path.to_path_buf(),
            audit_write_failures: 0,
            started_at,
            duration,
        }
    }

    /// Record how many audit log lines were lost during the run
    pub fn with_audit_write_failures(mut self, failures: usize) -> Self {
        self.audit_write_failures = failures;
        self
    }

    /// Data rows counted by the pre-scan
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn attempted_rows(&self) -> usize {
        self.attempted_rows
    }

    pub fn processed_rows(&self) -> usize {
        self.processed_rows
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn cancelled_flights(&self) -> usize {
        self.cancelled_flights
    }

    pub fn diverted_flights(&self) -> usize {
        self.diverted_flights
    }

    pub fn unique_airlines(&self) -> usize {
        self.unique_airlines
    }

    pub fn unique_airports(&self) -> usize {
        self.unique_airports
    }

    /// Occurrences per skip label
    pub fn skip_reasons(&self) -> &HashMap<String, usize> {
        &self.skip_reasons
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Audit log lines that could not be written
    pub fn audit_write_failures(&self) -> usize {
        self.audit_write_failures
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Processed rows as a percentage of attempted rows
    pub fn success_rate(&self) -> f64 {
        success_rate(self.processed_rows, self.attempted_rows)
    }

    /// Skip labels by descending count, ties broken by label
    pub fn top_skip_reasons(&self, limit: usize) -> Vec<(String, usize)> {
        top_skip_reasons(&self.skip_reasons, limit)
    }
}
