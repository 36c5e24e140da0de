//! Import orchestration
//!
//! Drives one run over a CSV extract: a pre-scan counts the data rows, the
//! header is mapped once, and every data row then goes through
//! parse → identify → complete → write, with its outcome counted and any
//! anomaly written to the audit log. Row-level problems never stop the run;
//! only setup failures, read failures and failed commits do.

use super::progress::ImportProgress;
use super::report::ImportReport;
use crate::app::models::SkipReason;
use crate::app::services::flight_csv_parser::{ColumnMapping, RecordNormalizer, parse_line};
use crate::app::services::flight_store::{FlightWrite, FlightWriter};
use crate::app::services::import_stats::{AuditLog, ImportStats};
use crate::config::ImportConfig;
use crate::{Error, Result};
use chrono::{DateTime, Local};
use rusqlite::Connection;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Attempted rows between progress bar refreshes
const PROGRESS_REFRESH_ROWS: usize = 250;

/// What happened to one data row
#[derive(Debug)]
pub enum RowOutcome {
    /// Flight written to the open batch
    Inserted,
    /// Row rejected with an expected reason
    Skipped(SkipReason),
    /// Row failed in a way no skip reason anticipates
    Failed(Error),
}

/// Loads flight CSV extracts into the store behind `conn`
///
/// The schema must already exist; see
/// [`create_schema`](crate::app::services::flight_store::create_schema).
pub struct CsvImporter<'conn> {
    conn: &'conn Connection,
    config: ImportConfig,
}

impl<'conn> CsvImporter<'conn> {
    pub fn new(conn: &'conn Connection, config: ImportConfig) -> Self {
        Self { conn, config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import one CSV file
    ///
    /// Failures before row processing starts (configuration, missing file,
    /// audit log creation, missing header) are returned as they are. A
    /// failure once rows are being processed comes back as
    /// [`Error::ImportAborted`] carrying the statistics gathered so far.
    pub fn import(&self, csv_path: &Path) -> Result<ImportReport> {
        self.config.validate()?;
        if !csv_path.is_file() {
            return Err(Error::file_not_found(csv_path.display().to_string()));
        }

        let started_at = Local::now();
        let timer = Instant::now();

        let total_rows = count_data_rows(csv_path)?;
        info!(
            "Starting import of {} ({} data rows)",
            csv_path.display(),
            total_rows
        );

        let audit = AuditLog::create(&self.config.log_dir, &started_at)?;
        self.import_with_log(csv_path, total_rows, audit, started_at, timer)
    }

    /// Run the import against an already created audit log
    pub(crate) fn import_with_log(
        &self,
        csv_path: &Path,
        total_rows: usize,
        mut audit: AuditLog,
        started_at: DateTime<Local>,
        timer: Instant,
    ) -> Result<ImportReport> {
        audit.record_source(csv_path, total_rows);

        let mut reader = open_reader(csv_path)?;
        let mut buffer = Vec::new();
        let header = read_line(&mut reader, &mut buffer)
            .map_err(|e| Error::io(format!("Failed to read header of {}", csv_path.display()), e))?
            .ok_or_else(|| Error::missing_header(csv_path.display().to_string()))?;

        let header_fields = parse_line(header.trim_start_matches('\u{feff}'));
        let mapping = ColumnMapping::from_header(&header_fields);
        debug!(
            "Header has {} columns, rows need at least {}",
            mapping.column_count(),
            mapping.min_required_columns()
        );
        audit.record_columns(&mapping.headers);
        let missing = mapping.missing_essential_columns();
        if !missing.is_empty() {
            warn!("Header lacks expected columns: {}", missing.join(", "));
            audit.record_missing_columns(&missing);
        }

        let mut stats = ImportStats::new(total_rows);
        let progress = if self.config.show_progress {
            ImportProgress::new(total_rows)
        } else {
            ImportProgress::disabled()
        };

        if let Err(error) = self.process_rows(
            &mut reader,
            &mut buffer,
            &mapping,
            &mut audit,
            &mut stats,
            &progress,
        ) {
            warn!("Import aborted: {}", error);
            progress.finish_with_error(&error.to_string());
            audit.record_abort(&stats, &error);
            let report =
                ImportReport::from_stats(&stats, audit.path(), started_at, timer.elapsed())
                    .with_audit_write_failures(audit.failed_writes());
            return Err(Error::import_aborted(report, error));
        }

        progress.finish(&stats);
        let report = ImportReport::from_stats(&stats, audit.path(), started_at, timer.elapsed())
            .with_audit_write_failures(audit.failed_writes());
        if report.audit_write_failures() > 0 {
            warn!(
                "{} lines could not be written to the audit log {}",
                report.audit_write_failures(),
                report.log_path().display()
            );
        }
        info!(
            "Import complete: {} processed, {} skipped of {} attempted rows in {:.1}s",
            report.processed_rows(),
            report.skipped_rows(),
            report.attempted_rows(),
            report.duration().as_secs_f64()
        );
        Ok(report)
    }

    fn process_rows<R: BufRead>(
        &self,
        reader: &mut R,
        buffer: &mut Vec<u8>,
        mapping: &ColumnMapping,
        audit: &mut AuditLog,
        stats: &mut ImportStats,
        progress: &ImportProgress,
    ) -> Result<()> {
        let normalizer = RecordNormalizer::new(mapping);
        let mut writer = FlightWriter::new(self.conn, self.config.batch_size);
        let mut warnings = Vec::new();
        // Header is line 1
        let mut line_number = 1;

        while let Some(line) =
            read_line(reader, buffer).map_err(|e| Error::io("Failed to read data row", e))?
        {
            line_number += 1;
            stats.record_attempt();

            let outcome = process_row(&line, &normalizer, &mut writer, stats, &mut warnings);

            match outcome {
                RowOutcome::Inserted => {
                    stats.record_processed();
                    writer.complete_row()?;
                    if stats.processed_rows % self.config.progress_interval == 0 {
                        info!(
                            "Processed {} rows ({} attempted of {})",
                            stats.processed_rows, stats.attempted_rows, stats.total_rows
                        );
                        audit.record_progress(stats);
                    }
                }
                RowOutcome::Skipped(reason) => {
                    debug!("Line {}: skipped - {}", line_number, reason);
                    stats.record_skip(&reason);
                    audit.record_skip(line_number, &reason);
                }
                RowOutcome::Failed(error) => {
                    warn!("Line {}: unexpected error - {}", line_number, error);
                    stats.record_skip(&SkipReason::Unexpected {
                        kind: error.kind().to_string(),
                        message: error.to_string(),
                    });
                    audit.record_error(line_number, &error);
                }
            }

            for warning in warnings.drain(..) {
                audit.record_warning(line_number, &warning);
            }

            if stats.attempted_rows % PROGRESS_REFRESH_ROWS == 0 {
                progress.update(stats);
            }
        }

        let writer_stats = writer.finish()?;
        debug!(
            "Writer committed {} batches, rolled back {} rows",
            writer_stats.batches_committed, writer_stats.rows_rolled_back
        );

        audit.record_summary(stats, &Local::now());
        Ok(())
    }
}

/// Run one data row through normalisation and the writer
///
/// Recoverable anomalies are appended to `warnings`.
pub fn process_row(
    line: &str,
    normalizer: &RecordNormalizer<'_>,
    writer: &mut FlightWriter<'_>,
    stats: &mut ImportStats,
    warnings: &mut Vec<String>,
) -> RowOutcome {
    let fields = parse_line(line);

    let route = match normalizer.identify(&fields) {
        Ok(route) => route,
        Err(reason) => return RowOutcome::Skipped(reason),
    };
    stats.record_route(&route);

    let mut candidate = match normalizer.complete(route, &fields) {
        Ok(candidate) => candidate,
        Err(reason) => return RowOutcome::Skipped(reason),
    };
    warnings.append(&mut candidate.warnings);

    let written = writer.write_flight(&candidate);
    warnings.extend(writer.take_warnings());

    match written {
        Ok(FlightWrite::Written { .. }) => RowOutcome::Inserted,
        Ok(FlightWrite::Rejected(reason)) => RowOutcome::Skipped(reason),
        Err(error) => RowOutcome::Failed(error),
    }
}

/// Data rows in the file: every line after the header
pub fn count_data_rows(csv_path: &Path) -> Result<usize> {
    let mut reader = open_reader(csv_path)?;
    let mut buffer = Vec::new();
    let mut lines: usize = 0;

    while read_line(&mut reader, &mut buffer)
        .map_err(|e| Error::io(format!("Failed to count rows in {}", csv_path.display()), e))?
        .is_some()
    {
        lines += 1;
    }

    Ok(lines.saturating_sub(1))
}

fn open_reader(csv_path: &Path) -> Result<BufReader<File>> {
    let file = File::open(csv_path)
        .map_err(|e| Error::io(format!("Failed to open {}", csv_path.display()), e))?;
    Ok(BufReader::new(file))
}

/// Next line without its terminator; invalid UTF-8 is replaced, not fatal
pub(crate) fn read_line<R: BufRead>(
    reader: &mut R,
    buffer: &mut Vec<u8>,
) -> std::io::Result<Option<String>> {
    buffer.clear();
    if reader.read_until(b'\n', buffer)? == 0 {
        return Ok(None);
    }

    if buffer.last() == Some(&b'\n') {
        buffer.pop();
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }
    }

    Ok(Some(String::from_utf8_lossy(buffer).into_owned()))
}
