//! Tests for the per-run audit log

use super::*;
use crate::Error;
use crate::app::models::SkipReason;
use crate::app::services::import_stats::audit_log::AuditLog;
use crate::app::services::import_stats::stats::ImportStats;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_path_is_derived_from_start_time() {
    let path = AuditLog::path_for(std::path::Path::new("logs"), &fixed_start());
    assert_eq!(path, std::path::Path::new("logs/import_errors_07032024_140509.log"));
}

#[test]
fn test_create_makes_directory_and_banner() {
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("nested").join("logs");

    let log = AuditLog::create(&log_dir, &fixed_start()).unwrap();
    assert!(log.path().exists());

    let content = fs::read_to_string(log.path()).unwrap();
    assert!(content.starts_with("Import log started at 2024-03-07 14:05:09\n"));
}

#[test]
fn test_lines_are_flushed_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let mut log = AuditLog::create(temp_dir.path(), &fixed_start()).unwrap();

    log.record_columns(&["FL_DATE".to_string(), "ORIGIN".to_string()]);
    log.record_skip(7, &SkipReason::MissingOriginDestination);
    log.record_warning(9, "Invalid delay value for NAS: abc");

    // Read while the log is still open
    let content = fs::read_to_string(log.path()).unwrap();
    assert!(content.contains("Detected columns: FL_DATE, ORIGIN"));
    assert!(content.contains("Line 7: Skipped - Missing origin or destination"));
    assert!(content.contains("Line 9: Warning - Invalid delay value for NAS: abc"));
}

#[test]
fn test_error_lines_include_cause_chain() {
    let temp_dir = TempDir::new().unwrap();
    let mut log = AuditLog::create(temp_dir.path(), &fixed_start()).unwrap();

    let error = Error::io(
        "Failed to read row",
        std::io::Error::new(std::io::ErrorKind::Other, "disk went away"),
    );
    log.record_error(12, &error);

    let content = fs::read_to_string(log.path()).unwrap();
    assert!(content.contains("Line 12: Error (Io) - I/O error: Failed to read row"));
    assert!(content.contains("    caused by: disk went away"));
}

#[test]
fn test_summary_block() {
    let temp_dir = TempDir::new().unwrap();
    let mut log = AuditLog::create(temp_dir.path(), &fixed_start()).unwrap();

    let mut stats = ImportStats::new(3);
    for _ in 0..3 {
        stats.record_attempt();
    }
    stats.record_route(&route("DL", "ATL", "JFK"));
    stats.record_processed();
    stats.record_processed();
    stats.record_skip(&SkipReason::EmptyLine);

    log.record_summary(&stats, &fixed_start());

    let content = fs::read_to_string(log.path()).unwrap();
    assert!(content.contains("Total rows in file: 3"));
    assert!(content.contains("Processed rows: 2"));
    assert!(content.contains("Skipped rows: 1"));
    assert!(content.contains("Success rate: 66.67%"));
    assert!(content.contains("Skip reasons:\n  EmptyLine: 1\n"));
    assert!(content.contains("Unique airlines: 1"));
    assert!(content.contains("Unique airports: 2"));
}

#[test]
fn test_missing_columns_line_only_when_needed() {
    let temp_dir = TempDir::new().unwrap();
    let mut log = AuditLog::create(temp_dir.path(), &fixed_start()).unwrap();

    log.record_missing_columns(&[]);
    log.record_missing_columns(&["DEST", "CRS_ARR_TIME"]);

    let content = fs::read_to_string(log.path()).unwrap();
    assert_eq!(content.matches("Missing expected columns").count(), 1);
    assert!(content.contains("Missing expected columns: DEST, CRS_ARR_TIME"));
}

#[test]
fn test_failed_writes_are_counted_not_returned() {
    let mut log = AuditLog::from_writer(PathBuf::from("full.log"), FullDisk::new(40));

    log.record_skip(2, &SkipReason::EmptyLine);
    assert_eq!(log.failed_writes(), 0);

    log.record_warning(3, "Invalid delay value for NAS: abc");
    log.record_skip(4, &SkipReason::MissingAirlineCode);
    assert_eq!(log.failed_writes(), 2);
    assert_eq!(log.path(), std::path::Path::new("full.log"));
}
