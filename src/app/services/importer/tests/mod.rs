//! Test utilities for import runs
//!
//! Writes CSV files into a temporary directory and runs them against an
//! in-memory store with progress output disabled.

use super::importer::CsvImporter;
use super::report::ImportReport;
use crate::Result;
use crate::app::services::flight_store::{create_schema, open_in_memory};
use crate::config::{ImportConfig, SchemaMode};
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;


pub const HEADER: &str = "FL_DATE,AIRLINE,AIRLINE_DOT,AIRLINE_CODE,DOT_CODE,FL_NUMBER,ORIGIN,ORIGIN_CITY,DEST,DEST_CITY,CRS_DEP_TIME,DEP_TIME,DEP_DELAY,CRS_ARR_TIME,ARR_TIME,ARR_DELAY,CANCELLED,CANCELLATION_CODE,DIVERTED,DELAY_DUE_CARRIER,DELAY_DUE_WEATHER,DELAY_DUE_NAS,DELAY_DUE_SECURITY,DELAY_DUE_LATE_AIRCRAFT";

/// Delayed Delta flight with a carrier delay
pub const DELAYED_ROW: &str = "2023-01-15,Delta Air Lines Inc.,Delta Air Lines Inc.: DL,DL,19790,1234,ATL,\"Atlanta, GA\",JFK,\"New York, NY\",0900,0925,25.0,1130,1150,20.0,0.0,,0.0,20.0,0.0,0.0,0.0,0.0";

/// Weather-cancelled American flight
pub const CANCELLED_ROW: &str = "2023-01-16,American Airlines Inc.,American Airlines Inc.: AA,AA,19805,100,JFK,\"New York, NY\",LAX,\"Los Angeles, CA\",0800,,,1120,,,1.0,B,0.0,,,,,";

/// Isolated test environment: temp directory, CSV location, store
pub struct ImportFixture {
    pub temp_dir: TempDir,
    pub conn: Connection,
}

impl ImportFixture {
    pub fn new() -> Self {
        let conn = open_in_memory().unwrap();
        create_schema(&conn, SchemaMode::Recreate).unwrap();
        Self {
            temp_dir: TempDir::new().unwrap(),
            conn,
        }
    }

    pub fn config(&self) -> ImportConfig {
        ImportConfig::default()
            .with_log_dir(self.temp_dir.path().join("logs"))
            .with_batch_size(2)
            .without_progress()
    }

    /// Write `lines` joined by newlines to `name`
    pub fn write_csv(&self, name: &str, lines: &[&str]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    pub fn import(&self, lines: &[&str]) -> Result<ImportReport> {
        self.import_with(self.config(), lines)
    }

    pub fn import_with(&self, config: ImportConfig, lines: &[&str]) -> Result<ImportReport> {
        let path = self.write_csv("flights.csv", lines);
        CsvImporter::new(&self.conn, config).import(&path)
    }

    pub fn count(&self, table: &str) -> i64 {
        crate::app::services::flight_store::table_row_count(&self.conn, table).unwrap()
    }
}
