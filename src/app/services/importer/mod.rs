//! Import orchestration for flight CSV extracts
//!
//! - [`importer`] - The per-run control flow and per-row pipeline
//! - [`report`] - Read-only summary of a finished or aborted run
//! - [`progress`] - Optional console progress bar
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use flight_importer::app::services::flight_store::{create_schema, open_database};
//! use flight_importer::{CsvImporter, ImportConfig, SchemaMode};
//! use std::path::Path;
//!
//! # fn example() -> flight_importer::Result<()> {
//! let config = ImportConfig::default().with_database_path("flights.db");
//! let conn = open_database(&config.database_path)?;
//! create_schema(&conn, SchemaMode::Recreate)?;
//!
//! let report = CsvImporter::new(&conn, config).import(Path::new("flights.csv"))?;
//! println!(
//!     "{} of {} rows imported, log at {}",
//!     report.processed_rows(),
//!     report.attempted_rows(),
//!     report.log_path().display()
//! );
//! # Ok(())
//! # }
//! ```

pub mod importer;
pub mod progress;
pub mod report;

#[cfg(test)]
pub mod tests;

pub use importer::{CsvImporter, RowOutcome, count_data_rows, process_row};
pub use progress::ImportProgress;
pub use report::ImportReport;
