//! Relational store for imported flights
//!
//! SQLite holds four tables: `Airport`, `Airline`, `Flight` and
//! `DelayReason`. This module prepares the schema and writes normalised
//! rows in batched transactions.
//!
//! - [`schema`] - Connection setup and table creation
//! - [`writer`] - Insert-if-absent airports and airlines, flights, delay reasons
//!
//! # Example Usage
//!
//! ```rust
//! use flight_importer::SchemaMode;
//! use flight_importer::app::services::flight_store::{create_schema, open_in_memory, FlightWriter};
//!
//! # fn example() -> flight_importer::Result<()> {
//! let conn = open_in_memory()?;
//! create_schema(&conn, SchemaMode::Recreate)?;
//!
//! let mut writer = FlightWriter::new(&conn, 1000);
//! // ... write_flight() for each normalised row, then complete_row()
//! let stats = writer.finish()?;
//! assert_eq!(stats.flights_written, 0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod schema;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use schema::{create_schema, open_database, open_in_memory, table_row_count};
pub use writer::{FlightWrite, FlightWriter, WriterStats};
