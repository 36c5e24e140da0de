//! Schema management for the flight store
//!
//! The importer relies on these tables existing before a run starts.

use crate::config::SchemaMode;
use crate::{Error, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

const DROP_TABLES: &str = "
    DROP TABLE IF EXISTS DelayReason;
    DROP TABLE IF EXISTS Flight;
    DROP TABLE IF EXISTS Airline;
    DROP TABLE IF EXISTS Airport;
";

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS Airport (
        code CHAR(3) PRIMARY KEY,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS Airline (
        code CHAR(2) PRIMARY KEY,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS Flight (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date CHAR(8) NOT NULL,
        airline_code CHAR(2) NOT NULL REFERENCES Airline(code),
        flight_number INTEGER NOT NULL,
        origin_code CHAR(3) NOT NULL REFERENCES Airport(code),
        dest_code CHAR(3) NOT NULL REFERENCES Airport(code),
        scheduled_departure INTEGER NOT NULL CHECK (scheduled_departure > 0),
        actual_departure INTEGER NOT NULL DEFAULT 0,
        scheduled_arrival INTEGER NOT NULL CHECK (scheduled_arrival > 0),
        actual_arrival INTEGER NOT NULL DEFAULT 0,
        cancelled BOOLEAN NOT NULL DEFAULT 0,
        cancellation_code CHAR(1),
        diverted BOOLEAN NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS DelayReason (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        flight_id INTEGER NOT NULL REFERENCES Flight(id),
        reason TEXT NOT NULL,
        delay_minutes INTEGER NOT NULL CHECK (delay_minutes > 0)
    );

    CREATE INDEX IF NOT EXISTS idx_flight_date ON Flight(date);
    CREATE INDEX IF NOT EXISTS idx_delay_reason_flight ON DelayReason(flight_id);
";

const TABLES: [&str; 4] = ["Airport", "Airline", "Flight", "DelayReason"];

/// Open (or create) the SQLite database with foreign keys enforced
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).map_err(|e| {
        Error::database(format!("Failed to open database {}", path.display()), e)
    })?;
    configure(&conn)?;
    info!("Connected to database: {}", path.display());
    Ok(conn)
}

/// Open a private in-memory database, configured like [`open_database`]
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()
        .map_err(|e| Error::database("Failed to open in-memory database", e))?;
    configure(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| Error::database("Failed to enable foreign keys", e))
}

/// Prepare the importer tables
pub fn create_schema(conn: &Connection, mode: SchemaMode) -> Result<()> {
    if mode == SchemaMode::Recreate {
        debug!("Dropping existing flight tables");
        conn.execute_batch(DROP_TABLES)
            .map_err(|e| Error::database("Failed to drop existing tables", e))?;
    }

    conn.execute_batch(CREATE_TABLES)
        .map_err(|e| Error::database("Failed to create schema", e))?;

    info!("Database schema ready ({:?})", mode);
    Ok(())
}

/// Number of rows in one of the importer tables
pub fn table_row_count(conn: &Connection, table: &str) -> Result<i64> {
    if !TABLES.contains(&table) {
        return Err(Error::configuration(format!("Unknown table: {}", table)));
    }

    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .map_err(|e| Error::database(format!("Failed to count rows in {}", table), e))
}
