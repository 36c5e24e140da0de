//! Batched writer for normalised flight rows
//!
//! Rows are written inside a long-running transaction that is committed
//! every `batch_size` completed rows. Each row additionally runs inside its
//! own savepoint, so a row that fails half way leaves nothing behind while
//! the rest of the batch is kept.

use crate::app::models::{Airline, Airport, DelayReason, FlightRecord, SkipReason};
use crate::app::services::flight_csv_parser::FlightCandidate;
use crate::{Error, Result};
use rusqlite::{Connection, params};
use std::collections::HashSet;
use tracing::{debug, info, warn};

const INSERT_AIRLINE: &str = "INSERT OR IGNORE INTO Airline (code, name) VALUES (?1, ?2)";

const INSERT_AIRPORT: &str = "INSERT OR IGNORE INTO Airport (code, name) VALUES (?1, ?2)";

const INSERT_FLIGHT: &str = "INSERT INTO Flight (date, airline_code, flight_number, \
     origin_code, dest_code, scheduled_departure, actual_departure, scheduled_arrival, \
     actual_arrival, cancelled, cancellation_code, diverted) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) RETURNING id";

const INSERT_DELAY_REASON: &str =
    "INSERT INTO DelayReason (flight_id, reason, delay_minutes) VALUES (?1, ?2, ?3)";

/// Statistics for a writer's lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    pub flights_written: usize,
    pub delay_reasons_written: usize,
    pub airlines_inserted: usize,
    pub airports_inserted: usize,
    pub batches_committed: usize,
    pub rows_rolled_back: usize,
}

/// Result of writing one normalised row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightWrite {
    /// Flight and its delay reasons are in the current batch
    Written { flight_id: i64, delay_reasons: usize },
    /// The store refused the flight; the row was rolled back
    Rejected(SkipReason),
}

/// Writes flights, their airports, airlines and delay reasons
pub struct FlightWriter<'conn> {
    conn: &'conn Connection,
    batch_size: usize,
    pending_rows: usize,
    in_transaction: bool,
    /// Codes known to be committed or in the open batch
    known_airlines: HashSet<String>,
    known_airports: HashSet<String>,
    /// Codes inserted by the row currently inside its savepoint
    row_airlines: Vec<String>,
    row_airports: Vec<String>,
    warnings: Vec<String>,
    stats: WriterStats,
}

impl<'conn> FlightWriter<'conn> {
    /// Create a writer committing every `batch_size` completed rows
    pub fn new(conn: &'conn Connection, batch_size: usize) -> Self {
        Self {
            conn,
            batch_size: batch_size.max(1),
            pending_rows: 0,
            in_transaction: false,
            known_airlines: HashSet::new(),
            known_airports: HashSet::new(),
            row_airlines: Vec::new(),
            row_airports: Vec::new(),
            warnings: Vec::new(),
            stats: WriterStats::default(),
        }
    }

    /// Write one row inside its own savepoint
    ///
    /// A rejected flight insert, or one that yields no id, comes back as
    /// [`FlightWrite::Rejected`]. Any other failure is returned as an error.
    /// In both cases nothing from the row remains in the batch.
    pub fn write_flight(&mut self, candidate: &FlightCandidate) -> Result<FlightWrite> {
        self.ensure_transaction()?;
        self.conn
            .execute_batch("SAVEPOINT flight_row")
            .map_err(|e| Error::database("Failed to open row savepoint", e))?;

        match self.insert_row(candidate) {
            Ok(FlightWrite::Written {
                flight_id,
                delay_reasons,
            }) => {
                self.release_row()?;
                debug!(
                    "Wrote flight {} as id {} (cancellation: {})",
                    candidate.flight.full_flight_number(),
                    flight_id,
                    candidate.flight.cancellation_reason().as_deref().unwrap_or("none")
                );
                self.stats.flights_written += 1;
                self.stats.delay_reasons_written += delay_reasons;
                Ok(FlightWrite::Written {
                    flight_id,
                    delay_reasons,
                })
            }
            Ok(rejected) => {
                self.rollback_row()?;
                Ok(rejected)
            }
            Err(error) => {
                if let Err(rollback_error) = self.rollback_row() {
                    warn!("Row rollback failed after {}: {}", error, rollback_error);
                }
                Err(error)
            }
        }
    }

    fn insert_row(&mut self, candidate: &FlightCandidate) -> Result<FlightWrite> {
        self.insert_airline(&candidate.airline);
        self.insert_airport(&candidate.origin, "origin");
        self.insert_airport(&candidate.destination, "destination");

        let flight_id = match self.insert_flight(&candidate.flight) {
            Ok(id) => id,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Ok(FlightWrite::Rejected(SkipReason::MissingFlightId));
            }
            Err(e) => {
                return Ok(FlightWrite::Rejected(SkipReason::DatabaseRejected {
                    message: e.to_string(),
                }));
            }
        };

        for delay in &candidate.delays {
            self.insert_delay_reason(flight_id, delay).map_err(|e| {
                Error::database(
                    format!(
                        "Failed to insert {} delay for flight {}",
                        delay.category, flight_id
                    ),
                    e,
                )
            })?;
        }

        Ok(FlightWrite::Written {
            flight_id,
            delay_reasons: candidate.delays.len(),
        })
    }

    fn insert_airline(&mut self, airline: &Airline) {
        if self.known_airlines.contains(&airline.code) {
            return;
        }

        let result = self
            .conn
            .prepare_cached(INSERT_AIRLINE)
            .and_then(|mut stmt| stmt.execute(params![airline.code, airline.name]));

        match result {
            Ok(inserted) => {
                self.stats.airlines_inserted += inserted;
                self.row_airlines.push(airline.code.clone());
            }
            Err(e) => self
                .warnings
                .push(format!("Could not insert airline {}: {}", airline.code, e)),
        }
    }

    fn insert_airport(&mut self, airport: &Airport, role: &str) {
        if self.known_airports.contains(&airport.code) {
            return;
        }

        let result = self
            .conn
            .prepare_cached(INSERT_AIRPORT)
            .and_then(|mut stmt| stmt.execute(params![airport.code, airport.name]));

        match result {
            Ok(inserted) => {
                self.stats.airports_inserted += inserted;
                self.row_airports.push(airport.code.clone());
            }
            Err(e) => self.warnings.push(format!(
                "Could not insert {} airport {}: {}",
                role, airport.code, e
            )),
        }
    }

    fn insert_flight(&self, flight: &FlightRecord) -> rusqlite::Result<i64> {
        let mut stmt = self.conn.prepare_cached(INSERT_FLIGHT)?;
        stmt.query_row(
            params![
                flight.date,
                flight.airline_code,
                flight.flight_number,
                flight.origin_code,
                flight.dest_code,
                flight.scheduled_departure,
                flight.actual_departure,
                flight.scheduled_arrival,
                flight.actual_arrival,
                flight.cancelled,
                flight.cancellation_code,
                flight.diverted,
            ],
            |row| row.get(0),
        )
    }

    fn insert_delay_reason(&self, flight_id: i64, delay: &DelayReason) -> rusqlite::Result<()> {
        let mut stmt = self.conn.prepare_cached(INSERT_DELAY_REASON)?;
        stmt.execute(params![flight_id, delay.category.as_str(), delay.minutes])?;
        Ok(())
    }

    fn release_row(&mut self) -> Result<()> {
        self.conn
            .execute_batch("RELEASE flight_row")
            .map_err(|e| Error::database("Failed to release row savepoint", e))?;
        self.known_airlines.extend(self.row_airlines.drain(..));
        self.known_airports.extend(self.row_airports.drain(..));
        Ok(())
    }

    fn rollback_row(&mut self) -> Result<()> {
        self.row_airlines.clear();
        self.row_airports.clear();
        self.stats.rows_rolled_back += 1;
        self.conn
            .execute_batch("ROLLBACK TO flight_row; RELEASE flight_row;")
            .map_err(|e| Error::database("Failed to roll back row savepoint", e))
    }

    /// Count a successfully processed row, committing when the batch is full
    ///
    /// Returns whether a commit happened. A failed commit is fatal to the run.
    pub fn complete_row(&mut self) -> Result<bool> {
        self.pending_rows += 1;
        if self.pending_rows >= self.batch_size {
            self.commit()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Commit the open batch, if any
    pub fn commit(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Ok(());
        }

        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| Error::database("Batch commit failed", e))?;
        self.in_transaction = false;
        self.stats.batches_committed += 1;
        debug!(
            "Committed batch {} ({} rows)",
            self.stats.batches_committed, self.pending_rows
        );
        self.pending_rows = 0;
        Ok(())
    }

    /// Commit the remainder and return the writer's statistics
    pub fn finish(mut self) -> Result<WriterStats> {
        self.commit()?;
        info!(
            "Writer finished: {} flights, {} delay reasons in {} batches",
            self.stats.flights_written,
            self.stats.delay_reasons_written,
            self.stats.batches_committed
        );
        Ok(std::mem::take(&mut self.stats))
    }

    /// Warnings gathered since the last call
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub fn pending_rows(&self) -> usize {
        self.pending_rows
    }

    fn ensure_transaction(&mut self) -> Result<()> {
        if !self.in_transaction {
            self.conn
                .execute_batch("BEGIN")
                .map_err(|e| Error::database("Failed to begin batch transaction", e))?;
            self.in_transaction = true;
        }
        Ok(())
    }
}

impl Drop for FlightWriter<'_> {
    fn drop(&mut self) {
        // Reached with an open batch only when the run is being abandoned
        if self.in_transaction {
            warn!(
                "Rolling back uncommitted batch of {} rows",
                self.pending_rows
            );
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                warn!("Rollback of uncommitted batch failed: {}", e);
            }
        }
    }
}
