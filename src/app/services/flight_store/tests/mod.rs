//! Test utilities for the flight store
//!
//! Builds normalised candidates directly, without going through the CSV
//! parser, so store behaviour can be tested in isolation.

use super::schema::{create_schema, open_in_memory};
use crate::app::models::{Airline, Airport, DelayCategory, DelayReason, FlightRecord};
use crate::app::services::flight_csv_parser::FlightCandidate;
use crate::config::SchemaMode;
use rusqlite::Connection;


/// In-memory database with a fresh schema
pub fn test_connection() -> Connection {
    let conn = open_in_memory().unwrap();
    create_schema(&conn, SchemaMode::Recreate).unwrap();
    conn
}

/// On-time flight between two airports with no delays
pub fn candidate(airline: &str, origin: &str, dest: &str, number: i32) -> FlightCandidate {
    FlightCandidate {
        flight: FlightRecord {
            date: "20230115".to_string(),
            airline_code: airline.to_string(),
            flight_number: number,
            origin_code: origin.to_string(),
            dest_code: dest.to_string(),
            scheduled_departure: 900,
            actual_departure: 905,
            scheduled_arrival: 1130,
            actual_arrival: 1128,
            cancelled: false,
            cancellation_code: None,
            diverted: false,
        },
        airline: Airline {
            code: airline.to_string(),
            name: format!("{} Airlines", airline),
        },
        origin: Airport {
            code: origin.to_string(),
            name: format!("{} City", origin),
        },
        destination: Airport {
            code: dest.to_string(),
            name: format!("{} City", dest),
        },
        delays: Vec::new(),
        warnings: Vec::new(),
    }
}

pub fn delay(category: DelayCategory, minutes: i32) -> DelayReason {
    DelayReason { category, minutes }
}
