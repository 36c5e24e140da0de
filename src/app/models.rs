//! Core data structures for flight import
//!
//! Defines the entities written to the relational store (airports, airlines,
//! flights and delay reasons) and the classification of rows that could not
//! be turned into a flight.

use crate::constants::columns;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Airport keyed by its upper-cased 3-letter IATA code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub code: String,
    /// City or airport name; falls back to the code itself
    pub name: String,
}

/// Airline keyed by its upper-cased 2-letter IATA code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub code: String,
    pub name: String,
}

/// A single flight as it is written to the store
///
/// Times use the HHMM integer encoding where 0 means "absent". Scheduled
/// departure and arrival are always non-zero for records that reach the
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// 8-digit date with punctuation stripped
    pub date: String,
    pub airline_code: String,
    pub flight_number: i32,
    pub origin_code: String,
    pub dest_code: String,
    pub scheduled_departure: u16,
    pub actual_departure: u16,
    pub scheduled_arrival: u16,
    pub actual_arrival: u16,
    pub cancelled: bool,
    pub cancellation_code: Option<String>,
    pub diverted: bool,
}

impl FlightRecord {
    /// Airline code and number, e.g. `DL1234`
    pub fn full_flight_number(&self) -> String {
        format!("{}{}", self.airline_code, self.flight_number)
    }

    /// Human-readable cancellation reason, if the flight was cancelled with a code
    pub fn cancellation_reason(&self) -> Option<String> {
        self.cancellation_code
            .as_deref()
            .map(|code| CancellationCode::parse(code).to_string())
    }
}

/// Cancellation codes used by the source extracts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancellationCode {
    Carrier,
    Weather,
    NationalAirSystem,
    Security,
    Other(String),
}

impl CancellationCode {
    pub fn parse(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "A" => Self::Carrier,
            "B" => Self::Weather,
            "C" => Self::NationalAirSystem,
            "D" => Self::Security,
            _ => Self::Other(code.to_string()),
        }
    }
}

impl fmt::Display for CancellationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Carrier => write!(f, "Carrier"),
            Self::Weather => write!(f, "Weather"),
            Self::NationalAirSystem => write!(f, "National Air System"),
            Self::Security => write!(f, "Security"),
            Self::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Categories a delay can be attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelayCategory {
    Carrier,
    Weather,
    Nas,
    Security,
    LateAircraft,
    /// Residual category derived from the generic arrival delay
    Unspecified,
}

impl DelayCategory {
    /// Categories with their own delay-minutes column, in column order
    pub const CATEGORISED: [DelayCategory; 5] = [
        DelayCategory::Carrier,
        DelayCategory::Weather,
        DelayCategory::Nas,
        DelayCategory::Security,
        DelayCategory::LateAircraft,
    ];

    /// Label stored in the `reason` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Carrier => "CARRIER",
            Self::Weather => "WEATHER",
            Self::Nas => "NAS",
            Self::Security => "SECURITY",
            Self::LateAircraft => "LATE_AIRCRAFT",
            Self::Unspecified => "UNSPECIFIED",
        }
    }

    /// Source column holding the delay minutes for this category
    pub fn source_column(&self) -> Option<&'static str> {
        match self {
            Self::Carrier => Some(columns::DELAY_DUE_CARRIER),
            Self::Weather => Some(columns::DELAY_DUE_WEATHER),
            Self::Nas => Some(columns::DELAY_DUE_NAS),
            Self::Security => Some(columns::DELAY_DUE_SECURITY),
            Self::LateAircraft => Some(columns::DELAY_DUE_LATE_AIRCRAFT),
            Self::Unspecified => None,
        }
    }
}

impl fmt::Display for DelayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delay attributed to a flight, before the flight id is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayReason {
    pub category: DelayCategory,
    /// Always positive
    pub minutes: i32,
}

/// Why an input row did not become a stored flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyLine,
    InsufficientColumns { found: usize, required: usize },
    InvalidDate { value: String },
    MissingAirlineCode,
    MissingOriginDestination,
    MissingScheduledTimes,
    /// The store rejected the flight insert
    DatabaseRejected { message: String },
    /// The flight insert produced no generated id
    MissingFlightId,
    /// Any other failure while processing the row
    Unexpected { kind: String, message: String },
}

impl SkipReason {
    /// Stable label used as the key of the skip tally
    pub fn label(&self) -> String {
        match self {
            Self::EmptyLine => "EmptyLine".to_string(),
            Self::InsufficientColumns { .. } => "InsufficientColumns".to_string(),
            Self::InvalidDate { .. } => "InvalidDate".to_string(),
            Self::MissingAirlineCode => "MissingAirlineCode".to_string(),
            Self::MissingOriginDestination => "MissingOriginDestination".to_string(),
            Self::MissingScheduledTimes => "MissingScheduledTimes".to_string(),
            Self::DatabaseRejected { .. } => "DatabaseError".to_string(),
            Self::MissingFlightId => "MissingFlightId".to_string(),
            Self::Unexpected { kind, .. } => format!("UnexpectedError: {}", kind),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLine => write!(f, "Empty line"),
            Self::InsufficientColumns { found, required } => write!(
                f,
                "Insufficient columns. Found {}, needed at least {}",
                found, required
            ),
            Self::InvalidDate { value } => write!(f, "Invalid or missing date: '{}'", value),
            Self::MissingAirlineCode => write!(f, "Could not determine airline code"),
            Self::MissingOriginDestination => write!(f, "Missing origin or destination"),
            Self::MissingScheduledTimes => {
                write!(f, "Missing scheduled departure or arrival time")
            }
            Self::DatabaseRejected { message } => {
                write!(f, "Database error inserting flight: {}", message)
            }
            Self::MissingFlightId => write!(f, "Failed to get flight ID"),
            Self::Unexpected { kind, message } => write!(f, "{} error: {}", kind, message),
        }
    }
}
