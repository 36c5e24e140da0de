//! CSV parsing and normalisation for flight punctuality extracts
//!
//! Turns raw text lines into validated flight candidates. Every row is
//! either normalised into a [`FlightCandidate`] or classified with a
//! [`SkipReason`](crate::app::models::SkipReason); nothing in this module
//! touches the store.
//!
//! ## Architecture
//!
//! - [`line_parser`] - Splits one line into fields, honouring double quotes
//! - [`column_mapping`] - Header name to position mapping and the minimum column count
//! - [`field_parsers`] - Field lookup and cleaning helpers
//! - [`time_codec`] - Clock time normalisation into HHMM integers
//! - [`record_normalizer`] - Row validation, value derivation and skip classification
//!
//! ## Usage
//!
//! ```rust
//! use flight_importer::app::services::flight_csv_parser::{
//!     parse_line, ColumnMapping, RecordNormalizer,
//! };
//!
//! let header = parse_line("FL_DATE,AIRLINE_CODE,FL_NUMBER,ORIGIN,DEST,CRS_DEP_TIME,CRS_ARR_TIME");
//! let mapping = ColumnMapping::from_header(&header);
//! let normalizer = RecordNormalizer::new(&mapping);
//!
//! let fields = parse_line("2023-01-15,DL,1234,ATL,JFK,0900,1130");
//! let route = normalizer.identify(&fields).unwrap();
//! let candidate = normalizer.complete(route, &fields).unwrap();
//! assert_eq!(candidate.flight.scheduled_departure, 900);
//! ```

pub mod column_mapping;
pub mod field_parsers;
pub mod line_parser;
pub mod record_normalizer;
pub mod time_codec;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::ColumnMapping;
pub use line_parser::parse_line;
pub use record_normalizer::{FlightCandidate, IdentifiedRoute, RecordNormalizer};
pub use time_codec::normalize_time;
