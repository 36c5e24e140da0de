//! Record normalisation for flight extract rows
//!
//! Normalisation runs in two stages so the caller can account for a row's
//! airline, airports and status flags even when the row is rejected later:
//!
//! 1. [`RecordNormalizer::identify`] checks the row shape, the date, the
//!    airline and the route, and cleans those values.
//! 2. [`RecordNormalizer::complete`] resolves the flight number and times and
//!    derives the delay reasons.
//!
//! Either stage fails with the [`SkipReason`] that explains the rejection.

use super::column_mapping::ColumnMapping;
use super::field_parsers::{
    clean_code, clean_text, get_column_value, get_optional_field, is_blank, normalize_date,
    parse_delay_minutes, parse_flag, stable_hash,
};
use super::time_codec::normalize_time;
use crate::app::models::{Airline, Airport, DelayCategory, DelayReason, FlightRecord, SkipReason};
use crate::constants::{SYNTHETIC_FLIGHT_NUMBER_MODULUS, columns};

/// Date, airline, route and status of a row that passed the first stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifiedRoute {
    pub date: String,
    pub airline: Airline,
    pub origin: Airport,
    pub destination: Airport,
    pub cancelled: bool,
    pub cancellation_code: Option<String>,
    pub diverted: bool,
}

/// Fully normalised row, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct FlightCandidate {
    pub flight: FlightRecord,
    pub airline: Airline,
    pub origin: Airport,
    pub destination: Airport,
    /// Empty for cancelled flights
    pub delays: Vec<DelayReason>,
    /// Recoverable anomalies worth recording in the audit log
    pub warnings: Vec<String>,
}

/// Normalises data rows read through a [`ColumnMapping`]
#[derive(Debug, Clone, Copy)]
pub struct RecordNormalizer<'a> {
    mapping: &'a ColumnMapping,
}

impl<'a> RecordNormalizer<'a> {
    pub fn new(mapping: &'a ColumnMapping) -> Self {
        Self { mapping }
    }

    fn field<'f>(&self, fields: &'f [String], column_name: &str) -> &'f str {
        get_column_value(fields, self.mapping, column_name)
    }

    /// First stage: row shape, date, airline, route and status flags
    pub fn identify(&self, fields: &[String]) -> Result<IdentifiedRoute, SkipReason> {
        if is_empty_row(fields) {
            return Err(SkipReason::EmptyLine);
        }

        let required = self.mapping.min_required_columns();
        if fields.len() < required {
            return Err(SkipReason::InsufficientColumns {
                found: fields.len(),
                required,
            });
        }

        let raw_date = self.field(fields, columns::FL_DATE);
        let date = normalize_date(raw_date).ok_or_else(|| SkipReason::InvalidDate {
            value: raw_date.to_string(),
        })?;

        let airline_name = self.field(fields, columns::AIRLINE);
        let airline_code = self
            .resolve_airline_code(fields, airline_name)
            .ok_or(SkipReason::MissingAirlineCode)?;

        let origin = self.field(fields, columns::ORIGIN);
        let dest = self.field(fields, columns::DEST);
        if is_blank(origin) || is_blank(dest) {
            return Err(SkipReason::MissingOriginDestination);
        }

        let origin_city = get_optional_field(fields, self.mapping, columns::ORIGIN_CITY)
            .unwrap_or(origin);
        let dest_city =
            get_optional_field(fields, self.mapping, columns::DEST_CITY).unwrap_or(dest);

        // A cancellation code marks the flight cancelled whatever the flag says
        let cancellation_code = get_optional_field(fields, self.mapping, columns::CANCELLATION_CODE)
            .map(str::to_string);
        let cancelled =
            parse_flag(self.field(fields, columns::CANCELLED)) || cancellation_code.is_some();
        let diverted = parse_flag(self.field(fields, columns::DIVERTED));

        let airline_code = clean_code(airline_code);
        let airline_name = match clean_text(airline_name) {
            name if name.is_empty() => airline_code.clone(),
            name => name,
        };

        Ok(IdentifiedRoute {
            date,
            airline: Airline {
                code: airline_code,
                name: airline_name,
            },
            origin: airport(origin, origin_city),
            destination: airport(dest, dest_city),
            cancelled,
            cancellation_code,
            diverted,
        })
    }

    /// Airline code column, else the code after `:` in the "name: code" column
    fn resolve_airline_code<'f>(&self, fields: &'f [String], airline_name: &str) -> Option<&'f str> {
        let code = self.field(fields, columns::AIRLINE_CODE);
        if !is_blank(code) {
            return Some(code);
        }

        if is_blank(airline_name) {
            return None;
        }

        self.field(fields, columns::AIRLINE_DOT)
            .split(':')
            .nth(1)
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// Second stage: flight number, times and delay reasons
    pub fn complete(
        &self,
        route: IdentifiedRoute,
        fields: &[String],
    ) -> Result<FlightCandidate, SkipReason> {
        let mut warnings = Vec::new();

        let raw_number = self.field(fields, columns::FL_NUMBER);
        let flight_number = match raw_number.parse::<i32>() {
            Ok(number) => number,
            Err(_) => {
                let number = synthetic_flight_number(
                    &route.date,
                    &route.airline.code,
                    &route.origin.code,
                    &route.destination.code,
                );
                warnings.push(format!(
                    "Invalid flight number '{}', using generated number: {}",
                    raw_number, number
                ));
                number
            }
        };

        // Scheduled times are required even for cancelled and diverted flights
        let scheduled_departure = normalize_time(self.field(fields, columns::CRS_DEP_TIME));
        let scheduled_arrival = normalize_time(self.field(fields, columns::CRS_ARR_TIME));
        if scheduled_departure == 0 || scheduled_arrival == 0 {
            return Err(SkipReason::MissingScheduledTimes);
        }

        let actual_departure = normalize_time(self.field(fields, columns::DEP_TIME));
        let actual_arrival = normalize_time(self.field(fields, columns::ARR_TIME));

        let flight = FlightRecord {
            date: route.date,
            airline_code: route.airline.code.clone(),
            flight_number,
            origin_code: route.origin.code.clone(),
            dest_code: route.destination.code.clone(),
            scheduled_departure,
            actual_departure,
            scheduled_arrival,
            actual_arrival,
            cancelled: route.cancelled,
            cancellation_code: route.cancellation_code,
            diverted: route.diverted,
        };

        let delays = if flight.cancelled {
            Vec::new()
        } else {
            self.derive_delays(fields, &flight, &mut warnings)
        };

        Ok(FlightCandidate {
            flight,
            airline: route.airline,
            origin: route.origin,
            destination: route.destination,
            delays,
            warnings,
        })
    }

    /// Categorised delays, else one unspecified delay from the arrival delay
    fn derive_delays(
        &self,
        fields: &[String],
        flight: &FlightRecord,
        warnings: &mut Vec<String>,
    ) -> Vec<DelayReason> {
        let mut delays: Vec<DelayReason> = DelayCategory::CATEGORISED
            .iter()
            .filter_map(|&category| {
                let column = category.source_column()?;
                match parse_delay_minutes(self.field(fields, column)) {
                    Ok(minutes) => minutes.map(|minutes| DelayReason { category, minutes }),
                    Err(raw) => {
                        warnings.push(format!("Invalid delay value for {}: {}", category, raw));
                        None
                    }
                }
            })
            .collect();

        let times_known = flight.actual_departure > 0
            && flight.actual_arrival > 0
            && flight.scheduled_arrival > 0;

        if delays.is_empty() && times_known {
            match parse_delay_minutes(self.field(fields, columns::ARR_DELAY)) {
                Ok(Some(minutes)) => delays.push(DelayReason {
                    category: DelayCategory::Unspecified,
                    minutes,
                }),
                Ok(None) => {}
                Err(raw) => warnings.push(format!("Invalid arrival delay value: {}", raw)),
            }
        }

        delays
    }
}

/// Stand-in flight number derived from the route
///
/// Identical inputs always give the same number; different routes may
/// collide.
pub fn synthetic_flight_number(date: &str, airline: &str, origin: &str, dest: &str) -> i32 {
    let key = format!("{}{}{}{}", date, airline, origin, dest);
    (stable_hash(&key) % SYNTHETIC_FLIGHT_NUMBER_MODULUS).abs()
}

fn is_empty_row(fields: &[String]) -> bool {
    match fields {
        [] => true,
        [only] => only.trim().is_empty(),
        _ => false,
    }
}

fn airport(code: &str, name: &str) -> Airport {
    let code = clean_code(code);
    let name = match clean_text(name) {
        name if name.is_empty() => code.clone(),
        name => name,
    };
    Airport { code, name }
}
