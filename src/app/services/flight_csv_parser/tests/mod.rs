//! Test utilities for flight CSV parsing
//!
//! Provides a realistic header and row builders shared by the parser,
//! mapping, time codec and normaliser tests.

use super::column_mapping::ColumnMapping;
use super::line_parser::parse_line;


/// Header of a full extract, in the order the published files use
pub const FULL_HEADER: &str = "FL_DATE,AIRLINE,AIRLINE_DOT,AIRLINE_CODE,DOT_CODE,FL_NUMBER,ORIGIN,ORIGIN_CITY,DEST,DEST_CITY,CRS_DEP_TIME,DEP_TIME,DEP_DELAY,CRS_ARR_TIME,ARR_TIME,ARR_DELAY,CANCELLED,CANCELLATION_CODE,DIVERTED,DELAY_DUE_CARRIER,DELAY_DUE_WEATHER,DELAY_DUE_NAS,DELAY_DUE_SECURITY,DELAY_DUE_LATE_AIRCRAFT";

/// Mapping for [`FULL_HEADER`]
pub fn full_mapping() -> ColumnMapping {
    ColumnMapping::from_header(&parse_line(FULL_HEADER))
}

/// Builder for a data row matching [`FULL_HEADER`]
///
/// Starts from an on-time, non-cancelled Delta flight and lets each test
/// override only the columns it cares about.
#[derive(Debug, Clone)]
pub struct RowBuilder {
    values: Vec<(String, String)>,
}

impl RowBuilder {
    pub fn new() -> Self {
        let defaults = [
            ("FL_DATE", "2023-01-15"),
            ("AIRLINE", "Delta Air Lines Inc."),
            ("AIRLINE_DOT", "Delta Air Lines Inc.: DL"),
            ("AIRLINE_CODE", "DL"),
            ("DOT_CODE", "19790"),
            ("FL_NUMBER", "1234"),
            ("ORIGIN", "ATL"),
            ("ORIGIN_CITY", "\"Atlanta, GA\""),
            ("DEST", "JFK"),
            ("DEST_CITY", "\"New York, NY\""),
            ("CRS_DEP_TIME", "0900"),
            ("DEP_TIME", "0905"),
            ("DEP_DELAY", "5.0"),
            ("CRS_ARR_TIME", "1130"),
            ("ARR_TIME", "1128"),
            ("ARR_DELAY", "-2.0"),
            ("CANCELLED", "0.0"),
            ("CANCELLATION_CODE", ""),
            ("DIVERTED", "0.0"),
            ("DELAY_DUE_CARRIER", ""),
            ("DELAY_DUE_WEATHER", ""),
            ("DELAY_DUE_NAS", ""),
            ("DELAY_DUE_SECURITY", ""),
            ("DELAY_DUE_LATE_AIRCRAFT", ""),
        ];

        Self {
            values: defaults
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn set(mut self, column: &str, value: &str) -> Self {
        if let Some(entry) = self.values.iter_mut().find(|(k, _)| k == column) {
            entry.1 = value.to_string();
        }
        self
    }

    pub fn line(&self) -> String {
        self.values
            .iter()
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn fields(&self) -> Vec<String> {
        parse_line(&self.line())
    }
}

impl Default for RowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
