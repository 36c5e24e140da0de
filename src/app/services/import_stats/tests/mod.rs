//! Test utilities for run statistics and the audit log

use crate::app::models::{Airline, Airport};
use crate::app::services::flight_csv_parser::IdentifiedRoute;
use chrono::{DateTime, Local, TimeZone};
use std::io::{self, Write};

// Test modules
mod audit_log_tests;

pub fn route(airline: &str, origin: &str, dest: &str) -> IdentifiedRoute {
    IdentifiedRoute {
        date: "20230115".to_string(),
        airline: Airline {
            code: airline.to_string(),
            name: airline.to_string(),
        },
        origin: Airport {
            code: origin.to_string(),
            name: origin.to_string(),
        },
        destination: Airport {
            code: dest.to_string(),
            name: dest.to_string(),
        },
        cancelled: false,
        cancellation_code: None,
        diverted: false,
    }
}

/// 2024-03-07 14:05:09 local time
pub fn fixed_start() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap()
}

/// Sink that accepts `capacity` bytes and then fails like a full disk
pub struct FullDisk {
    capacity: usize,
    used: usize,
}

impl FullDisk {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, used: 0 }
    }
}

impl Write for FullDisk {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.used + buf.len() > self.capacity {
            return Err(io::Error::new(io::ErrorKind::Other, "no space left on device"));
        }
        self.used += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
