//! Running counters for an import run

use crate::app::models::SkipReason;
use crate::app::services::flight_csv_parser::IdentifiedRoute;
use std::collections::{HashMap, HashSet};

/// Counters, skip tally and distinct codes seen during one run
///
/// Owned by a single run; `processed + skipped == attempted` holds after
/// every completed row.
#[derive(Debug, Clone, Default)]
pub struct ImportStats {
    /// Data rows found by the pre-scan
    pub total_rows: usize,

    /// Data rows read in the processing pass
    pub attempted_rows: usize,

    /// Rows that became stored flights
    pub processed_rows: usize,

    /// Rows rejected for any reason
    pub skipped_rows: usize,

    pub cancelled_flights: usize,
    pub diverted_flights: usize,

    /// Occurrences per skip label
    pub skip_reasons: HashMap<String, usize>,

    unique_airlines: HashSet<String>,
    unique_airports: HashSet<String>,
}

impl ImportStats {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            ..Self::default()
        }
    }

    /// Count a row read from the file
    pub fn record_attempt(&mut self) {
        self.attempted_rows += 1;
    }

    /// Note the codes and status flags of a row that passed identification
    pub fn record_route(&mut self, route: &IdentifiedRoute) {
        self.unique_airlines.insert(route.airline.code.clone());
        self.unique_airports.insert(route.origin.code.clone());
        self.unique_airports.insert(route.destination.code.clone());

        if route.cancelled {
            self.cancelled_flights += 1;
        }
        if route.diverted {
            self.diverted_flights += 1;
        }
    }

    pub fn record_processed(&mut self) {
        self.processed_rows += 1;
    }

    pub fn record_skip(&mut self, reason: &SkipReason) {
        self.skipped_rows += 1;
        *self.skip_reasons.entry(reason.label()).or_insert(0) += 1;
    }

    pub fn unique_airlines(&self) -> usize {
        self.unique_airlines.len()
    }

    pub fn unique_airports(&self) -> usize {
        self.unique_airports.len()
    }

    /// Processed rows as a percentage of attempted rows
    pub fn success_rate(&self) -> f64 {
        success_rate(self.processed_rows, self.attempted_rows)
    }

    /// Skip labels by descending count, ties broken by label
    pub fn top_skip_reasons(&self, limit: usize) -> Vec<(String, usize)> {
        top_skip_reasons(&self.skip_reasons, limit)
    }
}

/// Percentage of `processed` over `attempted`, 0 when nothing was attempted
pub fn success_rate(processed: usize, attempted: usize) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        (processed as f64 / attempted as f64) * 100.0
    }
}

/// Most frequent skip labels, descending by count and then by label
pub fn top_skip_reasons(tally: &HashMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut reasons: Vec<(String, usize)> = tally
        .iter()
        .map(|(label, count)| (label.clone(), *count))
        .collect();
    reasons.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    reasons.truncate(limit);
    reasons
}
