//! Run statistics and the per-run audit log
//!
//! - [`stats`] - Counters, skip tally and distinct airline/airport codes
//! - [`audit_log`] - Timestamp-named, line-flushed anomaly log

pub mod audit_log;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use audit_log::AuditLog;
pub use stats::{ImportStats, success_rate, top_skip_reasons};
