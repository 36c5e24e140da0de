//! Application constants for the flight importer
//!
//! This module contains the recognised CSV column names, processing defaults
//! and store labels used throughout the importer.

// =============================================================================
// CSV Column Names
// =============================================================================

/// Column names recognised in flight punctuality extracts
pub mod columns {
    pub const FL_DATE: &str = "FL_DATE";
    pub const AIRLINE: &str = "AIRLINE";
    pub const AIRLINE_DOT: &str = "AIRLINE_DOT";
    pub const AIRLINE_CODE: &str = "AIRLINE_CODE";
    pub const FL_NUMBER: &str = "FL_NUMBER";
    pub const ORIGIN: &str = "ORIGIN";
    pub const ORIGIN_CITY: &str = "ORIGIN_CITY";
    pub const DEST: &str = "DEST";
    pub const DEST_CITY: &str = "DEST_CITY";
    pub const CRS_DEP_TIME: &str = "CRS_DEP_TIME";
    pub const DEP_TIME: &str = "DEP_TIME";
    pub const CRS_ARR_TIME: &str = "CRS_ARR_TIME";
    pub const ARR_TIME: &str = "ARR_TIME";
    pub const CANCELLED: &str = "CANCELLED";
    pub const CANCELLATION_CODE: &str = "CANCELLATION_CODE";
    pub const DIVERTED: &str = "DIVERTED";
    pub const ARR_DELAY: &str = "ARR_DELAY";
    pub const DELAY_DUE_CARRIER: &str = "DELAY_DUE_CARRIER";
    pub const DELAY_DUE_WEATHER: &str = "DELAY_DUE_WEATHER";
    pub const DELAY_DUE_NAS: &str = "DELAY_DUE_NAS";
    pub const DELAY_DUE_SECURITY: &str = "DELAY_DUE_SECURITY";
    pub const DELAY_DUE_LATE_AIRCRAFT: &str = "DELAY_DUE_LATE_AIRCRAFT";

    /// Columns a record must reach for it to be parseable at all
    pub const ESSENTIAL: &[&str] = &[
        FL_DATE,
        AIRLINE_CODE,
        FL_NUMBER,
        ORIGIN,
        DEST,
        CRS_DEP_TIME,
        CRS_ARR_TIME,
    ];
}

// =============================================================================
// Processing Defaults
// =============================================================================

/// Successfully processed rows per committed transaction
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Processed rows between progress snapshots in the audit log
pub const DEFAULT_PROGRESS_INTERVAL: usize = 5000;

/// Default SQLite database file
pub const DEFAULT_DATABASE_PATH: &str = "flights.db";

/// Default directory for audit logs
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Audit log file name prefix; the run's start timestamp completes the name
pub const AUDIT_LOG_PREFIX: &str = "import_errors_";

/// Timestamp format embedded in audit log file names (ddMMyyyy_HHmmss)
pub const AUDIT_LOG_TIMESTAMP_FORMAT: &str = "%d%m%Y_%H%M%S";

/// Number of skip reasons listed in summaries
pub const TOP_SKIP_REASONS: usize = 10;

/// Modulus applied to the route hash when deriving a synthetic flight number
pub const SYNTHETIC_FLIGHT_NUMBER_MODULUS: i32 = 10_000;

// =============================================================================
// Configuration Environment Variables
// =============================================================================

pub const ENV_DATABASE_PATH: &str = "FLIGHT_IMPORTER_DATABASE";
pub const ENV_LOG_DIR: &str = "FLIGHT_IMPORTER_LOG_DIR";
pub const ENV_BATCH_SIZE: &str = "FLIGHT_IMPORTER_BATCH_SIZE";

/// Directory under the user config dir holding `config.toml`
pub const CONFIG_DIR_NAME: &str = "flight-importer";
pub const CONFIG_FILE_NAME: &str = "config.toml";
