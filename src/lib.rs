//! Flight Importer Library
//!
//! A Rust library for loading flight punctuality CSV extracts into a
//! normalised SQLite store of airports, airlines, flights and delay reasons.
//!
//! This library provides tools for:
//! - Parsing loosely structured CSV lines with quoted fields
//! - Mapping order-independent headers to column positions
//! - Normalising records, deriving missing values and classifying skipped rows
//! - Normalising heterogeneous clock times into HHMM integers
//! - Writing flights in batched transactions with per-row recovery
//! - Tracking run statistics and writing a durable audit log of every anomaly

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod flight_csv_parser;
        pub mod flight_store;
        pub mod import_stats;
        pub mod importer;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Airline, Airport, DelayCategory, FlightRecord, SkipReason};
pub use app::services::importer::{CsvImporter, ImportReport};
pub use config::{ImportConfig, SchemaMode};

/// Result type alias for the flight importer
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for flight import operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Database operation failed
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration file could not be parsed
    #[error("Configuration file '{path}' is invalid")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Input file has no header line
    #[error("No header line in CSV file '{file}'")]
    MissingHeader { file: String },

    /// A run failed after row processing started; the partial report is kept
    #[error("Import aborted after {} attempted rows", .report.attempted_rows())]
    ImportAborted {
        report: Box<app::services::importer::ImportReport>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a database error with context
    pub fn database(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a configuration parse error
    pub fn config_parse(path: impl Into<String>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a missing header error
    pub fn missing_header(file: impl Into<String>) -> Self {
        Self::MissingHeader { file: file.into() }
    }

    /// Wrap a fatal cause together with the statistics gathered so far
    pub fn import_aborted(report: app::services::importer::ImportReport, source: Error) -> Self {
        Self::ImportAborted {
            report: Box::new(report),
            source: Box::new(source),
        }
    }

    /// Short, stable name of the error variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "Io",
            Self::Database { .. } => "Database",
            Self::Configuration { .. } => "Configuration",
            Self::ConfigParse { .. } => "ConfigParse",
            Self::FileNotFound { .. } => "FileNotFound",
            Self::MissingHeader { .. } => "MissingHeader",
            Self::ImportAborted { .. } => "ImportAborted",
        }
    }

    /// Statistics of an aborted run, if the failure happened mid-run
    pub fn partial_report(&self) -> Option<&app::services::importer::ImportReport> {
        match self {
            Self::ImportAborted { report, .. } => Some(report),
            _ => None,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Database {
            message: "SQLite operation failed".to_string(),
            source: error,
        }
    }
}
