//! Command-line argument definitions for the flight importer
//!
//! Defines the CLI interface using the clap derive API.

use crate::config::{ImportConfig, SchemaMode};
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the flight importer
///
/// Loads flight punctuality CSV extracts into a normalised SQLite store of
/// airports, airlines, flights and delay reasons.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flight-importer",
    version,
    about = "Import flight punctuality CSV extracts into a normalised SQLite database",
    long_about = "Reads a flight punctuality CSV extract, normalises every row into airports, \
                  airlines, flights and delay reasons, and writes them to SQLite in batched \
                  transactions. Rows that cannot be imported are counted, classified and recorded \
                  in a per-run audit log."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Import a CSV extract into the database
    Import(ImportArgs),
    /// Create the database schema without importing anything
    InitDb(InitDbArgs),
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// CSV extract to import
    #[arg(value_name = "CSV")]
    pub csv_file: PathBuf,

    /// SQLite database file; created if missing
    #[arg(
        short = 'd',
        long = "database",
        value_name = "PATH",
        help = "SQLite database file"
    )]
    pub database: Option<PathBuf>,

    /// Directory for the per-run audit log
    #[arg(long = "log-dir", value_name = "DIR", help = "Directory for audit logs")]
    pub log_dir: Option<PathBuf>,

    /// Successfully processed rows per committed transaction
    #[arg(
        short = 'b',
        long = "batch-size",
        value_name = "ROWS",
        help = "Processed rows per committed transaction"
    )]
    pub batch_size: Option<usize>,

    /// Processed rows between progress snapshots in the audit log
    #[arg(
        long = "progress-interval",
        value_name = "ROWS",
        help = "Processed rows between progress snapshots"
    )]
    pub progress_interval: Option<usize>,

    /// Keep existing tables and rows instead of recreating the schema
    #[arg(long = "append", help = "Keep existing data instead of recreating tables")]
    pub append: bool,

    /// Path to configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long = "no-progress", help = "Disable the progress bar")]
    pub no_progress: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the init-db command
#[derive(Debug, Clone, Parser)]
pub struct InitDbArgs {
    /// SQLite database file; created if missing
    #[arg(
        short = 'd',
        long = "database",
        value_name = "PATH",
        help = "SQLite database file"
    )]
    pub database: Option<PathBuf>,

    /// Only create missing tables, keeping existing data
    #[arg(long = "append", help = "Keep existing data instead of recreating tables")]
    pub append: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

impl ImportArgs {
    pub fn validate(&self) -> Result<()> {
        if !self.csv_file.exists() {
            return Err(Error::file_not_found(self.csv_file.display().to_string()));
        }

        if !self.csv_file.is_file() {
            return Err(Error::configuration(format!(
                "Input path is not a file: {}",
                self.csv_file.display()
            )));
        }

        if self.batch_size == Some(0) {
            return Err(Error::configuration(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        if self.progress_interval == Some(0) {
            return Err(Error::configuration(
                "Progress interval must be greater than 0".to_string(),
            ));
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            log_level_for(self.verbose)
        }
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }

    /// Overlay the command-line flags on a loaded configuration
    pub fn apply_to(&self, mut config: ImportConfig) -> ImportConfig {
        if let Some(database) = &self.database {
            config.database_path = database.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = log_dir.clone();
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(interval) = self.progress_interval {
            config.progress_interval = interval;
        }
        if self.append {
            config.schema_mode = SchemaMode::Preserve;
        }
        if !self.show_progress() {
            config.show_progress = false;
        }
        config
    }
}

impl InitDbArgs {
    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose)
    }

    pub fn schema_mode(&self) -> SchemaMode {
        if self.append {
            SchemaMode::Preserve
        } else {
            SchemaMode::Recreate
        }
    }
}

fn log_level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    fn import_args(args: &[&str]) -> ImportArgs {
        match parse(args).command {
            Some(Commands::Import(import)) => import,
            other => panic!("expected import command, got {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        assert!(parse(&["flight-importer"]).command.is_none());
    }

    #[test]
    fn test_import_flags() {
        let args = import_args(&[
            "flight-importer",
            "import",
            "flights.csv",
            "--database",
            "out.db",
            "--batch-size",
            "250",
            "--append",
            "-vv",
        ]);

        assert_eq!(args.csv_file, PathBuf::from("flights.csv"));
        assert_eq!(args.database, Some(PathBuf::from("out.db")));
        assert_eq!(args.batch_size, Some(250));
        assert!(args.append);
        assert_eq!(args.get_log_level(), "debug");
        assert!(args.show_progress());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(
            Args::try_parse_from(["flight-importer", "import", "f.csv", "-q", "-v"]).is_err()
        );

        let args = import_args(&["flight-importer", "import", "f.csv", "-q"]);
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }

    #[test]
    fn test_flags_override_config() {
        let args = import_args(&[
            "flight-importer",
            "import",
            "f.csv",
            "--log-dir",
            "audit",
            "--progress-interval",
            "10",
            "--append",
            "--no-progress",
        ]);

        let config = args.apply_to(ImportConfig::default().with_batch_size(42));
        assert_eq!(config.log_dir, PathBuf::from("audit"));
        assert_eq!(config.progress_interval, 10);
        assert_eq!(config.batch_size, 42);
        assert_eq!(config.schema_mode, SchemaMode::Preserve);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_validate() {
        let csv = NamedTempFile::new().unwrap();
        let path = csv.path().to_str().unwrap();

        assert!(import_args(&["flight-importer", "import", path]).validate().is_ok());

        let error = import_args(&["flight-importer", "import", path, "-b", "0"])
            .validate()
            .unwrap_err();
        assert_eq!(error.kind(), "Configuration");

        let error = import_args(&["flight-importer", "import", "/no/such/file.csv"])
            .validate()
            .unwrap_err();
        assert_eq!(error.kind(), "FileNotFound");
    }

    #[test]
    fn test_init_db_schema_mode() {
        match parse(&["flight-importer", "init-db", "--append"]).command {
            Some(Commands::InitDb(args)) => {
                assert_eq!(args.schema_mode(), SchemaMode::Preserve);
                assert_eq!(args.get_log_level(), "warn");
            }
            other => panic!("expected init-db command, got {:?}", other),
        }
    }
}
