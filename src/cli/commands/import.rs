//! The `import` command

use super::shared::{format_size, print_import_summary, setup_logging};
use crate::app::services::flight_store::{create_schema, open_database};
use crate::cli::args::ImportArgs;
use crate::{CsvImporter, Error, ImportConfig, ImportReport};
use anyhow::{Context, Result};
use std::fs;
use tracing::info;

/// Import one CSV extract and print the run summary
pub fn run_import(args: ImportArgs) -> Result<ImportReport> {
    setup_logging(args.get_log_level(), args.quiet)?;
    args.validate()?;

    let config = ImportConfig::load_layered(args.config_file.as_deref())
        .context("Failed to load configuration")?;
    let config = args.apply_to(config);
    config.validate()?;

    let file_size = fs::metadata(&args.csv_file)
        .with_context(|| format!("Failed to read metadata of {}", args.csv_file.display()))?
        .len();
    if !args.quiet {
        println!("Importing {}", args.csv_file.display());
        println!("File size: {}", format_size(file_size));
        println!("Database: {}", config.database_path.display());
    }

    let conn = open_database(&config.database_path)?;
    create_schema(&conn, config.schema_mode)?;

    info!(
        "Importing with batch size {} into {}",
        config.batch_size,
        config.database_path.display()
    );

    match CsvImporter::new(&conn, config).import(&args.csv_file) {
        Ok(report) => {
            if !args.quiet {
                print_import_summary(&report, true);
            }
            Ok(report)
        }
        Err(error) => {
            if let Error::ImportAborted { report, .. } = &error {
                print_import_summary(report, false);
            }
            Err(error).context(format!("Import of {} failed", args.csv_file.display()))
        }
    }
}
