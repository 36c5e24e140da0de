//! The `init-db` command

use super::shared::setup_logging;
use crate::ImportConfig;
use crate::app::services::flight_store::{create_schema, open_database};
use crate::cli::args::InitDbArgs;
use anyhow::{Context, Result};
use colored::*;

/// Create the importer tables in the configured database
pub fn run_init_db(args: InitDbArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false)?;

    let mut config = ImportConfig::load_layered(None).context("Failed to load configuration")?;
    if let Some(database) = &args.database {
        config.database_path = database.clone();
    }
    config.validate()?;

    let conn = open_database(&config.database_path)?;
    create_schema(&conn, args.schema_mode())
        .with_context(|| format!("Failed to prepare {}", config.database_path.display()))?;

    println!(
        "{} {}",
        "Schema ready in".green(),
        config.database_path.display()
    );
    Ok(())
}
