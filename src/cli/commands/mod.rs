//! Command implementations for the flight importer CLI
//!
//! - `import`: Load a CSV extract and print the run summary
//! - `schema`: Create the database tables only

pub mod import;
pub mod schema;
pub mod shared;

use crate::cli::args::{Args, Commands};
use anyhow::{Result, bail};

/// Dispatch to the subcommand handler
pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Import(import_args)) => import::run_import(import_args).map(|_| ()),
        Some(Commands::InitDb(init_args)) => schema::run_init_db(init_args),
        None => bail!("No command given"),
    }
}
