pub mod demo;
pub mod evidence;
pub mod import;
pub mod init;
pub mod template;

use clap::{Parser, Subcommand};

use crate::error::{ReconError, Result};
use crate::models::SystemType;
use crate::settings::load_settings;

/// Resolve the ledger system from an explicit flag, falling back to the
/// configured default.
pub(crate) fn resolve_system(flag: Option<&str>) -> Result<SystemType> {
    let key = match flag {
        Some(s) => s.to_string(),
        None => load_settings().default_system,
    };
    SystemType::parse(&key).ok_or(ReconError::UnknownSystem(key))
}

#[derive(Parser)]
#[command(
    name = "bulkrecon",
    about = "Spreadsheet bulk-edit reconciliation for ERP accounting ledgers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up bulkrecon: choose a data directory and defaults.
    Init {
        /// Path for bulkrecon data (default: ~/Documents/bulkrecon)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Default ledger system: company or project
        #[arg(long)]
        system: Option<String>,
    },
    /// Reconcile a bulk-edit spreadsheet against persisted entries.
    Import {
        /// Path to the .xlsx file to reconcile
        file: String,
        /// Account options JSON, fetched from the API
        #[arg(long)]
        accounts: String,
        /// Existing entries JSON for the transaction being edited
        #[arg(long)]
        existing: Option<String>,
        /// Counterparty options JSON (contracts or affiliates)
        #[arg(long)]
        counterparties: Option<String>,
        /// Target transaction amount the sheet must sum to
        #[arg(long)]
        target: String,
        /// Ledger system: company or project
        #[arg(long)]
        system: Option<String>,
        /// Write the reconciliation plan JSON here
        #[arg(long)]
        plan: Option<String>,
    },
    /// Generate a bulk-edit template, blank or pre-filled.
    Template {
        /// Output path (default: <data_dir>/exports/<label>_<timestamp>.xlsx)
        #[arg(long)]
        output: Option<String>,
        /// Pre-fill from an existing entries JSON
        #[arg(long = "from")]
        from: Option<String>,
        /// Ledger system: company or project
        #[arg(long)]
        system: Option<String>,
    },
    /// List the evidence-type vocabulary.
    Evidence,
    /// Write sample reference data and a filled workbook to explore bulkrecon.
    Demo,
}
