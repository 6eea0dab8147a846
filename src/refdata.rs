//! Loaders for the reference snapshots an import runs against. The SPA
//! fetches these from the API; here they arrive as JSON files in the API
//! wire shape (camelCase) and are held read-only for the duration of a run.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{ReconError, Result};
use crate::models::{AccountOption, CounterpartyOption, ExistingEntry};

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ReconError::Other(format!("cannot read {what} file {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| ReconError::Other(format!("cannot parse {what} file {}: {e}", path.display())))
}

pub fn load_accounts(path: &Path) -> Result<Vec<AccountOption>> {
    load_json(path, "account options")
}

pub fn load_counterparties(path: &Path) -> Result<Vec<CounterpartyOption>> {
    load_json(path, "counterparty options")
}

pub fn load_existing(path: &Path) -> Result<Vec<ExistingEntry>> {
    load_json(path, "existing entries")
}
