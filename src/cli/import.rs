use std::path::{Path, PathBuf};

use bigdecimal::BigDecimal;
use colored::Colorize;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::cli::resolve_system;
use crate::error::{ReconError, Result};
use crate::fmt::money;
use crate::importer::{compute_checksum, parse_workbook, ImportContext};
use crate::models::{Operation, ParsedEntry, ReconciliationResult, SystemType};
use crate::reconciler::reconcile;
use crate::refdata;

/// Hand-off artifact for the persistence layer: everything it needs to
/// issue the batched create/update/delete calls, plus enough metadata to
/// recognize a re-submitted workbook.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Plan<'a> {
    source_file: String,
    checksum: String,
    system: SystemType,
    target_amount: &'a BigDecimal,
    #[serde(flatten)]
    result: &'a ReconciliationResult,
}

pub fn run(
    file: &str,
    accounts: &str,
    existing: Option<&str>,
    counterparties: Option<&str>,
    target: &str,
    system: Option<&str>,
    plan: Option<&str>,
) -> Result<()> {
    let system = resolve_system(system)?;
    let accounts = refdata::load_accounts(Path::new(accounts))?;
    let existing = match existing {
        Some(path) => refdata::load_existing(Path::new(path))?,
        None => Vec::new(),
    };
    let counterparties = match counterparties {
        Some(path) => Some(refdata::load_counterparties(Path::new(path))?),
        None => None,
    };
    let target: BigDecimal = target
        .trim()
        .parse()
        .map_err(|_| ReconError::InvalidAmount(target.to_string()))?;

    let file_path = PathBuf::from(file);
    let ctx = ImportContext {
        accounts: &accounts,
        existing: &existing,
        counterparties: counterparties.as_deref(),
    };
    let outcome = parse_workbook(&file_path, &ctx)?;
    let result = reconcile(outcome, &existing, &target);

    render(&result, &target);

    if let Some(plan_path) = plan {
        let plan_file = Plan {
            source_file: file_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(file)
                .to_string(),
            checksum: compute_checksum(&file_path)?,
            system,
            target_amount: &target,
            result: &result,
        };
        let json = serde_json::to_string_pretty(&plan_file)?;
        std::fs::write(plan_path, format!("{json}\n"))?;
        println!("Wrote plan to {plan_path}");
    }

    Ok(())
}

fn render(result: &ReconciliationResult, target: &BigDecimal) {
    let mut rows: Vec<&ParsedEntry> = result
        .to_update
        .iter()
        .chain(result.to_create.iter())
        .collect();
    rows.sort_by_key(|e| e.row_number);

    let mut table = Table::new();
    table.set_header(vec![
        "Row", "Account", "Trader", "Amount", "Evidence", "Counterparty", "Op", "Status",
    ]);
    for entry in &rows {
        let status = if entry.is_valid {
            Cell::new("ok".green())
        } else {
            Cell::new("invalid".red())
        };
        table.add_row(vec![
            Cell::new(entry.row_number),
            Cell::new(&entry.account_name),
            Cell::new(&entry.trader),
            Cell::new(money(&entry.amount)),
            Cell::new(&entry.evidence_type_raw),
            Cell::new(entry.counterparty_name.as_deref().unwrap_or("")),
            Cell::new(match entry.operation {
                Operation::Update => "update",
                Operation::Create => "create",
            }),
            status,
        ]);
    }
    println!("{table}");

    for entry in &rows {
        for err in &entry.errors {
            println!("{} row {}: {err}", "error".red().bold(), entry.row_number);
        }
        for warn in &entry.warnings {
            println!("{} row {}: {warn}", "warning".yellow().bold(), entry.row_number);
        }
    }

    let s = &result.summary;
    println!();
    println!(
        "Rows: {} total, {} valid, {} invalid",
        s.total_rows, s.valid_rows, s.invalid_rows
    );
    println!(
        "Plan: {} update, {} create, {} delete",
        s.update_count, s.create_count, s.delete_count
    );
    println!(
        "Total: {} (target {})",
        money(&result.total_amount),
        money(target)
    );

    if result.is_valid {
        println!("{}", "Reconciliation OK".green().bold());
    } else {
        if result.total_amount != *target {
            println!("{}", "Total does not match the target amount".red().bold());
        }
        if s.invalid_rows > 0 {
            let msg = format!("{} row(s) need fixes before submission", s.invalid_rows);
            println!("{}", msg.red().bold());
        }
    }
}
