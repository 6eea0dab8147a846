use bigdecimal::BigDecimal;

use crate::error::Result;
use crate::models::{AccountOption, CounterpartyOption, ExistingEntry, SystemType};
use crate::settings::get_data_dir;
use crate::template::{write_template, TemplateEntry};

const ACCOUNTS: &[(i64, &str, bool)] = &[
    (1, "사업비", true),
    (2, "공사비", false),
    (3, "설계비", false),
    (4, "감리비", false),
    (5, "분양경비", false),
];

const COUNTERPARTIES: &[(i64, &str)] = &[
    (71, "대한건설 (본공사 도급계약)"),
    (72, "한빛설계 (실시설계 용역)"),
    (73, "정도감리 (책임감리 용역)"),
];

/// Sheet rows: (account, trader, amount, evidence label, counterparty).
/// The first two line up with the persisted entries below; the third is new.
const SHEET_ROWS: &[(&str, &str, i64, &str, &str)] = &[
    ("공사비", "대한건설", 150_000_000, "세금계산서", "대한건설"),
    ("설계비", "한빛설계", 35_000_000, "세금계산서", "한빛설계"),
    ("감리비", "정도감리", 12_000_000, "계산서(면세)", "정도감리"),
];

fn existing_entries() -> Vec<ExistingEntry> {
    vec![
        ExistingEntry {
            id: Some(501),
            account_id: Some(2),
            account_name: "공사비".to_string(),
            trader: "대한건설".to_string(),
            amount: BigDecimal::from(150_000_000),
            evidence_type_code: "1".to_string(),
            contract_id: Some(71),
            contract_name: Some("대한건설 (본공사 도급계약)".to_string()),
            affiliate_id: None,
            affiliate_name: None,
        },
        ExistingEntry {
            id: Some(502),
            account_id: Some(3),
            account_name: "설계비".to_string(),
            trader: "한빛설계".to_string(),
            amount: BigDecimal::from(35_000_000),
            evidence_type_code: "1".to_string(),
            contract_id: Some(72),
            contract_name: Some("한빛설계 (실시설계 용역)".to_string()),
            affiliate_id: None,
            affiliate_name: None,
        },
    ]
}

pub fn run() -> Result<()> {
    let dir = get_data_dir().join("demo");
    std::fs::create_dir_all(&dir)?;

    let accounts: Vec<AccountOption> = ACCOUNTS
        .iter()
        .map(|(id, label, category_only)| AccountOption {
            id: *id,
            label: label.to_string(),
            is_category_only: *category_only,
        })
        .collect();
    let counterparties: Vec<CounterpartyOption> = COUNTERPARTIES
        .iter()
        .map(|(id, label)| CounterpartyOption { id: *id, label: label.to_string() })
        .collect();
    let existing = existing_entries();

    std::fs::write(
        dir.join("accounts.json"),
        format!("{}\n", serde_json::to_string_pretty(&accounts)?),
    )?;
    std::fs::write(
        dir.join("counterparties.json"),
        format!("{}\n", serde_json::to_string_pretty(&counterparties)?),
    )?;
    std::fs::write(
        dir.join("existing.json"),
        format!("{}\n", serde_json::to_string_pretty(&existing)?),
    )?;

    let rows: Vec<TemplateEntry> = SHEET_ROWS
        .iter()
        .map(|(account, trader, amount, evidence, counterparty)| TemplateEntry {
            account_name: account.to_string(),
            trader: trader.to_string(),
            amount: BigDecimal::from(*amount),
            evidence_label: evidence.to_string(),
            counterparty: counterparty.to_string(),
        })
        .collect();
    write_template(&dir.join("entries.xlsx"), &rows, SystemType::Project)?;

    let total: i64 = SHEET_ROWS.iter().map(|r| r.2).sum();
    let dir = dir.display();
    println!("Wrote demo data to {dir}");
    println!();
    println!("Try:");
    println!(
        "  bulkrecon import {dir}/entries.xlsx --accounts {dir}/accounts.json \\\n    --existing {dir}/existing.json --counterparties {dir}/counterparties.json \\\n    --target {total} --system project"
    );
    Ok(())
}
