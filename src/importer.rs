use std::path::Path;

use bigdecimal::{BigDecimal, FromPrimitive, Zero};
use calamine::{Data, Reader};
use sha2::{Digest, Sha256};

use crate::error::{ReconError, Result};
use crate::evidence;
use crate::models::{AccountOption, CounterpartyOption, ExistingEntry, Operation, ParsedEntry};

// ---------------------------------------------------------------------------
// Cell decoding helpers
// ---------------------------------------------------------------------------

/// Decode a cell to trimmed text. Numeric cells render without a trailing
/// `.0` so numeric-looking labels survive a round trip through Excel.
fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Decode a cell as an exact decimal. Text cells tolerate comma grouping;
/// anything unparseable is a failure, not a silent zero. Float cells keep
/// their exact binary value so a tainted sum fails equality honestly.
fn cell_amount(cell: Option<&Data>) -> Option<BigDecimal> {
    match cell {
        Some(Data::Float(f)) => BigDecimal::from_f64(*f),
        Some(Data::Int(i)) => Some(BigDecimal::from(*i)),
        Some(Data::String(s)) => {
            let s = s.replace(',', "");
            s.trim().parse().ok()
        }
        _ => None,
    }
}

/// Option labels carry a parenthetical suffix ("대한건설 (본공사)");
/// matching compares the trimmed prefix before the first '(' only.
fn strip_parenthetical(label: &str) -> &str {
    label.split('(').next().unwrap_or("").trim()
}

pub fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// Row Parser
// ---------------------------------------------------------------------------

/// Reference snapshots an import runs against. Read-only; the parser
/// never mutates or caches them.
pub struct ImportContext<'a> {
    pub accounts: &'a [AccountOption],
    pub existing: &'a [ExistingEntry],
    pub counterparties: Option<&'a [CounterpartyOption]>,
}

pub struct ParseOutcome {
    pub entries: Vec<ParsedEntry>,
    /// Running sum of the amounts that parsed as positive numbers.
    pub total: BigDecimal,
}

/// Parse the first worksheet into ledger entries.
///
/// Row 1 is the header. A row is skipped only when both its account-name
/// and evidence-type cells are blank. Matching against `ctx.existing` is
/// positional: the Nth non-blank row pairs with the Nth existing entry,
/// so reordering sheet rows reassigns which persisted records get updated.
pub fn parse_workbook(path: &Path, ctx: &ImportContext) -> Result<ParseOutcome> {
    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| ReconError::Workbook(e.to_string()))?;
    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ReconError::NoWorksheet)?;
    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| ReconError::Workbook(e.to_string()))?;

    let mut entries = Vec::new();
    let mut total = BigDecimal::zero();
    let mut matched = 0usize;

    for (idx, row) in range.rows().enumerate().skip(1) {
        let row_number = (idx + 1) as u32;
        let account_name = cell_text(row.get(0));
        let evidence_raw = cell_text(row.get(3));
        if account_name.is_empty() && evidence_raw.is_empty() {
            continue;
        }

        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let evidence_code = match evidence::code_for_label(&evidence_raw) {
            Some(code) => code.to_string(),
            None if evidence_raw.is_empty() => String::new(),
            None => {
                errors.push(format!("unknown evidence type '{evidence_raw}'"));
                String::new()
            }
        };

        let account = ctx
            .accounts
            .iter()
            .find(|a| !a.is_category_only && a.label == account_name)
            .map(|a| a.id);
        if account.is_none() {
            errors.push(format!("unknown account '{account_name}'"));
        }

        let amount = match cell_amount(row.get(2)) {
            Some(a) => {
                if a > BigDecimal::zero() {
                    total += &a;
                } else {
                    errors.push("amount must be greater than zero".to_string());
                }
                a
            }
            None => {
                errors.push("amount is not a number".to_string());
                BigDecimal::zero()
            }
        };

        let counterparty_raw = cell_text(row.get(4));
        let mut counterparty_ref = None;
        if !counterparty_raw.is_empty() {
            if let Some(options) = ctx.counterparties {
                match options
                    .iter()
                    .find(|o| strip_parenthetical(&o.label) == counterparty_raw)
                {
                    Some(option) => counterparty_ref = Some(option.id),
                    None => {
                        warnings.push(format!("unmatched counterparty '{counterparty_raw}'"))
                    }
                }
            }
        }

        // Positional pairing: only existing entries that carry an id can
        // become update targets; the slot is consumed either way.
        let existing_ref = ctx.existing.get(matched).and_then(|e| e.id);
        matched += 1;
        let operation = if existing_ref.is_some() {
            Operation::Update
        } else {
            Operation::Create
        };

        let trader = cell_text(row.get(1));
        let is_valid = errors.is_empty();
        entries.push(ParsedEntry {
            account_name,
            account,
            trader,
            amount,
            evidence_type_raw: evidence_raw,
            evidence_type_code: evidence_code,
            counterparty_name: (!counterparty_raw.is_empty()).then_some(counterparty_raw),
            counterparty_ref,
            existing_ref,
            row_number,
            operation,
            is_valid,
            errors,
            warnings,
        });
    }

    Ok(ParseOutcome { entries, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use rust_xlsxwriter::Workbook;

    fn accounts() -> Vec<AccountOption> {
        vec![
            AccountOption { id: 10, label: "공사비".to_string(), is_category_only: false },
            AccountOption { id: 11, label: "설계비".to_string(), is_category_only: false },
            AccountOption { id: 12, label: "사업비".to_string(), is_category_only: true },
        ]
    }

    fn existing(ids: &[Option<i64>]) -> Vec<ExistingEntry> {
        ids.iter()
            .map(|id| ExistingEntry {
                id: *id,
                account_id: Some(10),
                account_name: "공사비".to_string(),
                trader: String::new(),
                amount: BigDecimal::from(1000),
                evidence_type_code: "1".to_string(),
                contract_id: None,
                contract_name: None,
                affiliate_id: None,
                affiliate_name: None,
            })
            .collect()
    }

    fn ctx<'a>(
        accounts: &'a [AccountOption],
        existing: &'a [ExistingEntry],
        counterparties: Option<&'a [CounterpartyOption]>,
    ) -> ImportContext<'a> {
        ImportContext { accounts, existing, counterparties }
    }

    fn write_sheet(dir: &Path, name: &str, rows: &[(&str, &str, f64, &str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["계정과목", "거래자", "금액", "증빙유형", "계약명"]
            .iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (i, (account, trader, amount, ev, cp)) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            sheet.write_string(r, 0, *account).unwrap();
            sheet.write_string(r, 1, *trader).unwrap();
            sheet.write_number(r, 2, *amount).unwrap();
            sheet.write_string(r, 3, *ev).unwrap();
            sheet.write_string(r, 4, *cp).unwrap();
        }
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_parse_valid_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("공사비", "대한건설", 1000.0, "세금계산서", ""),
            ("설계비", "한빛설계", 2000.0, "계산서(면세)", ""),
        ]);
        let accounts = accounts();
        let outcome = parse_workbook(&path, &ctx(&accounts, &[], None)).unwrap();

        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.total, BigDecimal::from(3000));
        let first = &outcome.entries[0];
        assert_eq!(first.account, Some(10));
        assert_eq!(first.trader, "대한건설");
        assert_eq!(first.evidence_type_code, "1");
        assert_eq!(first.row_number, 2);
        assert!(first.is_valid);
        assert_eq!(outcome.entries[1].evidence_type_code, "2");
    }

    #[test]
    fn test_blank_row_sentinel_checks_only_account_and_evidence() {
        let dir = tempfile::tempdir().unwrap();
        // Middle row has a trader and an amount but no account/evidence:
        // it is a blank row by the sentinel rule and must not be counted.
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("공사비", "대한건설", 1000.0, "세금계산서", ""),
            ("", "떠돌이", 999.0, "", ""),
            ("설계비", "", 2000.0, "세금계산서", ""),
        ]);
        let accounts = accounts();
        let outcome = parse_workbook(&path, &ctx(&accounts, &[], None)).unwrap();

        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.total, BigDecimal::from(3000));
        assert_eq!(outcome.entries[1].row_number, 4);
    }

    #[test]
    fn test_unknown_evidence_label_is_cited() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("공사비", "", 1000.0, "알수없음", ""),
        ]);
        let accounts = accounts();
        let outcome = parse_workbook(&path, &ctx(&accounts, &[], None)).unwrap();

        let entry = &outcome.entries[0];
        assert!(!entry.is_valid);
        assert!(entry.errors.iter().any(|e| e.contains("알수없음")));
        assert_eq!(entry.evidence_type_code, "");
    }

    #[test]
    fn test_empty_evidence_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("공사비", "", 1000.0, "", ""),
        ]);
        let accounts = accounts();
        let outcome = parse_workbook(&path, &ctx(&accounts, &[], None)).unwrap();

        let entry = &outcome.entries[0];
        assert!(entry.is_valid);
        assert_eq!(entry.evidence_type_raw, "");
        assert_eq!(entry.evidence_type_code, "");
    }

    #[test]
    fn test_unknown_account_is_cited() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("감리비", "", 1000.0, "세금계산서", ""),
        ]);
        let accounts = accounts();
        let outcome = parse_workbook(&path, &ctx(&accounts, &[], None)).unwrap();

        let entry = &outcome.entries[0];
        assert!(!entry.is_valid);
        assert_eq!(entry.account, None);
        assert!(entry.errors.iter().any(|e| e.contains("감리비")));
    }

    #[test]
    fn test_category_only_accounts_never_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("사업비", "", 1000.0, "세금계산서", ""),
        ]);
        let accounts = accounts();
        let outcome = parse_workbook(&path, &ctx(&accounts, &[], None)).unwrap();

        assert_eq!(outcome.entries[0].account, None);
        assert!(!outcome.entries[0].is_valid);
    }

    #[test]
    fn test_nonpositive_amount_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("공사비", "", -100.0, "세금계산서", ""),
            ("설계비", "", 500.0, "세금계산서", ""),
        ]);
        let accounts = accounts();
        let outcome = parse_workbook(&path, &ctx(&accounts, &[], None)).unwrap();

        assert!(!outcome.entries[0].is_valid);
        assert!(outcome.entries[1].is_valid);
        // Invalid amounts do not contribute to the running total.
        assert_eq!(outcome.total, BigDecimal::from(500));
    }

    #[test]
    fn test_text_amount_cells_parse_with_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "계정과목").unwrap();
        sheet.write_string(1, 0, "공사비").unwrap();
        sheet.write_string(1, 2, "1,500,000").unwrap();
        sheet.write_string(1, 3, "세금계산서").unwrap();
        workbook.save(&path).unwrap();

        let accounts = accounts();
        let outcome = parse_workbook(&path, &ctx(&accounts, &[], None)).unwrap();
        assert!(outcome.entries[0].is_valid);
        assert_eq!(outcome.total, BigDecimal::from(1_500_000));
    }

    #[test]
    fn test_non_numeric_amount_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "계정과목").unwrap();
        sheet.write_string(1, 0, "공사비").unwrap();
        sheet.write_string(1, 2, "천만원").unwrap();
        sheet.write_string(1, 3, "세금계산서").unwrap();
        workbook.save(&path).unwrap();

        let accounts = accounts();
        let outcome = parse_workbook(&path, &ctx(&accounts, &[], None)).unwrap();
        assert!(!outcome.entries[0].is_valid);
        assert!(outcome.entries[0]
            .errors
            .iter()
            .any(|e| e.contains("not a number")));
    }

    #[test]
    fn test_counterparty_matches_prefix_before_parenthesis() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("공사비", "", 1000.0, "세금계산서", "대한건설"),
            ("설계비", "", 2000.0, "세금계산서", "모르는회사"),
        ]);
        let accounts = accounts();
        let options = vec![
            CounterpartyOption { id: 71, label: "대한건설 (본공사)".to_string() },
            CounterpartyOption { id: 72, label: "한빛설계 (실시설계)".to_string() },
        ];
        let outcome = parse_workbook(&path, &ctx(&accounts, &[], Some(&options))).unwrap();

        assert_eq!(outcome.entries[0].counterparty_ref, Some(71));
        assert!(outcome.entries[0].warnings.is_empty());

        // An unmatched counterparty warns but does not invalidate the row.
        assert_eq!(outcome.entries[1].counterparty_ref, None);
        assert!(outcome.entries[1].is_valid);
        assert!(outcome.entries[1]
            .warnings
            .iter()
            .any(|w| w.contains("모르는회사")));
    }

    #[test]
    fn test_counterparty_skipped_without_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("공사비", "", 1000.0, "세금계산서", "대한건설"),
        ]);
        let accounts = accounts();
        let outcome = parse_workbook(&path, &ctx(&accounts, &[], None)).unwrap();

        let entry = &outcome.entries[0];
        assert_eq!(entry.counterparty_name.as_deref(), Some("대한건설"));
        assert_eq!(entry.counterparty_ref, None);
        assert!(entry.warnings.is_empty());
    }

    #[test]
    fn test_positional_matching_consumes_slots_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("공사비", "", 1000.0, "세금계산서", ""),
            ("설계비", "", 2000.0, "세금계산서", ""),
            ("공사비", "", 3000.0, "세금계산서", ""),
        ]);
        let accounts = accounts();
        let existing = existing(&[Some(11), Some(12)]);
        let outcome = parse_workbook(&path, &ctx(&accounts, &existing, None)).unwrap();

        assert_eq!(outcome.entries[0].existing_ref, Some(11));
        assert_eq!(outcome.entries[0].operation, Operation::Update);
        assert_eq!(outcome.entries[1].existing_ref, Some(12));
        assert_eq!(outcome.entries[2].existing_ref, None);
        assert_eq!(outcome.entries[2].operation, Operation::Create);
    }

    #[test]
    fn test_existing_entry_without_id_forces_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("공사비", "", 1000.0, "세금계산서", ""),
            ("설계비", "", 2000.0, "세금계산서", ""),
        ]);
        let accounts = accounts();
        let existing = existing(&[None, Some(12)]);
        let outcome = parse_workbook(&path, &ctx(&accounts, &existing, None)).unwrap();

        // The id-less entry still consumes the first slot.
        assert_eq!(outcome.entries[0].operation, Operation::Create);
        assert_eq!(outcome.entries[1].existing_ref, Some(12));
    }

    #[test]
    fn test_unreadable_workbook_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a workbook").unwrap();
        let accounts = accounts();
        let result = parse_workbook(&path, &ctx(&accounts, &[], None));
        assert!(matches!(result, Err(ReconError::Workbook(_))));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(dir.path(), "entries.xlsx", &[
            ("공사비", "대한건설", 1000.0, "세금계산서", ""),
            ("없는계정", "", -5.0, "알수없음", ""),
        ]);
        let accounts = accounts();
        let existing = existing(&[Some(11)]);
        let first = parse_workbook(&path, &ctx(&accounts, &existing, None)).unwrap();
        let second = parse_workbook(&path, &ctx(&accounts, &existing, None)).unwrap();
        assert_eq!(first.entries, second.entries);
        assert_eq!(first.total, second.total);
    }
}
