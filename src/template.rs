use std::path::Path;

use bigdecimal::{BigDecimal, ToPrimitive};
use rust_xlsxwriter::{Format, FormatBorder, Workbook};

use crate::error::Result;
use crate::evidence;
use crate::models::{ExistingEntry, SystemType};

/// Column headers shared with the Row Parser. Order is load-bearing: the
/// parser reads these positions back by index, so any change here breaks
/// round-tripping silently.
pub const BASE_HEADERS: [&str; 4] = ["계정과목", "거래자", "금액", "증빙유형"];

/// One pre-filled template row.
pub struct TemplateEntry {
    pub account_name: String,
    pub trader: String,
    pub amount: BigDecimal,
    pub evidence_label: String,
    pub counterparty: String,
}

impl TemplateEntry {
    /// Build template rows from persisted entries, mapping evidence codes
    /// back to the labels operators edit.
    pub fn from_existing(entries: &[ExistingEntry], system: SystemType) -> Vec<TemplateEntry> {
        entries
            .iter()
            .map(|e| TemplateEntry {
                account_name: e.account_name.clone(),
                trader: e.trader.clone(),
                amount: e.amount.clone(),
                evidence_label: evidence::label_for_code(&e.evidence_type_code)
                    .unwrap_or("")
                    .to_string(),
                counterparty: e.counterparty_name(system).unwrap_or("").to_string(),
            })
            .collect()
    }
}

pub fn default_filename(system: SystemType) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("{}_{stamp}.xlsx", system.file_label())
}

/// Write a bulk-edit template: styled header row plus one row per entry,
/// or a single empty row when `entries` is empty. No validation happens
/// here; this is the serialization mirror of the parser's column contract.
pub fn write_template(path: &Path, entries: &[TemplateEntry], system: SystemType) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(0xD9D9D9)
        .set_border(FormatBorder::Thin);

    for (col, header) in BASE_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    sheet.write_string_with_format(0, 4, system.counterparty_header(), &header_format)?;

    if entries.is_empty() {
        for col in 0..5u16 {
            sheet.write_string(1, col, "")?;
        }
    } else {
        for (i, entry) in entries.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, &entry.account_name)?;
            sheet.write_string(row, 1, &entry.trader)?;
            sheet.write_number(row, 2, entry.amount.to_f64().unwrap_or(0.0))?;
            sheet.write_string(row, 3, &entry.evidence_label)?;
            sheet.write_string(row, 4, &entry.counterparty)?;
        }
    }

    for col in 0..5u16 {
        sheet.set_column_width(col, 18)?;
    }

    workbook.save(path)?;
    Ok(())
}
