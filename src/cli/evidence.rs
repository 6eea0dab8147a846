use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::evidence::EVIDENCE_TYPES;

pub fn run() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Label", "Code"]);
    for (label, code) in EVIDENCE_TYPES {
        table.add_row(vec![Cell::new(label), Cell::new(code)]);
    }
    println!("{table}");
    Ok(())
}
