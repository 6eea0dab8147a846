use bigdecimal::BigDecimal;

use crate::importer::ParseOutcome;
use crate::models::{ExistingEntry, Operation, ReconciliationResult, Summary};

/// Assemble the final result: partition parsed rows into updates and
/// creates, mark the unmatched suffix of `existing` for deletion, and
/// compute the validity flag.
///
/// Validity requires every row valid and the computed total to equal
/// `target` exactly. Zero tolerance: a float-tainted sum that is off by
/// a hair fails rather than being rounded into agreement.
///
/// Business-rule problems never escape as errors here; they are already
/// folded into each row's `is_valid`.
pub fn reconcile(
    outcome: ParseOutcome,
    existing: &[ExistingEntry],
    target: &BigDecimal,
) -> ReconciliationResult {
    let ParseOutcome { entries, total } = outcome;

    let total_rows = entries.len();
    let valid_rows = entries.iter().filter(|e| e.is_valid).count();
    let all_valid = valid_rows == total_rows;

    let (to_update, to_create): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| e.operation == Operation::Update);
    let to_delete: Vec<ExistingEntry> = existing.iter().skip(total_rows).cloned().collect();

    let is_valid = all_valid && total == *target;

    let summary = Summary {
        total_rows,
        valid_rows,
        invalid_rows: total_rows - valid_rows,
        update_count: to_update.len(),
        create_count: to_create.len(),
        delete_count: to_delete.len(),
    };

    ReconciliationResult {
        to_update,
        to_create,
        to_delete,
        total_amount: total,
        is_valid,
        summary,
    }
}
