//! Cell-level diff between a draft row set and the row set it was copied from.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{ColumnDescriptor, ColumnKey, NormalizedRow, RecordId};
use crate::transformations::is_blank_cell;

/// Display name used when the original row has no name.
pub const FALLBACK_DISPLAY_NAME: &str = "社員";

/// One changed (row, column) pair awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    pub row_id: RecordId,
    pub display_name: String,
    pub column_key: ColumnKey,
    pub column_label: String,
    pub from_value: String,
    pub to_value: String,
}

/// Index rows by id.
pub fn row_map_by_id(rows: &[NormalizedRow]) -> HashMap<&RecordId, &NormalizedRow> {
    rows.iter().map(|row| (&row.id, row)).collect()
}

/// Whether one cell differs between draft and original after normalization.
///
/// Non-editable columns never count as changed.
pub fn is_cell_changed<N>(
    draft: &NormalizedRow,
    original: &NormalizedRow,
    column: &ColumnDescriptor,
    normalize: N,
) -> bool
where
    N: Fn(&str) -> String,
{
    column.key.is_editable()
        && normalize(original.cell_or_empty(column.key)) != normalize(draft.cell_or_empty(column.key))
}

/// Build the pending change list, row-major in draft order, then in column
/// descriptor order.
///
/// Draft rows with no counterpart in `original` are skipped. Equality is
/// decided on `normalize`d display values, so `""` and `"-"` never differ.
///
/// # Arguments
/// * `draft` - Edited rows
/// * `original` - Rows the draft was copied from
/// * `columns` - Column descriptors; non-editable columns are ignored
/// * `normalize` - Display normalization applied to both sides
pub fn build_pending_changes<N>(
    draft: &[NormalizedRow],
    original: &[NormalizedRow],
    columns: &[ColumnDescriptor],
    normalize: N,
) -> Vec<PendingChange>
where
    N: Fn(&str) -> String,
{
    let originals = row_map_by_id(original);
    let mut changes = Vec::new();

    for row in draft {
        let Some(before) = originals.get(&row.id) else {
            continue;
        };
        let display_name = before
            .cell(ColumnKey::Name)
            .filter(|name| !is_blank_cell(name))
            .unwrap_or(FALLBACK_DISPLAY_NAME);

        for column in columns.iter().filter(|c| c.key.is_editable()) {
            let from_value = normalize(before.cell_or_empty(column.key));
            let to_value = normalize(row.cell_or_empty(column.key));
            if from_value != to_value {
                changes.push(PendingChange {
                    row_id: row.id.clone(),
                    display_name: display_name.to_string(),
                    column_key: column.key,
                    column_label: column.label.to_string(),
                    from_value,
                    to_value,
                });
            }
        }
    }

    changes
}
