//! Checksum utilities for row-set snapshots.

use sha2::{Digest, Sha256};

use crate::models::NormalizedRow;

/// Calculate the SHA-256 checksum of `content` as lowercase hex.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checksum of a normalized row set, sensitive to row order and every cell.
pub fn rows_checksum(rows: &[NormalizedRow]) -> String {
    let mut hasher = Sha256::new();
    for row in rows {
        hasher.update(row.id.as_str().as_bytes());
        hasher.update([0x1e, u8::from(row.is_active)]);
        for (key, value) in row.cells() {
            hasher.update(key.as_str().as_bytes());
            hasher.update([0x1f]);
            hasher.update(value.as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update([0x1d]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnKey, RecordId};

    #[test]
    fn test_checksum_consistency() {
        let content = r#"{"名前": "山田"}"#;
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
        assert_eq!(calculate_checksum(content).len(), 64);
    }

    #[test]
    fn test_rows_checksum_detects_cell_changes() {
        let rows = vec![NormalizedRow::new(RecordId::from("1"), true).with_cell(ColumnKey::Status, "待機")];
        let mut changed = rows.clone();
        changed[0].set_cell(ColumnKey::Status, "稼働中");
        assert_eq!(rows_checksum(&rows), rows_checksum(&rows.clone()));
        assert_ne!(rows_checksum(&rows), rows_checksum(&changed));
        assert_ne!(rows_checksum(&rows), rows_checksum(&[]));
    }
}
