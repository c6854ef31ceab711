//! Headline metrics and category breakdowns of the management table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::categories::{resolve_series_key, CategoryCandidates};
use crate::models::{ColumnKey, NormalizedRow};
use crate::transformations::collation::compare_collated;

/// Active / resigned head counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterMetrics {
    pub total: usize,
    pub active: usize,
    pub resigned: usize,
}

impl RosterMetrics {
    /// Share of active rows in `0.0..=1.0`; `0.0` for an empty table.
    pub fn active_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.active as f64 / self.total as f64
        }
    }
}

pub fn roster_metrics(rows: &[NormalizedRow]) -> RosterMetrics {
    let active = rows.iter().filter(|r| r.is_active).count();
    RosterMetrics {
        total: rows.len(),
        active,
        resigned: rows.len() - active,
    }
}

/// Dimension of a summary breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryCategory {
    Department,
    Status,
}

impl SummaryCategory {
    pub fn column(&self) -> ColumnKey {
        match self {
            SummaryCategory::Department => ColumnKey::Department,
            SummaryCategory::Status => ColumnKey::Status,
        }
    }

    fn candidates<'a>(&self, candidates: &'a CategoryCandidates) -> &'a [String] {
        match self {
            SummaryCategory::Department => &candidates.departments,
            SummaryCategory::Status => &candidates.statuses,
        }
    }
}

/// One breakdown slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub name: String,
    pub value: usize,
}

/// Count rows per department or status.
///
/// Known candidates come first in candidate order; other values (including
/// the unknown key) follow by descending count, then by collation.
pub fn build_breakdown(
    rows: &[NormalizedRow],
    category: SummaryCategory,
    candidates: &CategoryCandidates,
) -> Vec<BreakdownEntry> {
    let order = category.candidates(candidates);
    let mut counter: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let key = resolve_series_key(row.cell_or_empty(category.column()), order);
        *counter.entry(key).or_insert(0) += 1;
    }

    let rank = |name: &str| order.iter().position(|c| c == name).unwrap_or(usize::MAX);
    let mut entries: Vec<BreakdownEntry> = counter
        .into_iter()
        .map(|(name, value)| BreakdownEntry { name, value })
        .collect();
    entries.sort_by(|a, b| {
        rank(&a.name)
            .cmp(&rank(&b.name))
            .then(b.value.cmp(&a.value))
            .then_with(|| compare_collated(&a.name, &b.name))
    });
    entries
}
