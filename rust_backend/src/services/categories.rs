//! Category candidates and series-key normalization.
//!
//! Categorical cells (department, status, reason, client, gender) are matched
//! against a candidate list. Blank and placeholder inputs collapse into the
//! reserved [`UNKNOWN_CATEGORY`] key; values outside the list are kept
//! verbatim as their own key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::transformations::collation::{collation_key, compare_collated};

/// Reserved series key for blank or placeholder category values.
pub const UNKNOWN_CATEGORY: &str = "未選択";

/// Inputs treated as "no value" for categorical cells.
pub const UNKNOWN_INPUTS: &[&str] = &["", "-", "未設定", "未選択", "なし", "N/A"];

pub const DEFAULT_DEPARTMENTS: &[&str] = &["人事", "営業", "開発", "派遣"];
pub const DEFAULT_STATUSES: &[&str] = &["待機", "稼働中", "休職中"];
pub const DEFAULT_REASONS: &[&str] = &[
    "キャリアアップ",
    "同業他社転職",
    "家庭問題",
    "ITモチベ低下",
    "給与不満",
    "会社不信",
];
pub const DEFAULT_GENDERS: &[&str] = &["男性", "女性"];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Known names per categorical dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryCandidates {
    pub departments: Vec<String>,
    pub statuses: Vec<String>,
    pub reasons: Vec<String>,
    pub clients: Vec<String>,
    pub genders: Vec<String>,
}

impl Default for CategoryCandidates {
    fn default() -> Self {
        Self {
            departments: owned(DEFAULT_DEPARTMENTS),
            statuses: owned(DEFAULT_STATUSES),
            reasons: owned(DEFAULT_REASONS),
            clients: Vec::new(),
            genders: owned(DEFAULT_GENDERS),
        }
    }
}

/// Whether a categorical input means "no value".
pub fn is_unknown_category(value: &str) -> bool {
    UNKNOWN_INPUTS.contains(&value.trim())
}

/// Resolve a raw categorical value to its series key.
///
/// Candidates match under the collation key, so `ＩＴモチベ低下` resolves to
/// `ITモチベ低下`.
///
/// # Example
/// ```
/// use roster_rust::services::categories::resolve_series_key;
///
/// let candidates = vec!["営業".to_string(), "開発".to_string()];
/// assert_eq!(resolve_series_key(" 営業 ", &candidates), "営業");
/// assert_eq!(resolve_series_key("N/A", &candidates), "未選択");
/// assert_eq!(resolve_series_key("総務", &candidates), "総務");
/// ```
pub fn resolve_series_key(value: &str, candidates: &[String]) -> String {
    let trimmed = value.trim();
    if is_unknown_category(trimmed) {
        return UNKNOWN_CATEGORY.to_string();
    }
    if let Some(exact) = candidates.iter().find(|c| c.as_str() == trimmed) {
        return exact.clone();
    }
    let key = collation_key(trimmed);
    candidates
        .iter()
        .find(|c| collation_key(c) == key)
        .cloned()
        .unwrap_or_else(|| trimmed.to_string())
}

/// Final series key order: candidates first, then extra observed keys in
/// collation order, then [`UNKNOWN_CATEGORY`] when it was observed.
pub fn order_series_keys<'a, I>(candidates: &[String], observed: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut extras: BTreeSet<&str> = BTreeSet::new();
    let mut saw_unknown = false;
    for key in observed {
        if key == UNKNOWN_CATEGORY {
            saw_unknown = true;
        } else if !candidates.iter().any(|c| c == key) {
            extras.insert(key);
        }
    }

    let mut extras: Vec<&str> = extras.into_iter().collect();
    extras.sort_by(|a, b| compare_collated(a, b));

    let mut keys: Vec<String> = candidates
        .iter()
        .filter(|c| c.as_str() != UNKNOWN_CATEGORY)
        .cloned()
        .collect();
    keys.extend(extras.into_iter().map(str::to_string));
    if saw_unknown {
        keys.push(UNKNOWN_CATEGORY.to_string());
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_inputs() {
        for input in ["", "  ", "-", "未設定", "未選択", "なし", "N/A"] {
            assert!(is_unknown_category(input), "{input:?}");
        }
        assert!(!is_unknown_category("営業"));
    }

    #[test]
    fn test_candidates_match_under_collation() {
        let candidates = CategoryCandidates::default();
        assert_eq!(resolve_series_key("ＩＴモチベ低下", &candidates.reasons), "ITモチベ低下");
        assert_eq!(resolve_series_key("itモチベ低下", &candidates.reasons), "ITモチベ低下");
    }

    #[test]
    fn test_series_key_order() {
        let candidates = owned(&["人事", "営業"]);
        let keys = order_series_keys(&candidates, ["総務", "未選択", "営業", "Admin", "総務"]);
        assert_eq!(keys, vec!["人事", "営業", "Admin", "総務", "未選択"]);
    }

    #[test]
    fn test_series_key_order_without_unknown() {
        let candidates = owned(&["人事"]);
        assert_eq!(order_series_keys(&candidates, Vec::<&str>::new()), vec!["人事"]);
    }
}
