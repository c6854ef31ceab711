//! Locale-aware string ordering for the `ja` deployment locale.
//!
//! Comparison runs on a folded collation key: lower-cased, full-width ASCII
//! folded to half-width and katakana folded onto hiragana, so inputs such
//! as `カイハツ`/`かいはつ` and `ＡＢＣ`/`abc` sort together. Ties on the
//! key fall back to the lower-cased text and then the raw text, which keeps
//! the order total.

use std::cmp::Ordering;

const FULLWIDTH_START: u32 = 0xFF01;
const FULLWIDTH_END: u32 = 0xFF5E;
const FULLWIDTH_OFFSET: u32 = 0xFEE0;
const KATAKANA_START: u32 = 0x30A1;
const KATAKANA_END: u32 = 0x30F6;
const KANA_OFFSET: u32 = 0x60;

fn fold_char(c: char) -> char {
    let code = c as u32;
    let folded = match code {
        FULLWIDTH_START..=FULLWIDTH_END => code - FULLWIDTH_OFFSET,
        0x3000 => 0x20,
        KATAKANA_START..=KATAKANA_END => code - KANA_OFFSET,
        _ => code,
    };
    char::from_u32(folded).unwrap_or(c)
}

/// Folded key used for collation.
pub fn collation_key(text: &str) -> String {
    text.chars()
        .map(fold_char)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two strings under the deployment collation.
pub fn compare_collated(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Sort strings in place under the deployment collation.
pub fn sort_collated(values: &mut [String]) {
    values.sort_by(|a, b| compare_collated(a, b));
}
