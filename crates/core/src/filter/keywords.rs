//! Static keyword tables used to broaden brand matching and to read filter
//! fields out of free text.
//!
//! The tables are ordered slices rather than maps: inference stops at the
//! first keyword found in the query, so the order below decides which entry
//! wins when several match (e.g. "pre-owned" must be checked before "new"
//! would be reached for "pre-owned like new").

use std::sync::LazyLock;

use regex::Regex;

/// Lowercase alias to lowercase canonical brand token.
///
/// Lets a brand filter of "iphone" also match devices whose brand is "Apple".
pub const BRAND_SYNONYMS: &[(&str, &str)] = &[
    ("iphone", "apple"),
    ("iphones", "apple"),
    ("pixel", "google"),
    ("google", "google"),
    ("galaxy", "samsung"),
    ("samsung", "samsung"),
    ("moto", "motorola"),
    ("motorola", "motorola"),
    ("oneplus", "oneplus"),
];

/// Lowercase keyword to display brand name, for inference from free text.
pub const BRAND_KEYWORDS: &[(&str, &str)] = &[
    ("iphone", "Apple"),
    ("iphones", "Apple"),
    ("apple", "Apple"),
    ("pixel", "Google"),
    ("google", "Google"),
    ("galaxy", "Samsung"),
    ("samsung", "Samsung"),
    ("motorola", "Motorola"),
    ("moto", "Motorola"),
    ("oneplus", "OnePlus"),
    ("nokia", "Nokia"),
    ("sony", "Sony"),
    ("xperia", "Sony"),
];

/// Lowercase keyword (misspellings included) to canonical condition.
pub const CONDITION_KEYWORDS: &[(&str, &str)] = &[
    ("pre-owned", "used"),
    ("preowned", "used"),
    ("refurb", "used"),
    ("refurbished", "used"),
    ("used", "used"),
    ("new", "new"),
];

/// An integer followed by an optional space and a gigabyte unit.
static SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(gb|g|gig|gigabyte|gigabytes)").expect("Invalid size regex")
});

/// Canonical brand token for a lowercase alias.
#[must_use]
pub fn brand_synonym(alias: &str) -> Option<&'static str> {
    lookup(BRAND_SYNONYMS, alias)
}

/// First brand keyword contained in `lowered_text`, as a display brand.
#[must_use]
pub fn brand_mentioned_in(lowered_text: &str) -> Option<&'static str> {
    first_contained(BRAND_KEYWORDS, lowered_text)
}

/// First condition keyword contained in `lowered_text`, as a condition.
#[must_use]
pub fn condition_mentioned_in(lowered_text: &str) -> Option<&'static str> {
    first_contained(CONDITION_KEYWORDS, lowered_text)
}

/// Storage size mentioned in `text`, normalized to `"<digits> GB"`.
#[must_use]
pub fn size_mentioned_in(text: &str) -> Option<String> {
    SIZE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|digits| format!("{} GB", digits.as_str()))
}

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| *value)
}

fn first_contained(
    table: &[(&'static str, &'static str)],
    lowered_text: &str,
) -> Option<&'static str> {
    table
        .iter()
        .find(|(keyword, _)| lowered_text.contains(keyword))
        .map(|(_, value)| *value)
}
