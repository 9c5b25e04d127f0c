//! Ordered detection tables for qualifier words, whole-range phrases and era markers.

use date_types::{CenturyQualifier, ComplexPhrase};

/// Per-side qualifier words, in priority order. The first pattern found
/// anywhere in the side wins, so "early to mid" reads as early.
pub const QUALIFIER_RULES: &[(&str, CenturyQualifier)] = &[
    ("early", CenturyQualifier::Early),
    ("mid", CenturyQualifier::Mid),
    ("late", CenturyQualifier::Late),
];

/// Whole-range phrases, in priority order.
pub const PHRASE_RULES: &[(&str, ComplexPhrase)] = &[
    ("mid", ComplexPhrase::Mid),
    ("third quarter", ComplexPhrase::ThirdQuarter),
];

/// Marker that puts the whole range before the common era.
pub const BCE_MARKER: &str = "bce";

/// Words that mark a side as a century reference rather than a plain year.
pub const CENTURY_WORDS: &[&str] = &["century", "centuries"];

/// Ordinal suffixes that follow a century number ("14th", "1st").
pub const ORDINAL_SUFFIXES: &[&str] = &["st", "nd", "rd", "th"];

/// Build a regex fragment matching a digit directly followed by an ordinal
/// suffix and a word boundary, e.g. "14th" or "1st".
pub fn build_ordinal_regex() -> String {
    format!(r"\d(?:{})\b", ORDINAL_SUFFIXES.join("|"))
}

/// First rule whose pattern occurs in `text`.
fn first_match<T: Copy>(rules: &[(&str, T)], text: &str) -> Option<T> {
    rules
        .iter()
        .find(|(pattern, _)| text.contains(*pattern))
        .map(|&(_, tag)| tag)
}

/// Qualifier for one side of a range; `Whole` when no word matches.
pub fn detect_qualifier(side: &str) -> CenturyQualifier {
    first_match(QUALIFIER_RULES, side).unwrap_or_default()
}

pub fn detect_phrase(side: &str) -> Option<ComplexPhrase> {
    first_match(PHRASE_RULES, side)
}

pub fn is_bce(side: &str) -> bool {
    side.contains(BCE_MARKER)
}
