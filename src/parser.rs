use regex::Regex;
use std::sync::LazyLock;

use date_types::{CenturyQualifier, ComplexPhrase, EraSign, YearInterval};

use crate::century::{century_band, century_number, resolve};
use crate::error::{DateError, Result};
use crate::rules::{self, CENTURY_WORDS};

// ── Regex patterns ─────────────────────────────────────────────────
//
// Real data examples:
//   Plain ranges:      1375–1400
//                      ca. 1300s
//                      1400 or later
//   Centuries:         14th century
//                      early 14th century
//                      late 12th–early 13th century
//                      4th century BCE
//   Whole-range:       mid-14th century
//                      mid-14th to third quarter 14th century
//   Descriptive first: copy or 1400

// Approximation marker, with or without a trailing space: "ca. 1400", "ca.1400"
static RE_APPROX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bca\.\s*").unwrap());

// Decade marker directly after a digit run: "1400s" → "1400"
static RE_DECADE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)s\b").unwrap());

// Ordinal century number: "14th", "1st", "2nd"
static RE_ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&rules::build_ordinal_regex()).unwrap());

/// Separator between alternatives: "1400 or modern", "copy or 1400".
const ALTERNATIVE_SEP: &str = " or ";
/// Primary range separator (en-dash).
const RANGE_SEP: char = '–';
/// Fallback range separator, used only when no en-dash is present.
const RANGE_SEP_WORD: &str = " to ";

// ── One side of a range ────────────────────────────────────────────

/// A classified side of a range: either a plain year or a century
/// reference with its qualifier words.
#[derive(Debug)]
struct Side {
    /// Every ASCII digit on the side, in order.
    digits: String,
    /// "14th", "14th century" vs. "1375"
    is_century: bool,
    qualifier: CenturyQualifier,
    phrase: Option<ComplexPhrase>,
}

impl Side {
    fn read(text: &str) -> Self {
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        let is_century =
            RE_ORDINAL.is_match(text) || CENTURY_WORDS.iter().any(|w| text.contains(*w));

        // Qualifier words only carry meaning on a century reference
        let (qualifier, phrase) = if is_century {
            (rules::detect_qualifier(text), rules::detect_phrase(text))
        } else {
            (CenturyQualifier::Whole, None)
        };

        Side {
            digits,
            is_century,
            qualifier,
            phrase,
        }
    }

    /// Resolve this side on its own, as a plain year or a qualified century.
    fn resolve(&self, era: EraSign, raw: &str) -> Result<YearInterval> {
        if self.is_century {
            let century = century_number(&self.digits, raw)?;
            return Ok(resolve(century, self.qualifier, era));
        }
        let year = self
            .digits
            .parse::<i64>()
            .map_err(|_| malformed(&self.digits, raw))?;
        Ok(YearInterval::year(era.apply(year)))
    }
}

fn malformed(token: &str, raw: &str) -> DateError {
    DateError::MalformedCentury {
        token: token.to_string(),
        raw: raw.to_string(),
    }
}

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

// ── Normalization ──────────────────────────────────────────────────

/// Pick the alternative to parse: the first one, unless it has no digit,
/// in which case the second. Returns None when neither has a digit.
fn select_alternative(lowered: &str) -> Option<&str> {
    let mut alternatives = lowered.split(ALTERNATIVE_SEP);
    let first = alternatives.next()?;
    if has_digit(first) {
        return Some(first);
    }
    alternatives.next().filter(|second| has_digit(second))
}

/// Strip "ca." and decade markers.
fn normalize(alternative: &str) -> String {
    let stripped = RE_APPROX.replace_all(alternative, "");
    RE_DECADE.replace_all(&stripped, "$1").into_owned()
}

/// Split into (start, end) text. A single part stands for both sides;
/// anything past the second part is ignored. " to " only splits when both
/// halves carry a digit, so "1400 to present" stays one part.
fn split_range(normalized: &str) -> (&str, &str) {
    let mut parts: Vec<&str> = if normalized.contains(RANGE_SEP) {
        normalized.split(RANGE_SEP).collect()
    } else {
        let word_parts: Vec<&str> = normalized.split(RANGE_SEP_WORD).collect();
        if word_parts.len() >= 2 && word_parts[..2].iter().all(|p| has_digit(p)) {
            word_parts
        } else {
            vec![normalized]
        }
    };
    parts.truncate(2);
    let start = parts[0].trim();
    let end = parts.get(1).copied().map_or(start, str::trim);
    (start, end)
}

// ── Public API ─────────────────────────────────────────────────────

/// Parse a free-text date annotation into a signed year interval.
///
/// Pure and deterministic: the result depends only on `raw`. The returned
/// interval is not checked for `start <= end`.
pub fn parse_date_range(raw: &str) -> Result<YearInterval> {
    let lowered = raw.to_lowercase();
    let alternative = select_alternative(&lowered).ok_or_else(|| DateError::NoNumericToken {
        raw: raw.to_string(),
    })?;

    let normalized = normalize(alternative);
    let (start_text, end_text) = split_range(&normalized);

    // Era belongs to the whole range, never to one side
    let era = if rules::is_bce(start_text) || rules::is_bce(end_text) {
        EraSign::Bce
    } else {
        EraSign::Ce
    };

    let start = Side::read(start_text);
    let end = Side::read(end_text);

    if start.phrase.is_some() || end.phrase.is_some() {
        return resolve_shared_century(&start, &end, era, raw);
    }

    let first = start.resolve(era, raw)?;
    let last = end.resolve(era, raw)?;
    Ok(YearInterval::new(first.start, last.end))
}

/// Both sides describe one century ("mid-14th to third quarter 14th century").
/// A side without a phrase takes the century's own start or end.
fn resolve_shared_century(
    start: &Side,
    end: &Side,
    era: EraSign,
    raw: &str,
) -> Result<YearInterval> {
    // Prefer digits from a century reference over those of a plain year
    let sides = [start, end];
    let token = sides
        .iter()
        .find(|s| s.is_century && !s.digits.is_empty())
        .or_else(|| sides.iter().find(|s| !s.digits.is_empty()))
        .map_or("", |s| s.digits.as_str());
    let century = century_number(token, raw)?;
    let band = century_band(century, era);

    let first = start
        .phrase
        .map_or(band.start, |p| band.start + p.start_offset());
    let last = end
        .phrase
        .map_or(band.end, |p| band.start + p.end_offset());
    Ok(YearInterval::new(first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i64, end: i64) -> YearInterval {
        YearInterval::new(start, end)
    }

    // ── plain years ──────────────────────────────────────────────────

    #[test]
    fn test_parse_plain_range() {
        assert_eq!(parse_date_range("1375–1400"), Ok(iv(1375, 1400)));
    }

    #[test]
    fn test_parse_single_year() {
        assert_eq!(parse_date_range("1400"), Ok(iv(1400, 1400)));
    }

    #[test]
    fn test_parse_approximate_decade() {
        assert_eq!(parse_date_range("ca. 1300s"), Ok(iv(1300, 1300)));
        assert_eq!(parse_date_range("ca.1300"), Ok(iv(1300, 1300)));
        assert_eq!(parse_date_range("ca. 1375s–1400s"), Ok(iv(1375, 1400)));
    }

    #[test]
    fn test_parse_plain_years_bce() {
        assert_eq!(parse_date_range("500–450 BCE"), Ok(iv(-500, -450)));
    }

    #[test]
    fn test_parse_plain_year_ignores_qualifier_words() {
        assert_eq!(parse_date_range("late 1400s"), Ok(iv(1400, 1400)));
    }

    // ── centuries ────────────────────────────────────────────────────

    #[test]
    fn test_parse_century() {
        assert_eq!(parse_date_range("14th century"), Ok(iv(1300, 1400)));
        assert_eq!(parse_date_range("1st century"), Ok(iv(0, 100)));
    }

    #[test]
    fn test_parse_qualified_century() {
        assert_eq!(parse_date_range("early 14th century"), Ok(iv(1300, 1333)));
        assert_eq!(parse_date_range("Late 14th Century"), Ok(iv(1367, 1400)));
    }

    #[test]
    fn test_parse_century_range_shorthand() {
        assert_eq!(parse_date_range("14th–15th century"), Ok(iv(1300, 1500)));
        assert_eq!(
            parse_date_range("late 12th–early 13th century"),
            Ok(iv(1167, 1233))
        );
    }

    #[test]
    fn test_parse_century_bce() {
        assert_eq!(parse_date_range("4th century BCE"), Ok(iv(-400, -300)));
        assert_eq!(parse_date_range("5th–4th century BCE"), Ok(iv(-500, -300)));
        assert_eq!(
            parse_date_range("early 4th century BCE"),
            Ok(iv(-400, -367))
        );
    }

    #[test]
    fn test_parse_mixed_year_and_century() {
        assert_eq!(parse_date_range("1380–early 15th century"), Ok(iv(1380, 1433)));
    }

    // ── whole-range phrases ──────────────────────────────────────────

    #[test]
    fn test_parse_mid_century_phrase() {
        assert_eq!(parse_date_range("mid-14th century"), Ok(iv(1334, 1366)));
    }

    #[test]
    fn test_parse_third_quarter_phrase() {
        assert_eq!(
            parse_date_range("third quarter 14th century"),
            Ok(iv(1350, 1375))
        );
        assert_eq!(
            parse_date_range("mid-14th to third quarter 14th century"),
            Ok(iv(1334, 1375))
        );
    }

    #[test]
    fn test_parse_phrase_shares_one_century() {
        // the phrase pins both sides to the 14th century
        assert_eq!(parse_date_range("mid-14th–15th century"), Ok(iv(1334, 1400)));
        assert_eq!(parse_date_range("14th–mid-15th century"), Ok(iv(1300, 1366)));
    }

    #[test]
    fn test_parse_phrase_takes_first_century() {
        // "late" on the start side is dropped; both sides sit in the 13th century
        assert_eq!(
            parse_date_range("late 13th–mid 14th century"),
            Ok(iv(1200, 1266))
        );
    }

    #[test]
    fn test_parse_phrase_prefers_century_digits() {
        assert_eq!(
            parse_date_range("1350–third quarter 14th century"),
            Ok(iv(1300, 1375))
        );
    }

    #[test]
    fn test_parse_phrase_bce() {
        assert_eq!(
            parse_date_range("mid-2nd century BCE"),
            Ok(iv(-166, -134))
        );
    }

    // ── alternatives ─────────────────────────────────────────────────

    #[test]
    fn test_parse_alternatives() {
        assert_eq!(parse_date_range("copy or 1400"), Ok(iv(1400, 1400)));
        assert_eq!(parse_date_range("1400 or modern"), Ok(iv(1400, 1400)));
        assert_eq!(parse_date_range("14th century or later"), Ok(iv(1300, 1400)));
        // the first numeric alternative wins
        assert_eq!(parse_date_range("1400 or 1500"), Ok(iv(1400, 1400)));
    }

    // ── errors ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_no_digits() {
        assert_eq!(
            parse_date_range("no digits at all"),
            Err(DateError::NoNumericToken {
                raw: "no digits at all".into()
            })
        );
        assert!(matches!(
            parse_date_range("copy or modern"),
            Err(DateError::NoNumericToken { .. })
        ));
        assert!(matches!(
            parse_date_range(""),
            Err(DateError::NoNumericToken { .. })
        ));
    }

    #[test]
    fn test_parse_missing_century_on_one_side() {
        assert_eq!(
            parse_date_range("early–1400"),
            Err(DateError::MalformedCentury {
                token: String::new(),
                raw: "early–1400".into(),
            })
        );
    }

    #[test]
    fn test_parse_zero_century() {
        assert!(matches!(
            parse_date_range("0th century"),
            Err(DateError::MalformedCentury { .. })
        ));
    }

    #[test]
    fn test_parse_oversized_year() {
        let err = parse_date_range("99999999999999999999999").unwrap_err();
        assert_eq!(err.kind(), "malformed_century");
        assert_eq!(err.raw(), "99999999999999999999999");
    }

    // ── statelessness ────────────────────────────────────────────────

    #[test]
    fn test_parse_is_repeatable() {
        let first = parse_date_range("late 12th–early 13th century");
        let _ = parse_date_range("mid-14th century");
        let _ = parse_date_range("no digits at all");
        let _ = parse_date_range("4th century BCE");
        assert_eq!(parse_date_range("late 12th–early 13th century"), first);
    }

    #[test]
    fn test_parse_inverted_pair_is_returned() {
        let got = parse_date_range("1400–1300").unwrap();
        assert_eq!(got, iv(1400, 1300));
        assert!(!got.is_ordered());
    }

    // ── helpers ──────────────────────────────────────────────────────

    #[test]
    fn test_split_range() {
        assert_eq!(split_range("1375–1400"), ("1375", "1400"));
        assert_eq!(split_range("1400"), ("1400", "1400"));
        assert_eq!(split_range("1300–1350–1400"), ("1300", "1350"));
        assert_eq!(split_range("mid-14th to 15th"), ("mid-14th", "15th"));
        assert_eq!(
            split_range("1400 to present"),
            ("1400 to present", "1400 to present")
        );
    }

    #[test]
    fn test_parse_to_without_second_number() {
        assert_eq!(parse_date_range("1400 to present"), Ok(iv(1400, 1400)));
        assert_eq!(parse_date_range("14th century to later"), Ok(iv(1300, 1400)));
        // both halves numeric: still a range
        assert_eq!(
            parse_date_range("mid-14th to third quarter 14th century"),
            Ok(iv(1334, 1375))
        );
        // an explicit en-dash with an empty side stays an error
        assert!(matches!(
            parse_date_range("1400–"),
            Err(DateError::MalformedCentury { .. })
        ));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("ca. 1300s"), "1300");
        // only a decade "s" goes, not every "s"
        assert_eq!(normalize("1st–2nd centuries"), "1st–2nd centuries");
    }
}
