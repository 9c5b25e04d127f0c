use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Era ──────────────────────────────────────────────────────────────

/// Which side of the year line a date range sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EraSign {
    #[default]
    Ce,
    Bce,
}

impl EraSign {
    /// Apply the era to a positive year: BCE years become negative.
    pub fn apply(&self, year: i64) -> i64 {
        match self {
            Self::Ce => year,
            Self::Bce => -year,
        }
    }
}

// ── Qualifiers ───────────────────────────────────────────────────────

/// Per-side subdivision of a century into three bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CenturyQualifier {
    /// The whole century, no qualifier word.
    #[default]
    Whole,
    /// First band: start ..= start + 33
    Early,
    /// Second band: start + 34 ..= start + 66
    Mid,
    /// Third band: start + 67 ..= end
    Late,
}

impl CenturyQualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whole => "whole",
            Self::Early => "early",
            Self::Mid => "mid",
            Self::Late => "late",
        }
    }
}

/// Whole-range phrase that pins both sides to one shared century.
///
/// Kept apart from [`CenturyQualifier`] even where offsets coincide:
/// the two are reached from different branches of the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplexPhrase {
    /// "mid-14th": offsets +34 (start) / +66 (end)
    Mid,
    /// "third quarter 14th": offsets +50 (start) / +75 (end)
    ThirdQuarter,
}

impl ComplexPhrase {
    /// Offset from the century start when this phrase opens a range.
    pub fn start_offset(&self) -> i64 {
        match self {
            Self::Mid => 34,
            Self::ThirdQuarter => 50,
        }
    }

    /// Offset from the century start when this phrase closes a range.
    pub fn end_offset(&self) -> i64 {
        match self {
            Self::Mid => 66,
            Self::ThirdQuarter => 75,
        }
    }
}

// ── Year interval ────────────────────────────────────────────────────

/// A signed year interval (BCE negative, CE positive).
///
/// `start <= end` is expected but not enforced: a few annotations
/// produce inverted pairs and downstream filters must tolerate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearInterval {
    pub start: i64,
    pub end: i64,
}

impl YearInterval {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// A single year, e.g. "1400".
    pub fn year(year: i64) -> Self {
        Self::new(year, year)
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    /// Whether both endpoints fall inside `lo ..= hi`, in either order.
    pub fn within(&self, lo: i64, hi: i64) -> bool {
        let (a, b) = (self.start.min(self.end), self.start.max(self.end));
        a >= lo && b <= hi
    }

    /// The hundred-year bin containing `start`, e.g. 1375 → 1300, -350 → -400.
    pub fn start_century_bin(&self) -> i64 {
        self.start.div_euclid(100) * 100
    }
}

// ── Batch output ─────────────────────────────────────────────────────

/// One input annotation and what became of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatedRecord {
    /// Position in the input sequence; results are always reported in this order.
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<YearInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary counters for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total: usize,
    pub parsed: usize,
    pub failed: usize,
    pub no_numeric_token: usize,
    pub malformed_century: usize,
    /// Parsed intervals with start > end.
    pub inverted: usize,
    /// Parsed records dropped by the year window.
    pub filtered_out: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_end: Option<i64>,
    /// Record count per hundred-year bin of the start year.
    pub by_century: BTreeMap<i64, usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchOutput {
    pub records: Vec<DatedRecord>,
    pub stats: BatchStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_tolerates_inverted_pair() {
        let iv = YearInterval::new(1400, 1300);
        assert!(!iv.is_ordered());
        assert!(iv.within(200, 2000));
        assert!(!iv.within(1350, 2000));
    }

    #[test]
    fn test_start_century_bin() {
        assert_eq!(YearInterval::year(1375).start_century_bin(), 1300);
        assert_eq!(YearInterval::year(1300).start_century_bin(), 1300);
        assert_eq!(YearInterval::new(-350, -300).start_century_bin(), -400);
        assert_eq!(YearInterval::new(-400, -300).start_century_bin(), -400);
    }

    #[test]
    fn test_era_apply() {
        assert_eq!(EraSign::Ce.apply(500), 500);
        assert_eq!(EraSign::Bce.apply(500), -500);
    }
}
