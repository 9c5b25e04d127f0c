//! Century arithmetic: a century number, a qualifier and an era become a
//! concrete year band.

use date_types::{CenturyQualifier, EraSign, YearInterval};

use crate::error::{DateError, Result};

/// Read a century number out of a digit token.
///
/// `raw` is the full annotation, carried into the error for diagnostics.
/// Zero, an empty token, or a token too large to hold are all rejected.
pub fn century_number(token: &str, raw: &str) -> Result<u32> {
    match token.parse::<u32>() {
        Ok(c) if c > 0 => Ok(c),
        _ => Err(DateError::MalformedCentury {
            token: token.to_string(),
            raw: raw.to_string(),
        }),
    }
}

/// The whole band of a century, before any qualifier.
///
/// Century N covers `(N-1)*100 ..= N*100`. Under BCE the band is negated
/// and swapped so that `start` stays the chronologically earlier year.
pub fn century_band(century: u32, era: EraSign) -> YearInterval {
    let year_start = (i64::from(century) - 1) * 100;
    let year_end = i64::from(century) * 100;
    match era {
        EraSign::Ce => YearInterval::new(year_start, year_end),
        EraSign::Bce => YearInterval::new(-year_end, -year_start),
    }
}

/// Resolve a century with its qualifier into a year interval.
pub fn resolve(century: u32, qualifier: CenturyQualifier, era: EraSign) -> YearInterval {
    let band = century_band(century, era);
    let s = band.start;
    match qualifier {
        CenturyQualifier::Whole => band,
        CenturyQualifier::Early => YearInterval::new(s, s + 33),
        CenturyQualifier::Mid => YearInterval::new(s + 34, s + 66),
        CenturyQualifier::Late => YearInterval::new(s + 67, band.end),
    }
}
