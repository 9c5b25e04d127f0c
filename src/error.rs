use thiserror::Error;

/// Why a date annotation could not be turned into a year interval.
///
/// Both variants carry the original annotation so a caller can log the
/// record and move on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("no numeric token in date annotation {raw:?}")]
    NoNumericToken { raw: String },
    #[error("cannot extract century from {token:?} in date annotation {raw:?}")]
    MalformedCentury { token: String, raw: String },
}

impl DateError {
    /// Short label used in batch statistics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoNumericToken { .. } => "no_numeric_token",
            Self::MalformedCentury { .. } => "malformed_century",
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            Self::NoNumericToken { raw } | Self::MalformedCentury { raw, .. } => raw,
        }
    }
}

pub type Result<T> = std::result::Result<T, DateError>;
