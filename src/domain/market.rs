//! Market selection and symbol normalization.

use std::fmt;
use std::str::FromStr;

/// Which market the queried symbol trades on. Non-US markets carry a fixed
/// provider suffix that users routinely leave off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Market {
    #[default]
    UnitedStates,
    Taiwan,
}

impl Market {
    /// Provider suffix for this market, if it needs one.
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            Market::UnitedStates => None,
            Market::Taiwan => Some(".TW"),
        }
    }

    /// Uppercase the raw symbol and append the market suffix when it is not
    /// already present.
    pub fn normalize_symbol(&self, raw: &str) -> String {
        let symbol = raw.trim().to_uppercase();
        match self.suffix() {
            Some(suffix) if !symbol.ends_with(suffix) => format!("{symbol}{suffix}"),
            _ => symbol,
        }
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" => Ok(Market::UnitedStates),
            "tw" => Ok(Market::Taiwan),
            other => Err(format!("unknown market: {other}")),
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::UnitedStates => write!(f, "US"),
            Market::Taiwan => write!(f, "TW"),
        }
    }
}
