use std::fmt;
use std::str::FromStr;

use crate::error::CycleError;

/// Highest indicator number the core protocol allows, same as `xset led`.
pub const MAX_INDICATOR: u8 = 32;

/// Which indicator to drive. Numbers follow the XKB default indicator
/// order, `All` drives every indicator at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorId {
    Led(u8),
    All,
}

impl IndicatorId {
    pub fn number(&self) -> Option<u8> {
        match self {
            IndicatorId::Led(n) => Some(*n),
            IndicatorId::All => None,
        }
    }
}

impl FromStr for IndicatorId {
    type Err = CycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "-1" || s.eq_ignore_ascii_case("all") {
            return Ok(IndicatorId::All);
        }
        // Plain digits only, no sign or whitespace inside
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CycleError::InvalidIndicator(s.to_owned()));
        }
        match s.parse::<u8>() {
            Ok(n) if (1..=MAX_INDICATOR).contains(&n) => Ok(IndicatorId::Led(n)),
            _ => Err(CycleError::InvalidIndicator(s.to_owned())),
        }
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorId::Led(n) => write!(f, "{}", n),
            IndicatorId::All => write!(f, "all"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    On,
    Off,
}
