use std::fmt;

pub type Result<T> = std::result::Result<T, CycleError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CycleError {
    BothModes,
    NoMode,
    MissingIndicator,
    InvalidIndicator(String),
    InvalidBrightness(f64),
    InvalidParams(String),
    Connection(String),
    Sink(String),
}

impl CycleError {
    /// Errors raised while checking the startup request, before any sink is
    /// touched.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CycleError::BothModes
                | CycleError::NoMode
                | CycleError::MissingIndicator
                | CycleError::InvalidIndicator(_)
                | CycleError::InvalidBrightness(_)
                | CycleError::InvalidParams(_)
        )
    }
}

impl fmt::Display for CycleError {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CycleError::BothModes => write!(f, "can't specify both --brightness and --fade"),
            CycleError::NoMode => write!(f, "one of --fade or --brightness is required"),
            CycleError::MissingIndicator => write!(f, "'--led <num>' argument is required"),
            CycleError::InvalidIndicator(arg) => {
                write!(f, "invalid LED '{}', expected 1-32 or all", arg)
            }
            CycleError::InvalidBrightness(pct) => {
                write!(f, "invalid brightness '{}', expected 1-100", pct)
            }
            CycleError::InvalidParams(deets) => write!(f, "Invalid cycle parameters: {}", deets),
            CycleError::Connection(deets) => write!(f, "Unable to open indicator: {}", deets),
            CycleError::Sink(deets) => write!(f, "Lost indicator: {}", deets),
        }
    }
}

impl std::error::Error for CycleError {}
