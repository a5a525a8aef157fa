use std::fmt;

use ledpwm_cycle::CycleError;

pub type Result<T> = std::result::Result<T, PlatformError>;

#[derive(Debug)]
pub enum PlatformError {
    ParseNum,
    Udev(String, std::io::Error),
    Open(String, std::io::Error),
    Write(String, std::io::Error),
    AttrNotFound(String),
    UnknownIndicator(u8),
    MissingIndicator(String),
    WrongIndicator(String),
}

impl fmt::Display for PlatformError {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlatformError::ParseNum => write!(f, "Parse number error"),
            PlatformError::Udev(deets, error) => write!(f, "udev {}: {}", deets, error),
            PlatformError::Open(path, error) => write!(f, "Open {}: {}", path, error),
            PlatformError::Write(path, error) => write!(f, "Write {}: {}", path, error),
            PlatformError::AttrNotFound(deets) => write!(f, "Attribute not found: {}", deets),
            PlatformError::UnknownIndicator(n) => {
                write!(f, "Indicator {} has no sysfs led name", n)
            }
            PlatformError::MissingIndicator(pattern) => {
                write!(f, "No keyboard led matching {} found", pattern)
            }
            PlatformError::WrongIndicator(deets) => write!(f, "Wrong indicator: {}", deets),
        }
    }
}

impl std::error::Error for PlatformError {}

impl PlatformError {
    /// Failure while opening the indicators
    pub fn into_connection(self) -> CycleError {
        CycleError::Connection(self.to_string())
    }

    /// Failure while driving already opened indicators
    pub fn into_sink(self) -> CycleError {
        CycleError::Sink(self.to_string())
    }
}
