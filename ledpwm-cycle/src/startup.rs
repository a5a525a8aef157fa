use log::debug;

use crate::error::{CycleError, Result};
use crate::indicator::IndicatorId;
use crate::state::Mode;

/// Raw startup options as they come off the command line
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StartupRequest {
    pub indicator: Option<String>,
    pub brightness: Option<f64>,
    pub fade: bool,
}

/// A checked request: one indicator and exactly one mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Startup {
    pub indicator: IndicatorId,
    pub mode: Mode,
}

impl StartupRequest {
    pub fn validate(&self) -> Result<Startup> {
        if self.fade && self.brightness.is_some() {
            return Err(CycleError::BothModes);
        }

        let mode = match self.brightness {
            Some(pct) if (1.0..=100.0).contains(&pct) => Some(Mode::Brightness(pct)),
            Some(pct) => return Err(CycleError::InvalidBrightness(pct)),
            None if self.fade => Some(Mode::Fade),
            None => None,
        };

        let indicator = self
            .indicator
            .as_deref()
            .ok_or(CycleError::MissingIndicator)?
            .parse::<IndicatorId>()?;

        let mode = mode.ok_or(CycleError::NoMode)?;
        debug!("Startup: led {indicator}, {mode:?}");
        Ok(Startup { indicator, mode })
    }
}
