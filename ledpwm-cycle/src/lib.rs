//! Software PWM for on/off indicators such as keyboard status LEDs.
//!
//! A [`Controller`] toggles an [`IndicatorSink`] on and off once per period,
//! holding each state long enough that the on fraction matches the wanted
//! brightness. In fade mode the on-time walks up and down between 1% and
//! 100% of the period. The loop stops when its [`CancelToken`] is set, and
//! always leaves the indicator off.

pub mod cancel;
pub mod controller;
pub mod error;
pub mod indicator;
pub mod output;
pub mod sink;
pub mod startup;
pub mod state;
pub mod timer;

pub use cancel::CancelToken;
pub use controller::{prepare, Controller};
pub use error::{CycleError, Result};
pub use indicator::{IndicatorId, LedState};
pub use sink::{IndicatorSink, LogSink};
pub use startup::{Startup, StartupRequest};
pub use state::{CycleParams, CycleState, Mode, Pulse, RampFactors};
pub use timer::{Timer, TimerKind};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
