use std::time::Duration;

use serde_derive::{Deserialize, Serialize};

use crate::error::{CycleError, Result};

/// `10^7 / hz` gives the period in microseconds; 500 Hz is a 20ms period.
pub const PERIOD_SCALE: f64 = 10_000_000.0;
pub const DEFAULT_HZ: f64 = 500.0;
/// Ramp steps happen once every `nominal_hz / RAMP_HZ` ticks
pub const RAMP_HZ: f64 = 200.0;
/// Below this the 1% floor would round to zero and the fade would stall
pub const MIN_PERIOD_US: u64 = 100;

/// Multipliers applied to the on-time during a fade. They are deliberately
/// not reciprocals of each other.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RampFactors {
    pub up: f64,
    pub down: f64,
}

impl Default for RampFactors {
    fn default() -> Self {
        Self {
            up: 1.25,
            down: 0.75,
        }
    }
}

/// Tunables for the PWM loop
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CycleParams {
    /// Nominal loop frequency. Sets the ramp interval, and the period when
    /// `period_us` is not given.
    pub nominal_hz: f64,
    /// Fixed period in microseconds, overrides the one derived from
    /// `nominal_hz`
    pub period_us: Option<u64>,
    pub ramp: RampFactors,
    /// Fade start point as a fraction of the period
    pub fade_seed: f64,
}

impl Default for CycleParams {
    fn default() -> Self {
        Self {
            nominal_hz: DEFAULT_HZ,
            period_us: None,
            ramp: RampFactors::default(),
            fade_seed: 0.1,
        }
    }
}

impl CycleParams {
    pub fn period(&self) -> u64 {
        self.period_us
            .unwrap_or_else(|| (PERIOD_SCALE / self.nominal_hz) as u64)
    }

    /// Number of ticks between ramp steps, never zero
    pub fn ramp_interval(&self) -> u32 {
        ((self.nominal_hz / RAMP_HZ).ceil() as u32).max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.nominal_hz.is_finite() || self.nominal_hz <= 0.0 {
            return Err(CycleError::InvalidParams(format!(
                "frequency must be positive, got {}",
                self.nominal_hz
            )));
        }
        let period = self.period();
        if period < MIN_PERIOD_US {
            return Err(CycleError::InvalidParams(format!(
                "period must be at least {MIN_PERIOD_US}us, got {period}us"
            )));
        }
        if !self.ramp.up.is_finite() || self.ramp.up <= 1.0 {
            return Err(CycleError::InvalidParams(format!(
                "ramp up factor must be above 1, got {}",
                self.ramp.up
            )));
        }
        if !(self.ramp.down > 0.0 && self.ramp.down < 1.0) {
            return Err(CycleError::InvalidParams(format!(
                "ramp down factor must be between 0 and 1, got {}",
                self.ramp.down
            )));
        }
        if !(0.01..=1.0).contains(&self.fade_seed) {
            return Err(CycleError::InvalidParams(format!(
                "fade seed must be between 0.01 and 1, got {}",
                self.fade_seed
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// Fixed duty cycle, percentage in `1.0..=100.0`
    Brightness(f64),
    Fade,
}

/// On and off time for one period, in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub on: u64,
    pub off: u64,
}

impl Pulse {
    pub fn on_time(&self) -> Duration {
        Duration::from_micros(self.on)
    }

    pub fn off_time(&self) -> Duration {
        Duration::from_micros(self.off)
    }
}

/// Duty cycle state owned by the controller loop.
///
/// The fade is a bounded walk: the on-time is multiplied by the current
/// factor every `ramp_interval` ticks, the factor flips to `down` when the
/// ceiling is reached and back to `up` at the 1% floor.
#[derive(Debug, Clone)]
pub struct CycleState {
    period: u64,
    floor: u64,
    on: f64,
    mode: Mode,
    ramp: RampFactors,
    factor: f64,
    ramp_interval: u32,
    ticks: u32,
}

impl CycleState {
    pub fn new(mode: Mode, params: &CycleParams) -> Self {
        let period = params.period();
        let on = match mode {
            Mode::Brightness(pct) => period as f64 * pct / 100.0,
            Mode::Fade => period as f64 * params.fade_seed,
        };
        Self {
            period,
            floor: period / 100,
            on,
            mode,
            ramp: params.ramp,
            factor: params.ramp.up,
            ramp_interval: params.ramp_interval(),
            ticks: 0,
        }
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The factor the next ramp step will use, unless a bound flips it
    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn on_duration(&self) -> u64 {
        (self.on as u64).min(self.period)
    }

    pub fn off_duration(&self) -> u64 {
        self.period - self.on_duration()
    }

    /// Advance one loop iteration and return the pulse to emit
    pub fn tick(&mut self) -> Pulse {
        // only a fade counts ticks, reset at every ramp step
        if self.mode == Mode::Fade {
            self.ticks += 1;
            if self.ticks >= self.ramp_interval {
                self.ticks = 0;
                self.step_ramp();
            }
        }
        Pulse {
            on: self.on_duration(),
            off: self.off_duration(),
        }
    }

    fn step_ramp(&mut self) {
        let ceiling = self.period as f64;
        let floor = self.floor as f64;
        if self.on >= ceiling {
            self.factor = self.ramp.down;
        }
        if self.on <= floor {
            self.factor = self.ramp.up;
        }
        self.on = (self.on * self.factor).clamp(floor, ceiling);
    }
}
