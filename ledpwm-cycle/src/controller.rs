use log::{info, trace, warn};

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::indicator::{IndicatorId, LedState};
use crate::output::Output;
use crate::sink::IndicatorSink;
use crate::startup::{Startup, StartupRequest};
use crate::state::{CycleParams, CycleState, Mode, Pulse};
use crate::timer::Timer;

/// Drives one indicator with software PWM until cancelled
pub struct Controller<S: IndicatorSink, T: Timer> {
    state: CycleState,
    output: Output<S>,
    timer: T,
}

/// Check the request and the parameters, and only then open the sink. Any
/// configuration error is returned before `connect` is called.
pub fn prepare<S, T, F>(
    request: &StartupRequest,
    params: &CycleParams,
    timer: T,
    connect: F,
) -> Result<Controller<S, T>>
where
    S: IndicatorSink,
    T: Timer,
    F: FnOnce(IndicatorId) -> Result<S>,
{
    let startup = request.validate()?;
    params.validate()?;
    let sink = connect(startup.indicator)?;
    Ok(Controller::new(startup, params, sink, timer))
}

impl<S: IndicatorSink, T: Timer> Controller<S, T> {
    pub fn new(startup: Startup, params: &CycleParams, sink: S, timer: T) -> Self {
        Self {
            state: CycleState::new(startup.mode, params),
            output: Output::new(sink, startup.indicator),
            timer,
        }
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Run until `cancel` is set or the sink fails. The indicator is left
    /// off in both cases. Returns the signal that stopped the loop.
    pub fn run(&mut self, cancel: &CancelToken) -> Result<i32> {
        match self.state.mode() {
            Mode::Brightness(pct) => info!(
                "Driving led {} at {pct}%, {}us period",
                self.output.indicator(),
                self.state.period()
            ),
            Mode::Fade => info!(
                "Fading led {}, {}us period",
                self.output.indicator(),
                self.state.period()
            ),
        }

        let outcome = loop {
            if let Some(signal) = cancel.signal() {
                break Ok(signal);
            }
            let pulse = self.state.tick();
            if let Err(e) = self.pulse(pulse, cancel) {
                break Err(e);
            }
        };

        let released = self.output.release();
        match outcome {
            Ok(signal) => {
                info!("Stopped by signal {signal}");
                released.map(|_| signal)
            }
            Err(e) => {
                if let Err(off) = released {
                    warn!("Could not switch led off: {off}");
                }
                Err(e)
            }
        }
    }

    /// One period. Returns early after the on phase if cancelled, the off
    /// write is left to `release`.
    fn pulse(&mut self, pulse: Pulse, cancel: &CancelToken) -> Result<()> {
        trace!("on {}us off {}us", pulse.on, pulse.off);
        self.output.apply(LedState::On)?;
        self.timer.pause(pulse.on_time());
        if cancel.is_cancelled() {
            return Ok(());
        }
        self.output.apply(LedState::Off)?;
        self.timer.pause(pulse.off_time());
        Ok(())
    }
}
