use log::{debug, warn};

use crate::error::{CycleError, Result};
use crate::indicator::{IndicatorId, LedState};
use crate::sink::IndicatorSink;

/// Owns the sink for the lifetime of the loop.
///
/// `release` switches the indicator off, flushes and disconnects. It runs
/// once: either called directly or from `Drop`, whichever comes first. Once
/// released the sink is gone, so nothing can be written after disconnect.
pub struct Output<S: IndicatorSink> {
    sink: Option<S>,
    indicator: IndicatorId,
}

impl<S: IndicatorSink> Output<S> {
    pub fn new(sink: S, indicator: IndicatorId) -> Self {
        Self {
            sink: Some(sink),
            indicator,
        }
    }

    pub fn indicator(&self) -> IndicatorId {
        self.indicator
    }

    pub fn is_released(&self) -> bool {
        self.sink.is_none()
    }

    /// Set the state and flush so it is applied right away
    pub fn apply(&mut self, state: LedState) -> Result<()> {
        let sink = self
            .sink
            .as_mut()
            .ok_or_else(|| CycleError::Sink("indicator already released".into()))?;
        sink.set_state(self.indicator, state)?;
        sink.flush()
    }

    /// Force the indicator off and disconnect. Does nothing if already
    /// released.
    pub fn release(&mut self) -> Result<()> {
        let Some(mut sink) = self.sink.take() else {
            return Ok(());
        };
        debug!("Switching led {} off and disconnecting", self.indicator);
        // Disconnect even when the final write failed
        let off = sink
            .set_state(self.indicator, LedState::Off)
            .and_then(|_| sink.flush());
        let disconnect = sink.disconnect();
        off.and(disconnect)
    }
}

impl<S: IndicatorSink> Drop for Output<S> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Could not switch led {} off: {e}", self.indicator);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::mock::{Event, RecordingSink};

    #[test]
    fn release_once() {
        let (sink, events) = RecordingSink::new();
        let mut output = Output::new(sink, IndicatorId::Led(2));
        output.apply(LedState::On).unwrap();
        output.release().unwrap();
        output.release().unwrap();
        assert!(output.is_released());
        drop(output);

        assert_eq!(
            *events.borrow(),
            vec![
                Event::Set(IndicatorId::Led(2), LedState::On),
                Event::Flush,
                Event::Set(IndicatorId::Led(2), LedState::Off),
                Event::Flush,
                Event::Disconnect,
            ]
        );
    }

    #[test]
    fn drop_releases() {
        let (sink, events) = RecordingSink::new();
        {
            let mut output = Output::new(sink, IndicatorId::All);
            output.apply(LedState::On).unwrap();
        }
        let events = events.borrow();
        assert_eq!(events.last(), Some(&Event::Disconnect));
        assert_eq!(
            events[events.len() - 3],
            Event::Set(IndicatorId::All, LedState::Off)
        );
    }

    #[test]
    fn no_writes_after_release() {
        let (sink, events) = RecordingSink::new();
        let mut output = Output::new(sink, IndicatorId::Led(1));
        output.release().unwrap();
        assert!(output.apply(LedState::On).is_err());
        assert_eq!(events.borrow().last(), Some(&Event::Disconnect));
        assert_eq!(events.borrow().len(), 3);
    }

    #[test]
    fn disconnects_when_off_fails() {
        let (mut sink, events) = RecordingSink::new();
        sink.fail_after = Some(0);
        let mut output = Output::new(sink, IndicatorId::Led(1));
        assert!(output.release().is_err());
        assert_eq!(*events.borrow(), vec![Event::Disconnect]);
    }
}
