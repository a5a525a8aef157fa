use log::{debug, info};

use crate::error::Result;
use crate::indicator::{IndicatorId, LedState};

/// Something that can switch an indicator on or off. There is no read back,
/// a call returning `Ok` only means the request was handed over.
pub trait IndicatorSink {
    fn set_state(&mut self, indicator: IndicatorId, state: LedState) -> Result<()>;

    /// Push any queued state changes out now
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release the device. No further calls are made after this.
    fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: IndicatorSink + ?Sized> IndicatorSink for Box<S> {
    fn set_state(&mut self, indicator: IndicatorId, state: LedState) -> Result<()> {
        (**self).set_state(indicator, state)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect()
    }
}

/// Sink for dry runs, logs what would have been written
#[derive(Debug, Default)]
pub struct LogSink {
    pulses: u64,
}

impl LogSink {
    pub fn new() -> Self {
        info!("Dry run, no indicator will be touched");
        Self::default()
    }

    pub fn pulses(&self) -> u64 {
        self.pulses
    }
}

impl IndicatorSink for LogSink {
    fn set_state(&mut self, indicator: IndicatorId, state: LedState) -> Result<()> {
        if state == LedState::On {
            self.pulses += 1;
        }
        debug!("led {indicator}: {state:?}");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        info!("Dry run finished after {} pulses", self.pulses);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::cancel::CancelToken;
    use crate::error::CycleError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Event {
        Set(IndicatorId, LedState),
        Flush,
        Disconnect,
    }

    /// Records every call. Can raise a signal on the token or fail once a
    /// given number of `set_state` calls has been made.
    #[derive(Default)]
    pub struct RecordingSink {
        pub events: Rc<RefCell<Vec<Event>>>,
        pub cancel_after: Option<(usize, CancelToken, i32)>,
        pub fail_after: Option<usize>,
        sets: usize,
    }

    impl RecordingSink {
        pub fn new() -> (Self, Rc<RefCell<Vec<Event>>>) {
            let sink = Self::default();
            let events = sink.events.clone();
            (sink, events)
        }
    }

    impl IndicatorSink for RecordingSink {
        fn set_state(&mut self, indicator: IndicatorId, state: LedState) -> Result<()> {
            self.sets += 1;
            if let Some(limit) = self.fail_after {
                if self.sets > limit {
                    return Err(CycleError::Sink("device went away".into()));
                }
            }
            self.events.borrow_mut().push(Event::Set(indicator, state));
            if let Some((limit, token, signal)) = &self.cancel_after {
                if self.sets == *limit {
                    token.cancel(*signal);
                }
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            self.events.borrow_mut().push(Event::Flush);
            Ok(())
        }

        fn disconnect(&mut self) -> Result<()> {
            self.events.borrow_mut().push(Event::Disconnect);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_sink_counts_pulses() {
        let mut sink = LogSink::new();
        for _ in 0..3 {
            sink.set_state(IndicatorId::Led(1), LedState::On).unwrap();
            sink.set_state(IndicatorId::Led(1), LedState::Off).unwrap();
        }
        sink.flush().unwrap();
        sink.disconnect().unwrap();
        assert_eq!(sink.pulses(), 3);
    }

    #[test]
    fn boxed_sink_forwards() {
        let (sink, events) = mock::RecordingSink::new();
        let mut boxed: Box<dyn IndicatorSink> = Box::new(sink);
        boxed.set_state(IndicatorId::All, LedState::On).unwrap();
        boxed.flush().unwrap();
        boxed.disconnect().unwrap();
        assert_eq!(
            *events.borrow(),
            vec![
                mock::Event::Set(IndicatorId::All, LedState::On),
                mock::Event::Flush,
                mock::Event::Disconnect
            ]
        );
    }
}
