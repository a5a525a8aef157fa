use std::time::{Duration, Instant};

/// Suspends the loop between indicator writes
pub trait Timer {
    fn pause(&mut self, duration: Duration);
}

/// Plain thread sleep. An interrupted sleep is not retried, the loop just
/// runs a little early.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sleep;

impl Timer for Sleep {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Busy-waits on the monotonic clock. Much finer than `Sleep` at the price
/// of keeping a core busy.
#[derive(Debug, Default, Clone, Copy)]
pub struct Spin;

impl Timer for Spin {
    fn pause(&mut self, duration: Duration) {
        let start = Instant::now();
        while start.elapsed() < duration {
            std::hint::spin_loop();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerKind {
    #[default]
    Sleep,
    Spin,
}

impl TimerKind {
    pub fn build(self) -> Box<dyn Timer> {
        match self {
            TimerKind::Sleep => Box::new(Sleep),
            TimerKind::Spin => Box::new(Spin),
        }
    }
}

impl<T: Timer + ?Sized> Timer for Box<T> {
    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration)
    }
}
