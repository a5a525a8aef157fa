use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::debug;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};

/// Signals that stop the loop
pub const STOP_SIGNALS: [i32; 3] = [SIGINT, SIGTERM, SIGHUP];

/// Shared stop flag. Holds the number of the signal that asked the loop to
/// stop, zero while running. Handlers only store into the atomic so it is
/// safe to set from signal context.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicUsize>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install handlers for `STOP_SIGNALS` that cancel this token
    pub fn register_signals(&self) -> io::Result<()> {
        for signal in STOP_SIGNALS {
            signal_hook::flag::register_usize(signal, self.0.clone(), signal as usize)?;
            debug!("Registered stop handler for signal {signal}");
        }
        Ok(())
    }

    pub fn cancel(&self, signal: i32) {
        // 0 means running, so keep the flag non-zero whatever is passed
        self.0.store((signal as usize).max(1), Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst) != 0
    }

    /// The signal that cancelled the token
    pub fn signal(&self) -> Option<i32> {
        match self.0.load(Ordering::SeqCst) {
            0 => None,
            n => Some(n as i32),
        }
    }
}

/// Shell convention for a process ended by a signal
pub fn exit_code_for(signal: i32) -> i32 {
    128 + signal
}
