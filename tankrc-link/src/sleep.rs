use std::time::Instant;

pub use spin_sleep::SpinSleeper;

/// A trait for the sleep that paces the frontend pump thread.
pub trait Sleep: std::fmt::Debug + Send {
    /// Sleep until the specified deadline.
    fn sleep_until(&self, deadline: Instant);
}

impl Sleep for Box<dyn Sleep> {
    fn sleep_until(&self, deadline: Instant) {
        self.as_ref().sleep_until(deadline);
    }
}

/// A sleeper that uses [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StdSleeper;

impl Sleep for StdSleeper {
    fn sleep_until(&self, deadline: Instant) {
        std::thread::sleep(deadline - Instant::now());
    }
}

impl Sleep for SpinSleeper {
    fn sleep_until(&self, deadline: Instant) {
        self.sleep(deadline - Instant::now());
    }
}
