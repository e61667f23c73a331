use std::time::Instant;

/// Monotonic source of elapsed seconds, sampled once per frame.
pub trait Clock {
    /// Seconds since the clock was first sampled. Never decreases.
    fn elapsed(&mut self) -> f64;
}

/// Wall-clock implementation backed by [`Instant`].
///
/// The clock starts on the first call to [`Clock::elapsed`], so the first
/// frame always observes `0.0`.
#[derive(Debug, Default)]
pub struct SystemClock {
    start: Option<Instant>,
    last: f64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some()
    }
}

impl Clock for SystemClock {
    fn elapsed(&mut self) -> f64 {
        let start = *self.start.get_or_insert_with(Instant::now);
        self.last = self.last.max(start.elapsed().as_secs_f64());
        self.last
    }
}

/// Hand-driven clock for headless runs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
    }

    /// Jump to an absolute time. Requests to rewind are ignored.
    pub fn set(&mut self, t: f64) {
        if t.is_finite() && t > self.now {
            self.now = t;
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }
}

impl Clock for ManualClock {
    fn elapsed(&mut self) -> f64 {
        self.now
    }
}
