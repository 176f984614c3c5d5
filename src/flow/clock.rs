use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the timestamps a flow evaluates its waveform at. The producer samples it once
/// on every tick.
pub trait Clock: Send + Sync {
    /// Current time, in milliseconds.
    fn now_millis(&self) -> f64;
}

/// Wall clock time, as whole milliseconds since the Unix epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> f64 {
        millis_since_epoch(SystemTime::now())
    }
}

/// Whole milliseconds between the Unix epoch and `time`, negative before 1970.
fn millis_since_epoch(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as f64,
        Err(before) => -(before.duration().as_millis() as f64),
    }
}

/// A clock that ignores the real time and moves forward by a fixed step every time it is
/// read: `start`, `start + step`, `start + 2·step`...
///
/// Useful for reproducible simulations, where the values of a flow must not depend on when
/// the timer fires.
#[derive(Debug)]
pub struct SteppedClock {
    start: f64,
    step: f64,
    reads: AtomicU64,
}

impl SteppedClock {
    pub fn new(start: f64, step: f64) -> Self {
        Self {
            start,
            step,
            reads: AtomicU64::new(0),
        }
    }

    /// Amount of timestamps handed out so far.
    pub fn get_reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }
}

impl Clock for SteppedClock {
    fn now_millis(&self) -> f64 {
        let n = self.reads.fetch_add(1, Ordering::Relaxed);
        self.start + self.step * n as f64
    }
}
