use chrono::{DateTime, Local};

/// Wall-clock source for the trigger loop. Injected so tests can pin the
/// evaluation instant instead of racing the real clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
