//! Time source and task id generation.
//!
//! Ids are the creation time in milliseconds since the epoch, rendered as a
//! decimal string. The clock sits behind a trait so tests can pin it.

use chrono::{DateTime, Utc};

pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Hands out millisecond timestamp ids.
///
/// Two ids requested within the same millisecond (or after the clock steps
/// backwards) would collide, so the generator never returns a value at or
/// below the last one it issued.
pub struct IdGenerator {
    clock: Box<dyn Clock>,
    last: i64,
}

impl IdGenerator {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            last: i64::MIN,
        }
    }

    pub fn next_id(&mut self) -> String {
        let now = self.clock.now().timestamp_millis();
        let id = if now > self.last {
            now
        } else {
            self.last.saturating_add(1)
        };
        self.last = id;
        id.to_string()
    }

    /// Moves the floor past ids that already exist, e.g. after a load.
    ///
    /// Ids with no room above them are not timestamps this generator could
    /// reach, so they leave the floor alone.
    pub fn observe(&mut self, existing: &str) {
        if let Ok(ms) = existing.parse::<i64>() {
            if ms < i64::MAX - 1 {
                self.last = self.last.max(ms);
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}
