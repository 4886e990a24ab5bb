//! Timestamp sources for `UNB`/`UNG` date/time fields.

/// Supplies the current date (`YYMMDD`) and time (`HHMM`) for interchange
/// and group headers. Injected into [`crate::EdifactCodec`] so generation
/// is deterministic under test without mocking global state.
pub trait Clock: Send + Sync {
    /// Returns `(date, time)` as `(YYMMDD, HHMM)`.
    fn now(&self) -> (String, String);
}

/// Reads the current time from the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> (String, String) {
        let now = chrono::Utc::now();
        (now.format("%y%m%d").to_string(), now.format("%H%M").to_string())
    }
}

/// Always returns the same date/time. Used by tests and callers that want
/// reproducible output.
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: String,
    time: String,
}

impl FixedClock {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> (String, String) {
        (self.date.clone(), self.time.clone())
    }
}
