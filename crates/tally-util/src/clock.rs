//! Wall-clock abstraction
//!
//! All temporal decisions in the engine (rollover, snapshot hours,
//! event timestamps) go through a `Clock` so that tests can simulate
//! hour and day boundaries without real time passing. A single
//! server-local timezone basis is used throughout.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use std::sync::Mutex;

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    /// Current local date and time
    fn now(&self) -> DateTime<Local>;

    /// Current local calendar date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The real system clock
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Manually-driven clock for tests
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Clock positioned at the given date, hour and minute.
    ///
    /// Panics on out-of-range values; intended for test setup only.
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        let naive = date
            .and_hms_opt(hour, minute, 0)
            .expect("valid hour and minute");
        let now = Local
            .from_local_datetime(&naive)
            .single()
            .expect("unambiguous local time");
        Self::new(now)
    }

    /// Move the clock to a new point in time
    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().unwrap() = now;
    }

    /// Move the clock to the given date, hour and minute
    pub fn set_at(&self, date: NaiveDate, hour: u32, minute: u32) {
        let naive = date
            .and_hms_opt(hour, minute, 0)
            .expect("valid hour and minute");
        let now = Local
            .from_local_datetime(&naive)
            .single()
            .expect("unambiguous local time");
        self.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn manual_clock_advances_only_when_set() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let clock = ManualClock::at(date, 12, 30);

        assert_eq!(clock.today(), date);
        assert_eq!(clock.now().hour(), 12);
        assert_eq!(clock.now().minute(), 30);

        let next = date.succ_opt().unwrap();
        clock.set_at(next, 0, 0);
        assert_eq!(clock.today(), next);
        assert_eq!(clock.now().hour(), 0);
    }
}
