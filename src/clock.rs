use std::cell::Cell;

use chrono::{Local, NaiveDate, Utc};

/// Source of "now" for everything that stamps or compares dates.
///
/// `today()` is the local device calendar day with no timezone
/// normalization; crossing timezones can make it jump either way.
pub trait Clock {
    fn today(&self) -> NaiveDate;
    fn now_ms(&self) -> i64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests and demo data generation.
#[derive(Debug)]
pub struct FixedClock {
    today: Cell<NaiveDate>,
    now_ms: Cell<i64>,
}

impl FixedClock {
    pub fn new(today: NaiveDate, now_ms: i64) -> Self {
        Self {
            today: Cell::new(today),
            now_ms: Cell::new(now_ms),
        }
    }

    pub fn on(today: NaiveDate) -> Self {
        let ms = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or(0);
        Self::new(today, ms)
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }

    pub fn advance_days(&self, days: i64) {
        let next = self.today.get() + chrono::Duration::days(days);
        self.today.set(next);
        self.now_ms.set(self.now_ms.get() + days * 86_400_000);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}
