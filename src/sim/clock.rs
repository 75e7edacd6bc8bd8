use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

/// A simulation clock advancing a calendar by one hour per tick.
///
/// The clock exposes the calendar position (hour, day, month, year) that the
/// price feed and house load key their lookups on. Months are 0-indexed at
/// this interface; the price table's 1-indexed months are the feed's concern.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use homegrid_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
/// assert_eq!(clock.hour(), 0);
/// clock.tick();
/// assert_eq!(clock.hour(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Current calendar instant, whole hours only.
    instant: NaiveDateTime,
}

impl Clock {
    /// Creates a clock at midnight on the given date.
    pub fn new(start: NaiveDate) -> Self {
        Self {
            instant: start.and_hms_opt(0, 0, 0).unwrap_or_default(),
        }
    }

    /// Advances the calendar by exactly one hour.
    pub fn tick(&mut self) {
        self.instant += TimeDelta::hours(1);
    }

    /// Hour of day, 0-23.
    pub fn hour(&self) -> u32 {
        self.instant.hour()
    }

    /// Day of month, 1-31.
    pub fn day(&self) -> u32 {
        self.instant.day()
    }

    /// Month of year, 0-indexed (January = 0).
    pub fn month0(&self) -> u32 {
        self.instant.month0()
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.instant.year()
    }

    /// Current timestamp formatted for display, e.g. `2025-01-01 13:00`.
    pub fn formatted(&self) -> String {
        self.instant.format("%Y-%m-%d %H:%M").to_string()
    }
}
