//! Business calendar primitives
//!
//! Pure predicate/utility layer over one configured timezone and workday
//! window: workday tests, start/end-of-workday anchoring, and calendar-day
//! spans. Everything above (worktime engine, state machine) delegates its
//! civil-time decisions here.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveTime, Offset, TimeZone, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default timezone matching the tracker project's home office
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Default workday window: 8:00-18:00, a 10-hour working day
pub const DEFAULT_START_HOUR: u32 = 8;
pub const DEFAULT_END_HOUR: u32 = 18;

/// Calendar configuration, fixed at process start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// IANA timezone identifier (e.g. "America/Los_Angeles")
    pub timezone: String,
    /// Hour of day the workday opens (0-23)
    pub start_hour: u32,
    /// Hour of day the workday closes (1-23, after `start_hour`)
    pub end_hour: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
        }
    }
}

/// Immutable workday calendar for one timezone
///
/// Construction resolves the timezone name and validates the workday window;
/// both failures are configuration errors raised before any computation runs.
#[derive(Debug, Clone, Copy)]
pub struct BusinessCalendar {
    tz: Tz,
    start_hour: u32,
    end_hour: u32,
}

impl BusinessCalendar {
    pub fn new(config: &CalendarConfig) -> Result<Self, CoreError> {
        let tz = Tz::from_str(&config.timezone).map_err(|_| CoreError::UnknownTimezone {
            name: config.timezone.clone(),
        })?;

        if config.end_hour > 23 || config.start_hour >= config.end_hour {
            return Err(CoreError::InvalidWorkdayWindow {
                start_hour: config.start_hour,
                end_hour: config.end_hour,
            });
        }

        Ok(Self {
            tz,
            start_hour: config.start_hour,
            end_hour: config.end_hour,
        })
    }

    /// The configured timezone
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Length of one full working day (end hour - start hour)
    pub fn workday_length(&self) -> Duration {
        Duration::hours(i64::from(self.end_hour - self.start_hour))
    }

    /// True iff the instant falls on Monday through Friday in the configured zone
    pub fn is_workday(&self, instant: DateTime<Tz>) -> bool {
        !matches!(instant.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// The instant's zone-local date at the workday start hour
    pub fn start_of_workday(&self, instant: DateTime<Tz>) -> DateTime<Tz> {
        self.at_hour(instant, self.start_hour)
    }

    /// The instant's zone-local date at the workday end hour
    pub fn end_of_workday(&self, instant: DateTime<Tz>) -> DateTime<Tz> {
        self.at_hour(instant, self.end_hour)
    }

    /// Whole 24-hour periods between the two instants' start-of-workday
    /// anchors, truncated toward zero
    pub fn calendar_days(&self, start: DateTime<Tz>, end: DateTime<Tz>) -> i64 {
        (self.start_of_workday(end) - self.start_of_workday(start)).num_hours() / 24
    }

    fn at_hour(&self, instant: DateTime<Tz>, hour: u32) -> DateTime<Tz> {
        let date = instant.date_naive();
        match self
            .tz
            .with_ymd_and_hms(date.year(), date.month(), date.day(), hour, 0, 0)
        {
            LocalResult::Single(dt) => dt,
            // Fall-back transition repeats the hour; take the earlier instant.
            LocalResult::Ambiguous(earliest, _) => earliest,
            // Spring-forward gap: the wall-clock hour does not exist in this
            // zone on this date. Resolve against the instant's own UTC offset.
            LocalResult::None => {
                let offset = instant.offset().fix();
                let local = date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour));
                let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
                self.tz.from_utc_datetime(&utc)
            }
        }
    }
}
