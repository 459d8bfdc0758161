//! Business-hours duration engine
//!
//! Computes elapsed working time between two instants against a
//! [`BusinessCalendar`]: same-civil-date spans count raw wall-clock time
//! (deliberately unclamped to the workday window), multi-day spans sum a
//! first-day tail, full intervening workdays and a last-day head. Weekend
//! endpoints and inverted intervals are reported as precise
//! [`IntervalError`]s for the caller to classify.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use chrono::{DateTime, Datelike, Duration};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

use crate::calendar::BusinessCalendar;
use crate::error::IntervalError;

/// Non-negative elapsed working time
///
/// Zero is valid; addition is the only arithmetic the report layer needs,
/// plus a division helper for averages. Serializes as whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BusinessDuration(Duration);

impl Default for BusinessDuration {
    fn default() -> Self {
        Self::zero()
    }
}

impl BusinessDuration {
    pub fn zero() -> Self {
        Self(Duration::zero())
    }

    /// Wrap a raw difference, flooring negatives at zero
    pub(crate) fn clamped(raw: Duration) -> Self {
        if raw < Duration::zero() {
            Self::zero()
        } else {
            Self(raw)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn num_hours(&self) -> i64 {
        self.0.num_hours()
    }

    pub fn num_minutes(&self) -> i64 {
        self.0.num_minutes()
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Average helper; an empty divisor yields zero instead of panicking
    pub fn checked_div(&self, n: usize) -> Self {
        if n == 0 {
            Self::zero()
        } else {
            Self(self.0 / n as i32)
        }
    }
}

impl Add for BusinessDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for BusinessDuration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0 + rhs.0;
    }
}

impl Sum for BusinessDuration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for BusinessDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0.num_hours();
        let minutes = self.0.num_minutes() % 60;
        if hours > 0 {
            write!(f, "{}h {}m", hours, minutes)
        } else {
            write!(f, "{}m", minutes)
        }
    }
}

impl Serialize for BusinessDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.num_minutes())
    }
}

/// Duration engine bound to one business calendar
#[derive(Debug, Clone, Copy)]
pub struct WorktimeEngine {
    calendar: BusinessCalendar,
}

impl WorktimeEngine {
    pub fn new(calendar: BusinessCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    /// Elapsed working time between `start` and `end`
    ///
    /// Validation order is load-bearing: a weekend start is reported before a
    /// weekend end, which is reported before an inverted interval. A same
    /// civil date short-circuits to the raw wall-clock difference, unclamped
    /// to the workday window.
    pub fn elapsed(
        &self,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<BusinessDuration, IntervalError> {
        let cal = &self.calendar;

        if !cal.is_workday(start) {
            return Err(IntervalError::StartOnWeekend);
        }

        if !cal.is_workday(end) {
            return Err(IntervalError::EndOnWeekend);
        }

        if start > end {
            return Err(IntervalError::StartAfterEnd);
        }

        if start.year() == end.year() && start.ordinal() == end.ordinal() {
            return Ok(BusinessDuration::clamped(end - start));
        }

        let calendar_days = cal.calendar_days(start, end);
        let mut full_working_days = 0i32;
        for day in 1..calendar_days {
            if cal.is_workday(start + Duration::hours(24 * day)) {
                full_working_days += 1;
            }
        }

        let end_of_first_day = cal.end_of_workday(start);
        let first_day = if start < end_of_first_day {
            end_of_first_day - start
        } else {
            // Started after the workday closed; day one contributes nothing.
            Duration::zero()
        };

        // An end before the workday opens would go negative; floor at zero.
        let last_day = (end - cal.start_of_workday(end)).max(Duration::zero());

        Ok(BusinessDuration::clamped(
            first_day + cal.workday_length() * full_working_days + last_day,
        ))
    }
}
