//! Strict relative-time formatting ("3 days ago", "in 2 hours").
//!
//! The unit is picked from the absolute distance and the value is rounded to the
//! nearest whole unit; no "about"/"almost" qualifiers are produced.

use chrono::{DateTime, Utc};

const MINUTES_IN_HOUR: f64 = 60.0;
const MINUTES_IN_DAY: f64 = 1440.0;
const MINUTES_IN_MONTH: f64 = 43_200.0;
const MINUTES_IN_YEAR: f64 = 525_600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Unit {
    fn label(self, value: i64) -> &'static str {
        let singular = value == 1;
        match (self, singular) {
            (Unit::Second, true) => "second",
            (Unit::Second, false) => "seconds",
            (Unit::Minute, true) => "minute",
            (Unit::Minute, false) => "minutes",
            (Unit::Hour, true) => "hour",
            (Unit::Hour, false) => "hours",
            (Unit::Day, true) => "day",
            (Unit::Day, false) => "days",
            (Unit::Month, true) => "month",
            (Unit::Month, false) => "months",
            (Unit::Year, true) => "year",
            (Unit::Year, false) => "years",
        }
    }
}

/// Formats the distance between `date` and `now` with a suffix.
pub fn format_distance_strict(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let millis = (date - now).num_milliseconds();
    let abs_millis = millis.unsigned_abs() as f64;
    let minutes = abs_millis / 60_000.0;

    let (value, unit) = if minutes < 1.0 {
        ((abs_millis / 1000.0).round() as i64, Unit::Second)
    } else if minutes < MINUTES_IN_HOUR {
        (minutes.round() as i64, Unit::Minute)
    } else if minutes < MINUTES_IN_DAY {
        ((minutes / MINUTES_IN_HOUR).round() as i64, Unit::Hour)
    } else if minutes < MINUTES_IN_MONTH {
        ((minutes / MINUTES_IN_DAY).round() as i64, Unit::Day)
    } else if minutes < MINUTES_IN_YEAR {
        match (minutes / MINUTES_IN_MONTH).round() as i64 {
            12 => (1, Unit::Year),
            months => (months, Unit::Month),
        }
    } else {
        ((minutes / MINUTES_IN_YEAR).round() as i64, Unit::Year)
    };

    let distance = format!("{} {}", value, unit.label(value));
    if millis > 0 {
        format!("in {distance}")
    } else {
        format!("{distance} ago")
    }
}
