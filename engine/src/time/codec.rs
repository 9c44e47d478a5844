//! Parsing and formatting of time-of-day labels.
//!
//! Bucket labels in the collision dataset are not consistently formatted ("6:00 AM",
//! "18:30:00", "12:00 pm"). [`try_parse_label`] reports what is wrong with a label; the
//! tolerant `parse_*` helpers fall back to midnight instead of failing, so a single bad
//! row never stops the visualization.

use chrono::{NaiveTime, Timelike};
use log::warn;

use crate::error::LabelError;
use crate::models::{ClockLabel, HourConvention, Meridiem, Period, MINUTES_PER_DAY};

/// Parse a bucket label strictly under the given hour convention.
///
/// The label is split on whitespace into a time part and an optional AM/PM marker; the
/// time part is split on `:` into hour, minute and an ignored seconds field.
pub fn try_parse_label(label: &str, convention: HourConvention) -> Result<ClockLabel, LabelError> {
    let mut parts = label.split_whitespace();
    let time_part = parts.next().ok_or(LabelError::Empty)?;
    let meridiem = match parts.next() {
        Some(marker) => Some(Meridiem::parse(marker).ok_or_else(|| {
            LabelError::UnknownMarker {
                label: label.to_string(),
                marker: marker.to_string(),
            }
        })?),
        None => None,
    };

    let mut fields = time_part.split(':');
    let hour: u32 = fields
        .next()
        .and_then(|h| h.parse().ok())
        .filter(|h| *h < 24)
        .ok_or_else(|| LabelError::InvalidHour(label.to_string()))?;
    let minute: u32 = match fields.next() {
        Some(m) => m
            .parse()
            .ok()
            .filter(|m| *m < 60)
            .ok_or_else(|| LabelError::InvalidMinute(label.to_string()))?,
        None => 0,
    };

    let hour = normalize_hour(label, hour, meridiem, convention)?;
    ClockLabel::new(hour, minute).ok_or_else(|| LabelError::InvalidHour(label.to_string()))
}

fn normalize_hour(
    label: &str,
    hour: u32,
    meridiem: Option<Meridiem>,
    convention: HourConvention,
) -> Result<u32, LabelError> {
    match convention {
        HourConvention::TwelveHourClock => match meridiem {
            None => Ok(hour),
            Some(_) if hour > 12 => Err(LabelError::MarkerConflict {
                label: label.to_string(),
                hour,
            }),
            Some(Meridiem::Am) if hour == 12 => Ok(0),
            Some(Meridiem::Am) => Ok(hour),
            Some(Meridiem::Pm) if hour == 12 => Ok(12),
            Some(Meridiem::Pm) => Ok(hour + 12),
        },
        HourConvention::ModuloTwelve => match meridiem {
            Some(Meridiem::Pm) => Ok(hour % 12 + 12),
            Some(Meridiem::Am) | None => Ok(hour % 12),
        },
    }
}

/// Continuous hour value in `[0, 24)`; malformed or empty labels yield `0`.
pub fn parse_label_to_continuous_hours(label: &str, convention: HourConvention) -> f64 {
    try_parse_label(label, convention)
        .map(|l| l.continuous_hours())
        .unwrap_or(0.0)
}

/// Minutes since midnight; malformed or empty labels yield `0`.
pub fn parse_label_to_minutes(label: &str, convention: HourConvention) -> u32 {
    try_parse_label(label, convention)
        .map(|l| l.minutes_of_day())
        .unwrap_or(0)
}

/// Format a continuous hour value as "H:MM AM/PM".
///
/// Minutes are rounded, the hour wraps modulo 24, and both midnight and noon display
/// as "12".
pub fn format_continuous_hours_to_12h(hours: f64) -> String {
    let total_minutes = rounded_minutes_of_day(hours);
    let hour = total_minutes / 60;
    let minute = total_minutes % 60;
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, minute, period)
}

/// Period of the day for an hour value. Ranges are half-open:
/// Morning `[6, 12)`, Afternoon `[12, 17)`, Evening `[17, 20)`, Night otherwise.
pub fn classify_period(hour: f64) -> Period {
    if (6.0..12.0).contains(&hour) {
        Period::Morning
    } else if (12.0..17.0).contains(&hour) {
        Period::Afternoon
    } else if (17.0..20.0).contains(&hour) {
        Period::Evening
    } else {
        Period::Night
    }
}

/// Wall-clock time for a continuous hour value, rounded to the minute.
pub fn continuous_hours_to_time(hours: f64) -> NaiveTime {
    let minutes = rounded_minutes_of_day(hours);
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or_default()
}

/// Continuous hour value of a wall-clock time.
pub fn time_to_continuous_hours(time: NaiveTime) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0 + time.second() as f64 / 3600.0
}

/// Minutes since midnight of a wall-clock time (seconds truncated).
pub fn time_to_minutes(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn rounded_minutes_of_day(hours: f64) -> u32 {
    if !hours.is_finite() {
        return 0;
    }
    let total = (hours * 60.0).round() as i64;
    total.rem_euclid(MINUTES_PER_DAY as i64) as u32
}

/// Outcome of checking every dataset label against one hour convention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelReport {
    pub checked: usize,
    pub rejected: Vec<LabelError>,
}

impl LabelReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Validate labels against `convention`, logging a warning for each rejected one.
///
/// Rejected labels still participate in navigation (they parse to midnight); the report
/// exists so a deployment can detect that it picked the wrong convention.
pub fn validate_labels<'a, I>(labels: I, convention: HourConvention) -> LabelReport
where
    I: IntoIterator<Item = &'a str>,
{
    let mut report = LabelReport::default();
    for label in labels {
        report.checked += 1;
        if let Err(err) = try_parse_label(label, convention) {
            warn!("Time bucket label tolerated as midnight: {}", err);
            report.rejected.push(err);
        }
    }
    report
}
