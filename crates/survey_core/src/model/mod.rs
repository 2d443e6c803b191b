//! Survey and schedule domain model.
//!
//! # Responsibility
//! - Define the dated records validated by core business logic.
//! - Keep interval containment and uniqueness rules in one place.
//!
//! # Invariants
//! - All timestamps are stored in UTC.
//! - A record that exists has already passed its own date-ordering checks.

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod survey;
pub mod survey_schedule;

/// Which edge of a survey window failed a containment check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEdge {
    Start,
    End,
}

impl Display for WindowEdge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::End => write!(f, "end"),
        }
    }
}

/// Validation errors for surveys and survey schedules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// `start` is not strictly before `end`.
    ScheduleRange {
        subject: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Survey full-enrollment timestamp falls outside its own window.
    EnrollmentOutOfRange {
        subject: String,
        full_enrollment: DateTime<Utc>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Survey window edge falls outside its schedule window.
    DateRange {
        schedule: String,
        survey: String,
        edge: WindowEdge,
        value: DateTime<Utc>,
    },
    DuplicateName {
        schedule: String,
        name: String,
    },
    DuplicateArea {
        schedule: String,
        map_area: String,
    },
    /// Survey map area is not in the schedule allow-list.
    MapArea {
        schedule: String,
        map_area: String,
    },
    /// Survey window intersects another survey while overlaps are rejected.
    Overlap {
        schedule: String,
        survey: String,
        existing: String,
    },
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScheduleRange {
                subject,
                start,
                end,
            } => write!(
                f,
                "invalid range for {subject}: start {} must precede end {}",
                format_day(start),
                format_day(end)
            ),
            Self::EnrollmentOutOfRange {
                subject,
                full_enrollment,
                start,
                end,
            } => write!(
                f,
                "invalid full enrollment for {subject}: {} is outside {}..{}",
                format_day(full_enrollment),
                format_day(start),
                format_day(end)
            ),
            Self::DateRange {
                schedule,
                survey,
                edge,
                value,
            } => write!(
                f,
                "unable to add survey {survey} to schedule {schedule}: {edge} {} is outside the schedule",
                format_day(value)
            ),
            Self::DuplicateName { schedule, name } => write!(
                f,
                "unable to add survey to schedule {schedule}: name already added: {name}"
            ),
            Self::DuplicateArea { schedule, map_area } => write!(
                f,
                "unable to add survey to schedule {schedule}: map_area already added: {map_area}"
            ),
            Self::MapArea { schedule, map_area } => write!(
                f,
                "unable to add survey to schedule {schedule}: map_area not allowed: {map_area}"
            ),
            Self::Overlap {
                schedule,
                survey,
                existing,
            } => write!(
                f,
                "unable to add survey {survey} to schedule {schedule}: overlaps {existing}"
            ),
        }
    }
}

impl Error for ScheduleError {}

/// Floors a timestamp to the first instant of its hour.
///
/// Returns `None` when the result falls outside chrono's representable range.
pub fn floor_hour(value: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let elapsed_secs = i64::from(value.minute() * 60 + value.second());
    value
        .checked_sub_signed(TimeDelta::seconds(elapsed_secs))?
        .checked_sub_signed(TimeDelta::nanoseconds(i64::from(value.nanosecond())))
}

/// Ceils a timestamp to the last microsecond of its hour.
///
/// Returns `None` when the result falls outside chrono's representable range.
pub fn ceil_hour(value: DateTime<Utc>) -> Option<DateTime<Utc>> {
    floor_hour(value)?
        .checked_add_signed(TimeDelta::hours(1) - TimeDelta::microseconds(1))
}

pub(crate) fn format_day(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::{ceil_hour, floor_hour};
    use chrono::{DateTime, TimeZone, Timelike, Utc};

    #[test]
    fn floor_hour_drops_minutes_seconds_and_fraction() {
        let value = Utc
            .with_ymd_and_hms(2024, 3, 5, 14, 37, 12)
            .single()
            .expect("valid timestamp")
            + chrono::TimeDelta::milliseconds(250);
        let floored = floor_hour(value).expect("floor in range");
        assert_eq!(
            floored,
            Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn ceil_hour_reaches_last_microsecond_even_on_boundary() {
        let on_boundary = Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).single().unwrap();
        let ceiled = ceil_hour(on_boundary).expect("ceil in range");
        assert_eq!(ceiled.hour(), 14);
        assert_eq!(ceiled.minute(), 59);
        assert_eq!(ceiled.second(), 59);
        assert_eq!(ceiled.nanosecond(), 999_999_000);
    }

    #[test]
    fn ceil_hour_near_max_is_none_instead_of_panicking() {
        assert!(ceil_hour(DateTime::<Utc>::MAX_UTC).is_none());
        assert!(floor_hour(DateTime::<Utc>::MAX_UTC).is_some());
    }
}
