//! Survey schedule domain model.
//!
//! # Responsibility
//! - Bound a group of surveys by one hour-aligned UTC window.
//! - Validate survey insertion (containment, uniqueness, allowed areas).
//! - Answer area and point-in-time lookups over contained surveys.
//!
//! # Invariants
//! - `start < end`, `start` floored and `end` ceiled to the hour in UTC.
//! - Every contained survey lies within `[start, end]`.
//! - Contained survey names and map areas are unique.
//! - When `map_areas` is non-empty it lists every contained survey's area.
//! - Contained surveys are kept sorted by `start` (stable).

use crate::model::survey::Survey;
use crate::model::{ceil_hour, floor_hour, format_day, ScheduleError, WindowEdge};
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// How a schedule treats surveys whose windows intersect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Surveys in different map areas may run at the same time.
    #[default]
    Allow,
    /// No two contained survey windows may share an instant.
    Reject,
}

/// Optional construction settings for a survey schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Allowed map areas. `None` or empty accepts any area.
    pub map_areas: Option<Vec<String>>,
    pub overlap_policy: OverlapPolicy,
}

/// Named, time-bounded container of surveys within one study group.
#[derive(Debug, Clone, Serialize)]
pub struct SurveySchedule {
    name: String,
    group_name: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    map_areas: Option<BTreeSet<String>>,
    overlap_policy: OverlapPolicy,
    surveys: Vec<Survey>,
}

impl SurveySchedule {
    /// Creates a schedule accepting any map area and overlapping surveys.
    ///
    /// # Errors
    /// - `ScheduleError::ScheduleRange` when `start >= end`, or when the
    ///   hour-aligned window cannot be represented.
    pub fn new<Tz: TimeZone>(
        name: impl Into<String>,
        group_name: impl Into<String>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Self, ScheduleError> {
        Self::with_options(name, group_name, start, end, ScheduleOptions::default())
    }

    /// Creates a schedule with an area allow-list and overlap policy.
    ///
    /// Inputs are converted to UTC; `start` is floored to its hour and `end`
    /// ceiled to the last microsecond of its hour.
    pub fn with_options<Tz: TimeZone>(
        name: impl Into<String>,
        group_name: impl Into<String>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
        options: ScheduleOptions,
    ) -> Result<Self, ScheduleError> {
        let name = name.into();
        let group_name = group_name.into();
        let start = start.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);
        if start >= end {
            return Err(ScheduleError::ScheduleRange {
                subject: format!("survey schedule {group_name}.{name}"),
                start,
                end,
            });
        }

        let (Some(floored), Some(ceiled)) = (floor_hour(start), ceil_hour(end)) else {
            return Err(ScheduleError::ScheduleRange {
                subject: format!("survey schedule {group_name}.{name}"),
                start,
                end,
            });
        };

        let schedule = Self {
            start: floored,
            end: ceiled,
            map_areas: options
                .map_areas
                .map(|areas| areas.into_iter().collect::<BTreeSet<_>>()),
            overlap_policy: options.overlap_policy,
            surveys: Vec::new(),
            name,
            group_name,
        };
        debug!(
            "event=schedule_created module=model status=ok label={} start={} end={}",
            schedule.label(),
            schedule.start.to_rfc3339(),
            schedule.end.to_rfc3339()
        );
        Ok(schedule)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Allowed map areas, `None` when any area is accepted.
    pub fn map_areas(&self) -> Option<&BTreeSet<String>> {
        self.map_areas.as_ref()
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap_policy
    }

    /// External identity string, `"{group_name}.{name}"`.
    pub fn label(&self) -> String {
        format!("{}.{}", self.group_name, self.name)
    }

    /// Contained surveys ordered by `start`.
    pub fn surveys(&self) -> &[Survey] {
        &self.surveys
    }

    /// Short description, e.g. `SurveySchedule('ess.year-1', 2020-01-01 UTC, 2021-01-01 UTC)`.
    pub fn summary(&self) -> String {
        format!(
            "SurveySchedule('{}', {}, {})",
            self.label(),
            format_day(&self.start),
            format_day(&self.end)
        )
    }

    /// Adds surveys in order, validating each against this schedule.
    ///
    /// Surveys accepted before a failing one stay in the schedule; the
    /// failing survey and any after it are dropped. Contained surveys are
    /// re-sorted by `start` whether or not the batch completed.
    ///
    /// # Errors
    /// - `DateRange` when a survey edge falls outside the schedule window.
    /// - `DuplicateName` / `DuplicateArea` on uniqueness violations.
    /// - `MapArea` when the area is not in a non-empty allow-list.
    /// - `Overlap` when windows intersect under `OverlapPolicy::Reject`.
    pub fn add_surveys(
        &mut self,
        surveys: impl IntoIterator<Item = Survey>,
    ) -> Result<(), ScheduleError> {
        let result = surveys
            .into_iter()
            .try_for_each(|survey| self.add_one(survey));
        self.surveys.sort_by_key(Survey::start);
        result
    }

    /// Returns contained surveys matching every supplied filter, in order.
    ///
    /// - `map_area`: exact match.
    /// - `reference_datetime`: `survey.start <= t <= survey.end`.
    pub fn get_surveys(
        &self,
        map_area: Option<&str>,
        reference_datetime: Option<DateTime<Utc>>,
    ) -> Vec<&Survey> {
        self.surveys
            .iter()
            .filter(|survey| map_area.map_or(true, |area| survey.map_area() == area))
            .filter(|survey| reference_datetime.map_or(true, |t| survey.contains(t)))
            .collect()
    }

    fn add_one(&mut self, mut survey: Survey) -> Result<(), ScheduleError> {
        if let Err(err) = self.check_survey(&survey) {
            warn!(
                "event=survey_rejected module=model status=error schedule={} survey={} error={}",
                self.label(),
                survey.display_name(),
                err
            );
            return Err(err);
        }

        survey.stamp_schedule(self.label());
        debug!(
            "event=survey_added module=model status=ok schedule={} survey={} map_area={}",
            self.label(),
            survey.display_name(),
            survey.map_area()
        );
        self.surveys.push(survey);
        Ok(())
    }

    fn check_survey(&self, survey: &Survey) -> Result<(), ScheduleError> {
        for (edge, value) in [
            (WindowEdge::Start, survey.start()),
            (WindowEdge::End, survey.end()),
        ] {
            if value < self.start || value > self.end {
                return Err(ScheduleError::DateRange {
                    schedule: self.label(),
                    survey: survey.display_name().to_string(),
                    edge,
                    value,
                });
            }
        }

        if let Some(name) = survey.name() {
            if self.surveys.iter().any(|s| s.name() == Some(name)) {
                return Err(ScheduleError::DuplicateName {
                    schedule: self.label(),
                    name: name.to_string(),
                });
            }
        }

        if self.surveys.iter().any(|s| s.map_area() == survey.map_area()) {
            return Err(ScheduleError::DuplicateArea {
                schedule: self.label(),
                map_area: survey.map_area().to_string(),
            });
        }

        if let Some(allowed) = self.map_areas.as_ref().filter(|areas| !areas.is_empty()) {
            if !allowed.contains(survey.map_area()) {
                return Err(ScheduleError::MapArea {
                    schedule: self.label(),
                    map_area: survey.map_area().to_string(),
                });
            }
        }

        if self.overlap_policy == OverlapPolicy::Reject {
            if let Some(existing) = self.surveys.iter().find(|s| s.overlaps(survey)) {
                return Err(ScheduleError::Overlap {
                    schedule: self.label(),
                    survey: survey.display_name().to_string(),
                    existing: existing.display_name().to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Display for SurveySchedule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.group_name, self.name)
    }
}

/// Schedules compare by label and normalized window.
impl PartialEq for SurveySchedule {
    fn eq(&self, other: &Self) -> bool {
        self.group_name == other.group_name
            && self.name == other.name
            && self.start == other.start
            && self.end == other.end
    }
}

impl Eq for SurveySchedule {}
