//! Survey domain model.
//!
//! # Responsibility
//! - Define one dated survey window tied to a single map area.
//! - Validate window ordering and enrollment bounds at construction.
//!
//! # Invariants
//! - `start < end`.
//! - `start <= full_enrollment <= end`.
//! - `id` is stable and never reused for another survey.

use crate::model::ScheduleError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Stable identity of one survey instance.
pub type SurveyId = Uuid;

/// One dated survey window inside a survey schedule.
///
/// Equality is identity: two surveys with identical fields but created
/// separately are different surveys.
#[derive(Debug, Clone, Serialize)]
pub struct Survey {
    id: SurveyId,
    name: Option<String>,
    position: Option<u32>,
    map_area: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    full_enrollment: DateTime<Utc>,
    survey_schedule: Option<String>,
}

impl Survey {
    /// Creates a validated, schedule-less survey.
    ///
    /// # Errors
    /// - `ScheduleError::ScheduleRange` when `start >= end`.
    /// - `ScheduleError::EnrollmentOutOfRange` when `full_enrollment` is
    ///   outside `[start, end]`.
    pub fn new(
        map_area: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        full_enrollment: DateTime<Utc>,
    ) -> Result<Self, ScheduleError> {
        let map_area = map_area.into();
        if start >= end {
            return Err(ScheduleError::ScheduleRange {
                subject: format!("survey in {map_area}"),
                start,
                end,
            });
        }
        if full_enrollment < start || full_enrollment > end {
            return Err(ScheduleError::EnrollmentOutOfRange {
                subject: format!("survey in {map_area}"),
                full_enrollment,
                start,
                end,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: None,
            position: None,
            map_area,
            start,
            end,
            full_enrollment,
            survey_schedule: None,
        })
    }

    /// Sets the survey name, e.g. `baseline` or `annual-1`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the ordering hint within a schedule.
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn id(&self) -> SurveyId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn position(&self) -> Option<u32> {
        self.position
    }

    pub fn map_area(&self) -> &str {
        &self.map_area
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn full_enrollment(&self) -> DateTime<Utc> {
        self.full_enrollment
    }

    /// Label of the owning schedule, once added to one.
    pub fn survey_schedule(&self) -> Option<&str> {
        self.survey_schedule.as_deref()
    }

    /// Returns whether `reference` lies in `[start, end]`, inclusive.
    pub fn contains(&self, reference: DateTime<Utc>) -> bool {
        self.start <= reference && reference <= self.end
    }

    /// Returns whether both windows share at least one instant.
    pub fn overlaps(&self, other: &Survey) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Human-readable name for diagnostics; falls back to the map area.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.map_area.as_str())
    }

    pub(crate) fn stamp_schedule(&mut self, label: String) {
        self.survey_schedule = Some(label);
    }
}

impl PartialEq for Survey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Survey {}
