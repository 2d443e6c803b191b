//! Read-only schedule listing for record-keeping screens.
//!
//! Rows carry display fields only; no validation crosses this boundary.

use crate::model::survey_schedule::SurveySchedule;
use crate::registry::SurveyRegistry;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Display row for one registered schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleListRow {
    pub name: String,
    pub slug: String,
    /// Zero-based index in global `start` order.
    pub chronological_order: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Lists every registered schedule in `start` order.
///
/// Ties on `start` keep the registry's group-name order.
pub fn schedule_listing(registry: &SurveyRegistry) -> Vec<ScheduleListRow> {
    let mut schedules: Vec<&SurveySchedule> = registry.survey_schedules().collect();
    schedules.sort_by_key(|schedule| schedule.start());
    schedules
        .into_iter()
        .enumerate()
        .map(|(chronological_order, schedule)| ScheduleListRow {
            name: schedule.name().to_string(),
            slug: slugify(&schedule.label()),
            chronological_order,
            start: schedule.start(),
            end: schedule.end(),
        })
        .collect()
}

/// Lowercases and collapses non-alphanumeric runs to single `-`.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    NON_SLUG_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
