//! In-process survey schedule registry.

use crate::model::survey_schedule::SurveySchedule;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schedule registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Schedule name or window collides with an existing registration.
    AlreadyRegistered {
        label: String,
        existing: String,
        reason: CollisionReason,
    },
}

/// Which registry uniqueness rule a schedule violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionReason {
    Name,
    Window,
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRegistered {
                label,
                existing,
                reason: CollisionReason::Name,
            } => write!(
                f,
                "survey schedule already registered: {label} shares its name with {existing}"
            ),
            Self::AlreadyRegistered {
                label,
                existing,
                reason: CollisionReason::Window,
            } => write!(
                f,
                "survey schedule already registered: {label} shares its start and end with {existing}"
            ),
        }
    }
}

impl Error for RegistryError {}

/// Registry of survey schedules keyed by group name.
///
/// Constructed explicitly and passed by reference to whatever needs lookup
/// or registration; there is no process-wide instance.
#[derive(Debug, Default)]
pub struct SurveyRegistry {
    groups: BTreeMap<String, Vec<SurveySchedule>>,
}

impl SurveyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one schedule under its group.
    ///
    /// # Errors
    /// - `RegistryError::AlreadyRegistered` when any registered schedule, in
    ///   any group, has the same name or the same `(start, end)` pair.
    pub fn register(&mut self, schedule: SurveySchedule) -> Result<(), RegistryError> {
        if let Err(err) = self.check_unique(&schedule) {
            warn!(
                "event=schedule_rejected module=registry status=error label={} error={}",
                schedule.label(),
                err
            );
            return Err(err);
        }

        info!(
            "event=schedule_registered module=registry status=ok label={} surveys={}",
            schedule.label(),
            schedule.surveys().len()
        );
        let group = self
            .groups
            .entry(schedule.group_name().to_string())
            .or_default();
        group.push(schedule);
        group.sort_by_key(SurveySchedule::start);
        Ok(())
    }

    /// Returns schedules of one group ordered by `start`.
    ///
    /// Unknown groups yield an empty slice.
    pub fn get_survey_schedules(&self, group_name: &str) -> &[SurveySchedule] {
        self.groups
            .get(group_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns sorted group names that hold at least one schedule.
    pub fn get_survey_schedule_group_names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Looks up a schedule by `"{group_name}.{name}"` label.
    ///
    /// Matches whole labels, so group names may themselves contain dots.
    pub fn get_survey_schedule(&self, label: &str) -> Option<&SurveySchedule> {
        self.survey_schedules().find(|schedule| {
            label
                .strip_prefix(schedule.group_name())
                .and_then(|rest| rest.strip_prefix('.'))
                == Some(schedule.name())
        })
    }

    /// Returns whether every label resolves to a registered schedule.
    pub fn contains_labels<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        labels
            .iter()
            .all(|label| self.get_survey_schedule(label.as_ref()).is_some())
    }

    /// Iterates all schedules by group name, then `start`.
    pub fn survey_schedules(&self) -> impl Iterator<Item = &SurveySchedule> {
        self.groups.values().flatten()
    }

    /// Labels of all schedules by group name, then `start`.
    pub fn labels(&self) -> Vec<String> {
        self.survey_schedules().map(SurveySchedule::label).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Drops every registered schedule.
    pub fn clear_registry(&mut self) {
        let dropped = self.len();
        self.groups.clear();
        info!("event=registry_cleared module=registry status=ok dropped={dropped}");
    }

    fn check_unique(&self, schedule: &SurveySchedule) -> Result<(), RegistryError> {
        let window: (DateTime<Utc>, DateTime<Utc>) = (schedule.start(), schedule.end());
        for existing in self.survey_schedules() {
            let reason = if existing.name() == schedule.name() {
                CollisionReason::Name
            } else if (existing.start(), existing.end()) == window {
                CollisionReason::Window
            } else {
                continue;
            };
            return Err(RegistryError::AlreadyRegistered {
                label: schedule.label(),
                existing: existing.label(),
                reason,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CollisionReason, RegistryError, SurveyRegistry};
    use crate::model::survey_schedule::SurveySchedule;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single().unwrap()
    }

    fn schedule(group: &str, name: &str, from_day: i64) -> SurveySchedule {
        SurveySchedule::new(
            name,
            group,
            t0() + TimeDelta::days(from_day),
            t0() + TimeDelta::days(from_day + 30),
        )
        .expect("valid schedule")
    }

    #[test]
    fn name_collision_is_checked_across_groups() {
        let mut registry = SurveyRegistry::new();
        registry.register(schedule("ess", "year-1", 0)).unwrap();

        let err = registry
            .register(schedule("bhs", "year-1", 100))
            .expect_err("name is unique across groups");
        assert!(matches!(
            err,
            RegistryError::AlreadyRegistered {
                reason: CollisionReason::Name,
                ..
            }
        ));
    }

    #[test]
    fn window_collision_is_checked_across_groups() {
        let mut registry = SurveyRegistry::new();
        registry.register(schedule("ess", "year-1", 0)).unwrap();

        let err = registry
            .register(schedule("bhs", "year-2", 0))
            .expect_err("window is unique across groups");
        assert!(matches!(
            err,
            RegistryError::AlreadyRegistered {
                reason: CollisionReason::Window,
                ..
            }
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_by_label_and_group_names() {
        let mut registry = SurveyRegistry::new();
        registry.register(schedule("ess", "year-1", 0)).unwrap();
        registry.register(schedule("bhs", "round-1", 50)).unwrap();

        assert_eq!(registry.get_survey_schedule_group_names(), vec!["bhs", "ess"]);
        assert_eq!(
            registry
                .get_survey_schedule("ess.year-1")
                .map(SurveySchedule::label),
            Some("ess.year-1".to_string())
        );
        assert!(registry.get_survey_schedule("ess").is_none());
        assert!(registry.get_survey_schedule("ess.round-1").is_none());
        assert!(registry.contains_labels(&["ess.year-1", "bhs.round-1"]));
        assert!(!registry.contains_labels(&["ess.year-1", "ess.year-9"]));
        assert!(registry.get_survey_schedules("nope").is_empty());
    }

    #[test]
    fn dotted_group_name_resolves_by_full_label() {
        let mut registry = SurveyRegistry::new();
        registry.register(schedule("bcpp.v2", "year-1", 0)).unwrap();
        registry.register(schedule("bcpp", "v2", 100)).unwrap();

        let labels = registry.labels();
        assert_eq!(labels, vec!["bcpp.v2", "bcpp.v2.year-1"]);
        assert!(registry.contains_labels(labels.as_slice()));
        assert_eq!(
            registry
                .get_survey_schedule("bcpp.v2.year-1")
                .map(SurveySchedule::group_name),
            Some("bcpp.v2")
        );
        assert_eq!(
            registry
                .get_survey_schedule("bcpp.v2")
                .map(SurveySchedule::group_name),
            Some("bcpp")
        );
        assert!(registry.get_survey_schedule("bcpp.v2.year-2").is_none());
    }

    #[test]
    fn clear_registry_drops_everything() {
        let mut registry = SurveyRegistry::new();
        registry.register(schedule("ess", "year-1", 0)).unwrap();
        registry.clear_registry();
        assert!(registry.is_empty());
        registry
            .register(schedule("ess", "year-1", 0))
            .expect("cleared registry accepts the same schedule again");
    }
}
