//! Start-up configuration for the survey app.
//!
//! # Responsibility
//! - Hold default current surveys and optional settings overrides.
//! - Validate the effective current surveys against a populated registry.
//!
//! # Invariants
//! - Settings overrides replace defaults wholesale, never merge.
//! - `ready` either returns a fully resolved set or an error; no partial state.

use crate::config::current_survey::CurrentSurveys;
use crate::config::ConfigError;
use crate::registry::SurveyRegistry;
use log::{error, info};
use serde::Deserialize;
use std::path::Path;
use std::time::Instant;

/// One settings entry for a current survey.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentSurveyEntry {
    pub label: String,
    pub position: u32,
}

/// Deployment settings document.
///
/// ```json
/// {"current_surveys": [{"label": "ess.year-1.baseline.test_community", "position": 0}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveySettings {
    #[serde(default)]
    pub current_surveys: Option<Vec<CurrentSurveyEntry>>,
}

impl SurveySettings {
    /// Decodes settings from a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and decodes a JSON settings file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Current-survey override, `None` when the settings do not set one.
    pub fn current_surveys(&self) -> Option<Result<CurrentSurveys, ConfigError>> {
        self.current_surveys.as_ref().map(|entries| {
            CurrentSurveys::parse(
                entries
                    .iter()
                    .map(|entry| (entry.label.as_str(), entry.position)),
            )
        })
    }
}

/// Survey app configuration checked once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub current_surveys: CurrentSurveys,
    pub settings: Option<SurveySettings>,
    /// Also require each descriptor's survey to exist in its schedule.
    pub require_named_surveys: bool,
}

impl AppConfig {
    pub fn new(name: impl Into<String>, current_surveys: CurrentSurveys) -> Self {
        Self {
            name: name.into(),
            current_surveys,
            settings: None,
            require_named_surveys: false,
        }
    }

    /// Attaches deployment settings that may override current surveys.
    pub fn with_settings(mut self, settings: SurveySettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Makes `ready` also reject descriptors whose survey name and area are
    /// absent from the resolved schedule.
    pub fn with_named_survey_check(mut self) -> Self {
        self.require_named_surveys = true;
        self
    }

    /// Returns the settings override when present, otherwise the defaults.
    pub fn effective_current_surveys(&self) -> Result<CurrentSurveys, ConfigError> {
        match self.settings.as_ref().and_then(SurveySettings::current_surveys) {
            Some(overridden) => overridden,
            None => Ok(self.current_surveys.clone()),
        }
    }

    /// Validates current surveys against the registry.
    ///
    /// # Errors
    /// - `NoSchedulesRegistered` when the registry is empty.
    /// - `UnknownGroup` when a descriptor group has no schedules.
    /// - `UnmatchedSchedules` when a descriptor schedule label is unknown.
    /// - `UnknownSurvey` when the named survey check is enabled and the
    ///   schedule lacks the named survey in that area.
    /// - Any override parsing error from settings.
    pub fn ready(&self, registry: &SurveyRegistry) -> Result<CurrentSurveys, ConfigError> {
        let started_at = Instant::now();
        info!(
            "event=bootstrap module=config status=start app={}",
            self.name
        );

        match self
            .effective_current_surveys()
            .and_then(|current| {
                validate_current_surveys(&current, registry)?;
                if self.require_named_surveys {
                    validate_named_surveys(&current, registry)?;
                }
                Ok(current)
            })
        {
            Ok(current) => {
                for label in current.labels() {
                    info!("event=current_survey module=config status=ok label={label}");
                }
                info!(
                    "event=bootstrap module=config status=ok app={} map_area={} duration_ms={}",
                    self.name,
                    current.map_area(),
                    started_at.elapsed().as_millis()
                );
                Ok(current)
            }
            Err(err) => {
                error!(
                    "event=bootstrap module=config status=error app={} duration_ms={} error={}",
                    self.name,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn validate_current_surveys(
    current_surveys: &CurrentSurveys,
    registry: &SurveyRegistry,
) -> Result<(), ConfigError> {
    if registry.is_empty() {
        return Err(ConfigError::NoSchedulesRegistered);
    }

    for current in current_surveys {
        if registry
            .get_survey_schedules(current.group_name())
            .is_empty()
        {
            return Err(ConfigError::UnknownGroup {
                group: current.group_name().to_string(),
                expected: registry
                    .get_survey_schedule_group_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            });
        }
    }

    let schedule_labels: Vec<String> = current_surveys
        .iter()
        .map(|current| current.schedule_label())
        .collect();
    if !registry.contains_labels(schedule_labels.as_slice()) {
        return Err(ConfigError::UnmatchedSchedules {
            got: current_surveys
                .labels()
                .into_iter()
                .map(str::to_string)
                .collect(),
            expected: registry.labels(),
        });
    }

    Ok(())
}

fn validate_named_surveys(
    current_surveys: &CurrentSurveys,
    registry: &SurveyRegistry,
) -> Result<(), ConfigError> {
    for current in current_surveys {
        let Some(schedule) = registry.get_survey_schedule(&current.schedule_label()) else {
            continue;
        };
        let found = schedule
            .get_surveys(Some(current.map_area()), None)
            .iter()
            .any(|survey| survey.name() == Some(current.survey_name()));
        if !found {
            return Err(ConfigError::UnknownSurvey {
                label: current.label().to_string(),
                schedule: schedule.label(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::SurveySettings;
    use crate::config::ConfigError;

    #[test]
    fn settings_without_override_yield_none() {
        let settings = SurveySettings::from_json_str("{}").expect("empty settings decode");
        assert!(settings.current_surveys().is_none());
    }

    #[test]
    fn settings_override_is_parsed() {
        let settings = SurveySettings::from_json_str(
            r#"{"current_surveys": [
                {"label": "ess.year-2.annual-1.north", "position": 1},
                {"label": "ess.year-1.baseline.north", "position": 0}
            ]}"#,
        )
        .expect("settings decode");
        let current = settings
            .current_surveys()
            .expect("override present")
            .expect("override valid");
        assert_eq!(current.labels()[0], "ess.year-1.baseline.north");
    }

    #[test]
    fn settings_reject_unknown_fields() {
        let err = SurveySettings::from_json_str(r#"{"current_survey": []}"#)
            .expect_err("typo must be rejected");
        assert!(matches!(err, ConfigError::InvalidSettings(_)));
    }

    #[test]
    fn settings_file_is_read_and_missing_file_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"current_surveys": null}"#).expect("write settings");

        let settings = SurveySettings::from_json_file(&path).expect("settings file decodes");
        assert!(settings.current_surveys().is_none());

        let err = SurveySettings::from_json_file(dir.path().join("missing.json"))
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::ReadSettings { .. }));
    }

    #[test]
    fn empty_override_is_an_error() {
        let settings = SurveySettings::from_json_str(r#"{"current_surveys": []}"#).unwrap();
        let err = settings
            .current_surveys()
            .expect("override present")
            .expect_err("empty override must fail");
        assert!(matches!(err, ConfigError::NoCurrentSurveys));
    }
}
