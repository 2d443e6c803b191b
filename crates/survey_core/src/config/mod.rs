//! Current-survey configuration and start-up validation.
//!
//! # Responsibility
//! - Parse "current survey" descriptors into typed values.
//! - Cross-check configured current surveys against the registry at start-up.
//!
//! # Invariants
//! - A `CurrentSurveys` set is non-empty and shares exactly one map area.
//! - Bootstrap never succeeds with a descriptor that does not resolve.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod app_config;
pub mod current_survey;

pub use app_config::{AppConfig, CurrentSurveyEntry, SurveySettings};
pub use current_survey::{CurrentSurvey, CurrentSurveys};

/// Configuration and bootstrap errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Descriptor is not `group.schedule.survey.map_area`.
    MalformedDescriptor(String),
    /// Current survey list is empty.
    NoCurrentSurveys,
    /// Current surveys span more than one map area.
    MixedMapAreas(Vec<String>),
    /// Registry holds no schedules at all.
    NoSchedulesRegistered,
    /// Descriptor group has no registered schedules.
    UnknownGroup { group: String, expected: Vec<String> },
    /// Descriptor schedule labels do not resolve in the registry.
    UnmatchedSchedules {
        got: Vec<String>,
        expected: Vec<String>,
    },
    /// Resolved schedule has no survey with the descriptor name and area.
    UnknownSurvey { label: String, schedule: String },
    /// Settings file could not be read.
    ReadSettings {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Settings document could not be decoded.
    InvalidSettings(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedDescriptor(value) => write!(
                f,
                "current survey descriptor is invalid: `{value}` (expected group.schedule.survey.map_area)"
            ),
            Self::NoCurrentSurveys => write!(f, "at least one current survey is required"),
            Self::MixedMapAreas(areas) => write!(
                f,
                "all current surveys must be in the same map_area, got {}",
                areas.join(", ")
            ),
            Self::NoSchedulesRegistered => {
                write!(f, "no survey schedules are registered; have you installed any surveys?")
            }
            Self::UnknownGroup { group, expected } => write!(
                f,
                "invalid group name `{group}`, expected one of [{}]",
                expected.join(", ")
            ),
            Self::UnmatchedSchedules { got, expected } => write!(
                f,
                "current surveys do not correspond with registered schedules, got [{}], expected one of [{}]",
                got.join(", "),
                expected.join(", ")
            ),
            Self::UnknownSurvey { label, schedule } => write!(
                f,
                "current survey `{label}` names no survey in schedule {schedule}"
            ),
            Self::ReadSettings { path, source } => {
                write!(f, "failed to read survey settings `{}`: {source}", path.display())
            }
            Self::InvalidSettings(err) => write!(f, "invalid survey settings: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ReadSettings { source, .. } => Some(source),
            Self::InvalidSettings(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidSettings(value)
    }
}
