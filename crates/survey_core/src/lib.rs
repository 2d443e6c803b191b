//! Survey schedule bookkeeping core.
//! This crate is the single source of truth for schedule and survey invariants.

pub mod admin;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod registry;

pub use admin::{schedule_listing, ScheduleListRow};
pub use config::{
    AppConfig, ConfigError, CurrentSurvey, CurrentSurveyEntry, CurrentSurveys, SurveySettings,
};
pub use error::{SurveyError, SurveyResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::survey::{Survey, SurveyId};
pub use model::survey_schedule::{OverlapPolicy, ScheduleOptions, SurveySchedule};
pub use model::{ScheduleError, WindowEdge};
pub use registry::{CollisionReason, RegistryError, SurveyRegistry};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
