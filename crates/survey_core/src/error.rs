//! Crate-level error wrapper.
//!
//! Layer errors stay specific; `SurveyError` lets callers that drive several
//! layers in one flow propagate with `?`.

use crate::config::ConfigError;
use crate::model::ScheduleError;
use crate::registry::RegistryError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SurveyResult<T> = Result<T, SurveyError>;

#[derive(Debug)]
pub enum SurveyError {
    Schedule(ScheduleError),
    Registry(RegistryError),
    Config(ConfigError),
}

impl Display for SurveyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schedule(err) => write!(f, "{err}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SurveyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schedule(err) => Some(err),
            Self::Registry(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ScheduleError> for SurveyError {
    fn from(value: ScheduleError) -> Self {
        Self::Schedule(value)
    }
}

impl From<RegistryError> for SurveyError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<ConfigError> for SurveyError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}
