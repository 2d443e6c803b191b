//! Typed "current survey" descriptors.

use crate::config::ConfigError;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// One configured current survey, parsed from
/// `"{group_name}.{schedule_name}.{survey_name}.{map_area}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentSurvey {
    label: String,
    sequence: u32,
    group_name: String,
    schedule_name: String,
    survey_name: String,
    map_area: String,
}

impl CurrentSurvey {
    /// Parses a descriptor label with its sequence index.
    ///
    /// # Errors
    /// - `ConfigError::MalformedDescriptor` unless the trimmed label has
    ///   exactly four non-blank dot-separated segments.
    pub fn parse(label: &str, sequence: u32) -> Result<Self, ConfigError> {
        let label = label.trim();
        let parts: Vec<&str> = label.split('.').collect();
        let [group_name, schedule_name, survey_name, map_area] = parts.as_slice() else {
            return Err(ConfigError::MalformedDescriptor(label.to_string()));
        };
        if parts.iter().any(|part| part.trim().is_empty()) {
            return Err(ConfigError::MalformedDescriptor(label.to_string()));
        }

        Ok(Self {
            label: label.to_string(),
            sequence,
            group_name: group_name.to_string(),
            schedule_name: schedule_name.to_string(),
            survey_name: survey_name.to_string(),
            map_area: map_area.to_string(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn schedule_name(&self) -> &str {
        &self.schedule_name
    }

    pub fn survey_name(&self) -> &str {
        &self.survey_name
    }

    pub fn map_area(&self) -> &str {
        &self.map_area
    }

    /// Label of the schedule this descriptor points at, `"{group}.{schedule}"`.
    pub fn schedule_label(&self) -> String {
        format!("{}.{}", self.group_name, self.schedule_name)
    }
}

impl Display for CurrentSurvey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Ordered, single-area set of current surveys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentSurveys {
    current_surveys: Vec<CurrentSurvey>,
    map_area: String,
}

impl CurrentSurveys {
    /// Sorts descriptors by sequence and checks they share one map area.
    ///
    /// # Errors
    /// - `ConfigError::NoCurrentSurveys` for an empty list.
    /// - `ConfigError::MixedMapAreas` when more than one area appears.
    pub fn new(mut current_surveys: Vec<CurrentSurvey>) -> Result<Self, ConfigError> {
        current_surveys.sort_by_key(CurrentSurvey::sequence);
        let areas: BTreeSet<&str> = current_surveys
            .iter()
            .map(CurrentSurvey::map_area)
            .collect();
        let map_area = match areas.len() {
            0 => return Err(ConfigError::NoCurrentSurveys),
            1 => areas.into_iter().collect::<String>(),
            _ => {
                return Err(ConfigError::MixedMapAreas(
                    areas.into_iter().map(str::to_string).collect(),
                ))
            }
        };

        Ok(Self {
            current_surveys,
            map_area,
        })
    }

    /// Parses `(label, sequence)` pairs and builds the set.
    pub fn parse<'a>(
        entries: impl IntoIterator<Item = (&'a str, u32)>,
    ) -> Result<Self, ConfigError> {
        let parsed = entries
            .into_iter()
            .map(|(label, sequence)| CurrentSurvey::parse(label, sequence))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }

    /// The map area shared by every current survey.
    pub fn map_area(&self) -> &str {
        &self.map_area
    }

    /// Descriptor labels in sequence order.
    pub fn labels(&self) -> Vec<&str> {
        self.current_surveys
            .iter()
            .map(CurrentSurvey::label)
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CurrentSurvey> {
        self.current_surveys.iter()
    }

    pub fn len(&self) -> usize {
        self.current_surveys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_surveys.is_empty()
    }
}

impl<'a> IntoIterator for &'a CurrentSurveys {
    type Item = &'a CurrentSurvey;
    type IntoIter = std::slice::Iter<'a, CurrentSurvey>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
