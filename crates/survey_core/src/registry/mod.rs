//! Registry of known survey schedules.
//!
//! # Responsibility
//! - Own every registered `SurveySchedule`, grouped by group name.
//! - Answer group and label lookups used by bootstrap validation.
//!
//! # Invariants
//! - Schedule names are unique across all groups.
//! - No two schedules share the same `(start, end)` window.
//! - Schedules within a group are kept sorted by `start`.

pub mod survey_registry;

pub use survey_registry::{CollisionReason, RegistryError, SurveyRegistry};
