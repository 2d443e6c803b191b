//! CLI smoke entry point.
//!
//! # Responsibility
//! - Build the demo survey schedules and run start-up validation.
//! - Print the current surveys, or the bootstrap error, deterministically.
//!
//! Usage: `survey_cli [settings.json]`; set `SURVEY_LOG_DIR` (absolute) to
//! also write core logs.

use chrono::{DateTime, Months, TimeDelta, Utc};
use std::error::Error;
use std::process::ExitCode;
use survey_core::{
    schedule_listing, AppConfig, CurrentSurveys, Survey, SurveyRegistry, SurveyResult,
    SurveySchedule, SurveySettings,
};

const APP_NAME: &str = "survey";
const GROUP_NAME: &str = "test_survey";
const MAP_AREA: &str = "test_community";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("SURVEY_LOG_DIR") {
        let level = survey_core::default_log_level();
        if let Err(err) = survey_core::init_logging(level.as_str(), log_dir.as_str()) {
            eprintln!("survey_cli logging disabled: {err}");
        }
    }

    let settings_path = std::env::args().nth(1);
    match run(settings_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("survey_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings_path: Option<&str>) -> Result<(), Box<dyn Error>> {
    println!("Loading {APP_NAME} (survey_core {}) ...", survey_core::core_version());

    let registry = demo_registry(Utc::now())?;
    let mut config = AppConfig::new(APP_NAME, default_current_surveys()?);
    if let Some(path) = settings_path {
        config = config.with_settings(SurveySettings::from_json_file(path)?);
    }

    for row in schedule_listing(&registry) {
        println!(
            " * schedule {} [{}] {} .. {}",
            row.slug,
            row.chronological_order,
            row.start.format("%Y-%m-%d %H:%M"),
            row.end.format("%Y-%m-%d %H:%M")
        );
    }

    let current = config.ready(&registry)?;
    println!(" * current surveys are:");
    for current_survey in &current {
        println!("   - {current_survey}");
    }
    println!(" Done loading {APP_NAME}.");
    Ok(())
}

fn default_current_surveys() -> SurveyResult<CurrentSurveys> {
    Ok(CurrentSurveys::parse([
        ("test_survey.year-1.baseline.test_community", 0),
        ("test_survey.year-2.annual-1.test_community", 1),
        ("test_survey.year-3.annual-2.test_community", 2),
    ])?)
}

/// Three consecutive yearly schedules, one survey each.
fn demo_registry(now: DateTime<Utc>) -> Result<SurveyRegistry, Box<dyn Error>> {
    let mut registry = SurveyRegistry::new();
    for (schedule_name, survey_name, position, years_back) in [
        ("year-1", "baseline", 0, 3),
        ("year-2", "annual-1", 1, 2),
        ("year-3", "annual-2", 2, 1),
    ] {
        let start = years_ago(now, years_back)?;
        let end = years_ago(now, years_back - 1)?;
        let mut schedule = SurveySchedule::new(schedule_name, GROUP_NAME, start, end)?;
        let survey = Survey::new(
            MAP_AREA,
            schedule.start(),
            schedule.end(),
            schedule.end() - TimeDelta::weeks(1),
        )?
        .with_name(survey_name)
        .with_position(position);
        schedule.add_surveys([survey])?;
        registry.register(schedule)?;
    }
    Ok(registry)
}

fn years_ago(now: DateTime<Utc>, years: u32) -> Result<DateTime<Utc>, String> {
    now.checked_sub_months(Months::new(12 * years))
        .ok_or_else(|| format!("{years} years before {} is out of range", now.to_rfc3339()))
}

#[cfg(test)]
mod tests {
    use super::{demo_registry, years_ago};
    use chrono::{DateTime, Utc};

    #[test]
    fn years_ago_reports_out_of_range_dates() {
        assert!(years_ago(DateTime::<Utc>::MIN_UTC, 1).is_err());
        let now = Utc::now();
        assert!(years_ago(now, 1).expect("recent date in range") < now);
    }

    #[test]
    fn demo_registry_fails_instead_of_collapsing_dates() {
        assert!(demo_registry(DateTime::<Utc>::MIN_UTC).is_err());
        let registry = demo_registry(Utc::now()).expect("demo registry builds");
        assert_eq!(registry.len(), 3);
    }
}
