use chrono::{DateTime, Months, Utc};
use survey_core::{RegistryError, SurveyRegistry, SurveySchedule};

fn years_ago(now: DateTime<Utc>, years: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(12 * years))
        .expect("date in range")
}

#[test]
fn schedule_name_is_unique() {
    let now = Utc::now();
    let mut registry = SurveyRegistry::new();
    for n in 1..4 {
        let schedule = SurveySchedule::new(
            "survey-10",
            "ESS",
            years_ago(now, 5 + n),
            years_ago(now, 4 + n),
        )
        .expect("valid schedule");
        if n == 1 {
            registry.register(schedule).expect("first registration");
        } else {
            let err = registry
                .register(schedule)
                .expect_err("repeated name must fail");
            assert!(matches!(err, RegistryError::AlreadyRegistered { .. }));
        }
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn schedule_dates_are_unique() {
    let now = Utc::now();
    let mut registry = SurveyRegistry::new();
    let schedule = SurveySchedule::new("survey-10", "ESS", years_ago(now, 5), years_ago(now, 4))
        .expect("valid schedule");
    let same_window =
        SurveySchedule::new("survey-11", "ESS", years_ago(now, 5), years_ago(now, 4))
            .expect("valid schedule");

    registry.register(schedule.clone()).expect("first registration");
    let err = registry
        .register(schedule)
        .expect_err("same schedule twice must fail");
    assert!(matches!(err, RegistryError::AlreadyRegistered { .. }));
    let err = registry
        .register(same_window)
        .expect_err("same window must fail");
    assert!(matches!(err, RegistryError::AlreadyRegistered { .. }));

    let distinct = SurveySchedule::new("survey-12", "ESS", years_ago(now, 4), years_ago(now, 3))
        .expect("valid schedule");
    registry
        .register(distinct)
        .expect("distinct schedule registers");
    assert_eq!(registry.len(), 2);
}

#[test]
fn get_survey_schedules_by_group_name_is_sorted_by_start() {
    let now = Utc::now();
    let mut registry = SurveyRegistry::new();
    let mut expected = Vec::new();
    for n in 1..4 {
        let schedule = SurveySchedule::new(
            format!("survey-1{n}"),
            "ESS",
            years_ago(now, 5 + n),
            years_ago(now, 4 + n),
        )
        .expect("valid schedule");
        expected.push(schedule.clone());
        registry.register(schedule).expect("registration");
    }
    expected.sort_by_key(SurveySchedule::start);

    assert_eq!(expected.len(), 3);
    assert_eq!(registry.get_survey_schedules("ESS"), expected.as_slice());
    assert_eq!(registry.get_survey_schedule_group_names(), vec!["ESS"]);
    assert_eq!(
        registry.labels(),
        vec!["ESS.survey-13", "ESS.survey-12", "ESS.survey-11"]
    );
}

#[test]
fn clear_registry_resets_state() {
    let now = Utc::now();
    let mut registry = SurveyRegistry::new();
    registry
        .register(
            SurveySchedule::new("year-1", "ESS", years_ago(now, 2), years_ago(now, 1))
                .expect("valid schedule"),
        )
        .unwrap();

    registry.clear_registry();
    assert!(registry.is_empty());
    assert!(registry.get_survey_schedules("ESS").is_empty());
    assert!(!registry.contains_labels(&["ESS.year-1"]));
}
