use chrono::NaiveDate;
use health_report::report::SectionKind;
use health_report::{
    build_report, check_bundle, generate_report, ConfigOverrides, HealthLogBundle, ReportConfig,
};

const BUNDLE: &str = r#"{
  "patient": { "name": "Jane Doe", "dob": "1950-04-12" },
  "temperature": {
    "unit": "celsius",
    "logs": [
      { "value": 36.6, "measured_at": "2026-03-03T23:59:59Z" },
      { "value": 36.8, "measured_at": "2026-03-04T00:00:00Z" },
      { "value": 37.9, "measured_at": "2026-03-09T20:00:00Z" }
    ]
  },
  "heart_rate": {
    "logs": [
      { "bpm": 72, "measured_at": "2026-03-05T08:00:00Z" },
      { "bpm": 101, "measured_at": "2026-03-06T08:00:00Z" }
    ]
  },
  "blood_pressure": {
    "logs": [
      { "systolic": 118, "diastolic": 76, "pulse": 70, "measured_at": "2026-03-08T07:30:00Z" },
      { "systolic": 142, "diastolic": 91, "measured_at": "2026-03-09T07:30:00Z" }
    ]
  },
  "blood_glucose": {
    "logs": [
      { "value": 95, "context": "fasting", "measured_at": "2026-03-08T06:00:00Z" },
      { "value": 182, "context": "after_meal", "measured_at": "2026-03-08T13:00:00Z" }
    ]
  },
  "nutrition": {
    "logs": [
      { "calories": 650, "protein": 30, "carbs": 80, "fat": 20, "meal": "lunch",
        "created_at": "2026-03-09T12:30:00Z" },
      { "calories": 1300, "protein": 50, "carbs": 150, "fat": 45,
        "created_at": "2026-03-09T19:00:00Z" }
    ]
  },
  "hydration": {
    "daily_goal_ml": 2000,
    "logs": [
      { "amount_ml": 1500, "created_at": "2026-03-09T09:00:00Z" },
      { "amount_ml": 900, "created_at": "2026-03-09T15:00:00Z" },
      { "amount_ml": 2000, "created_at": "2026-03-10T10:00:00Z" }
    ]
  },
  "notes": ["Started new blood pressure medication on 03/07.", "   "]
}"#;

fn config() -> ReportConfig {
    ReportConfig::resolve(ConfigOverrides {
        days: Some(7),
        timezone: Some("+00:00".to_string()),
        today: Some("2026-03-10".to_string()),
        charts_dir: None,
    })
    .unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

#[test]
fn test_filter_keeps_records_from_first_day_midnight() {
    let bundle = HealthLogBundle::from_json_str(BUNDLE).unwrap();
    let timeframe = config().timeframe().unwrap();

    let check = check_bundle(&bundle, &timeframe);
    let temperature = check.sections.iter().find(|s| s.section == "temperature").unwrap();
    assert_eq!(temperature.records_total, 3);
    assert_eq!(temperature.records_in_window, 2);
    assert_eq!(check.date_range, "2026-03-04 to 2026-03-10");
}

#[test]
fn test_sections_follow_input() {
    let bundle = HealthLogBundle::from_json_str(BUNDLE).unwrap();
    let timeframe = config().timeframe().unwrap();
    let report = build_report(&bundle, &timeframe, today());

    let kinds: Vec<SectionKind> = report.sections.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::Temperature,
            SectionKind::HeartRate,
            SectionKind::BloodPressure,
            SectionKind::BloodGlucose,
            SectionKind::Nutrition,
            SectionKind::Hydration,
        ]
    );
    assert_eq!(report.notes.len(), 1);
    assert_eq!(report.record_count(), 13);
}

#[test]
fn test_omitting_optional_input_leaves_other_sections_unchanged() {
    let full = HealthLogBundle::from_json_str(BUNDLE).unwrap();
    let timeframe = config().timeframe().unwrap();
    let full_report = build_report(&full, &timeframe, today());

    let mut without_glucose = full.clone();
    without_glucose.blood_glucose = None;
    let partial_report = build_report(&without_glucose, &timeframe, today());

    assert!(partial_report.section(SectionKind::BloodGlucose).is_none());
    assert_eq!(partial_report.sections.len(), full_report.sections.len() - 1);
    for section in &partial_report.sections {
        assert_eq!(Some(section), full_report.section(section.kind));
    }

    let mut without_hydration = full.clone();
    without_hydration.hydration = None;
    let partial_report = build_report(&without_hydration, &timeframe, today());
    for section in &partial_report.sections {
        assert_eq!(Some(section), full_report.section(section.kind));
    }
}

#[test]
fn test_minimal_bundle_still_reports_core_sections() {
    let bundle =
        HealthLogBundle::from_json_str(r#"{ "patient": { "name": "John Roe", "dob": "" } }"#)
            .unwrap();
    let timeframe = config().timeframe().unwrap();
    let report = build_report(&bundle, &timeframe, today());

    assert_eq!(report.sections.len(), 2);
    assert!(report.sections.iter().all(|s| s.record_count == 0 && s.charts.is_empty()));
}

#[test]
fn test_invalid_input_rejected() {
    let negative = BUNDLE.replace("\"amount_ml\": 900", "\"amount_ml\": -900");
    assert!(HealthLogBundle::from_json_str(&negative).is_err());
    assert!(HealthLogBundle::from_json_str("{ not json").is_err());
}

#[test]
fn test_generate_writes_pdf() {
    let bundle = HealthLogBundle::from_json_str(BUNDLE).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("reports").join("jane.pdf");

    let response = generate_report(&bundle, &config(), &output).unwrap();

    assert!(response.success);
    assert!(response.pages >= 1);
    assert_eq!(response.total_records, 13);
    assert_eq!(response.sections.len(), 6);
    assert_eq!(response.charts_failed, 0);
    assert_eq!(response.build.name, "health-report");

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_calories_only_nutrition_renders_without_chart_errors() {
    let bundle = HealthLogBundle::from_json_str(
        r#"{
            "patient": { "name": "Jane Doe", "dob": "1950-04-12" },
            "nutrition": { "logs": [ { "calories": 2000, "created_at": "2026-03-09T12:00:00Z" } ] },
            "hydration": { "daily_goal_ml": 2000, "logs": [
                { "amount_ml": 800, "created_at": "2026-03-09T08:00:00Z" },
                { "amount_ml": 500, "created_at": "2026-03-11T08:00:00Z" }
            ] }
        }"#,
    )
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("calories.pdf");

    let response = generate_report(&bundle, &config(), &output).unwrap();

    assert_eq!(response.charts_failed, 0);
    assert_eq!(response.total_records, 2);
}
