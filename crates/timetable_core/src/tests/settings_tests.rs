use super::*;
use shared::domain::Cohort;

#[test]
fn explicit_file_overrides_defaults() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join(SETTINGS_FILE);
    fs::write(
        &path,
        r#"
data_location = "https://example.org/timetable/"
graduate_cohorts = ["M1", "M2"]
"#,
    )
    .expect("write settings");

    let settings = load_settings(Some(&path));
    if std::env::var("TIMETABLE_DATA").is_err() && std::env::var("APP__DATA_LOCATION").is_err() {
        assert_eq!(settings.data_location, "https://example.org/timetable/");
    }
    assert_eq!(settings.graduate_cohorts, Some(vec!["M1".into(), "M2".into()]));
    assert_eq!(settings.undergraduate_cohorts, None);
}

#[test]
fn malformed_file_keeps_defaults() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join(SETTINGS_FILE);
    fs::write(&path, "data_location = [").expect("write settings");

    let settings = load_settings(Some(&path));
    assert_eq!(settings.graduate_cohorts, None);
    assert_eq!(settings.undergraduate_cohorts, None);
}

#[test]
fn catalog_replaces_only_configured_lists() {
    let settings = Settings {
        graduate_cohorts: Some(vec!["M1".into(), "M2".into()]),
        ..Settings::default()
    };
    let catalog = settings.catalog();

    assert_eq!(catalog.for_track(Track::Undergraduate).len(), 5);
    assert_eq!(
        catalog.for_track(Track::Graduate),
        &[Cohort::new("M1"), Cohort::new("M2")]
    );
    assert_eq!(Settings::default().catalog(), CohortCatalog::default());
}

#[test]
fn empty_lists_in_file_are_ignored() {
    let mut settings = Settings::default();
    settings.apply_file(FileSettings {
        undergraduate_cohorts: Some(Vec::new()),
        log_filter: Some("debug".into()),
        ..FileSettings::default()
    });
    assert_eq!(settings.undergraduate_cohorts, None);
    assert_eq!(settings.log_filter, "debug");
}
