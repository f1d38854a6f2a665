use std::fs;

use mtsurvey_core::scaffold::{create_survey_tree, SurveyLayout};

#[test]
fn classic_layout_creates_thirteen_subdirectories() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("survey1");

    let report = create_survey_tree(&root, SurveyLayout::Classic).expect("scaffold");

    assert_eq!(report.created.len(), 13);
    assert!(report.existing.is_empty());
    assert!(report.is_clean());
    assert!(root.is_dir());
    for name in SurveyLayout::Classic.subdirs() {
        assert!(root.join(name).is_dir(), "missing {name}");
    }

    let entries = fs::read_dir(&root).expect("read root").count();
    assert_eq!(entries, 13);
}

#[test]
fn rerun_is_idempotent() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("survey1");

    create_survey_tree(&root, SurveyLayout::Classic).expect("first run");
    let second = create_survey_tree(&root, SurveyLayout::Classic).expect("second run");

    assert!(second.created.is_empty());
    assert_eq!(second.existing.len(), 13);
    assert!(second.is_clean());
}

#[test]
fn extended_layout_trades_meta_for_reports() {
    let classic = SurveyLayout::Classic.subdirs();
    let extended = SurveyLayout::Extended.subdirs();

    assert_eq!(classic.len(), 13);
    assert_eq!(extended.len(), 13);
    assert!(classic.contains(&"meta"));
    assert!(!extended.contains(&"meta"));
    assert!(extended.contains(&"reports"));

    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("survey2");
    let report = create_survey_tree(&root, SurveyLayout::Extended).expect("scaffold");
    assert!(report.is_clean());
    assert!(root.join("reports").is_dir());
}

#[test]
fn one_failed_subdirectory_does_not_abort_the_rest() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("survey1");
    fs::create_dir(&root).expect("root");
    // A file squatting on a directory name makes that one creation fail.
    fs::write(root.join("db"), b"not a directory").expect("squatter");

    let report = create_survey_tree(&root, SurveyLayout::Classic).expect("scaffold");

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, root.join("db"));
    assert_eq!(report.created.len(), 12);
    assert!(root.join("tmp").is_dir());
    assert!(root.join("stations").is_dir());
}

#[test]
fn missing_root_is_created_recursively() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("field/2026/survey1");

    let report = create_survey_tree(&root, SurveyLayout::Classic).expect("scaffold");

    assert!(report.is_clean());
    assert!(root.join("config").is_dir());
}

#[test]
fn root_squatted_by_a_file_is_fatal() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("survey1");
    fs::write(&root, b"not a directory").expect("squatter");

    assert!(create_survey_tree(&root, SurveyLayout::Classic).is_err());
}

#[test]
fn layout_names_parse_case_insensitively() {
    assert_eq!(
        SurveyLayout::try_from("classic").expect("classic"),
        SurveyLayout::Classic
    );
    assert_eq!(
        SurveyLayout::try_from("B").expect("b"),
        SurveyLayout::Extended
    );
    assert_eq!(
        SurveyLayout::try_from(" Extended ").expect("extended"),
        SurveyLayout::Extended
    );
    assert!(SurveyLayout::try_from("modern").is_err());
}
