use crate::analysis::{ConstraintLevel, ConstraintReport};

#[test]
fn new_report_is_empty() {
    let report = ConstraintReport::new();
    assert!(report.is_empty());
    assert!(!report.has_errors());
    assert!(!report.has_warnings());
    assert_eq!(report.error_count(), 0);
    assert_eq!(report.max_severity(), 0.0);
}

#[test]
fn violations_keep_insertion_order_and_canned_suggestions() {
    let mut report = ConstraintReport::new();
    report.add_warning("shallow draft", 4, 0.25);
    report.add_error("undercut", 2, 0.75);
    report.add_feature("sharp crease", 7);

    let levels: Vec<_> = report.violations().iter().map(|v| v.level).collect();
    assert_eq!(
        levels,
        vec![ConstraintLevel::Warning, ConstraintLevel::Error, ConstraintLevel::Feature]
    );

    let v = &report.violations()[0];
    assert_eq!(v.description, "shallow draft");
    assert_eq!(v.face_id, 4);
    assert_eq!(v.suggestion, "Consider adjusting geometry for better manufacturability");
    assert_eq!(
        report.violations()[1].suggestion,
        "This region requires revision to eliminate physical impossibility"
    );
    assert_eq!(
        report.violations()[2].suggestion,
        "This is an aesthetic feature - mathematical tension"
    );
    assert_eq!(report.violations()[2].severity, 0.0);
}

#[test]
fn counts_scan_by_level() {
    let mut report = ConstraintReport::new();
    report.add_error("a", 0, 1.0);
    report.add_error("b", 1, 0.5);
    report.add_warning("c", 1, 0.1);
    report.add_feature("d", 2);

    assert_eq!(report.len(), 4);
    assert!(report.has_errors());
    assert!(report.has_warnings());
    assert_eq!(report.error_count(), 2);
    assert_eq!(report.warning_count(), 1);
    assert_eq!(report.feature_count(), 1);
    assert_eq!(report.violations_for_face(1).count(), 2);
    assert_eq!(report.violations_for_face(9).count(), 0);
    assert_eq!((&report).into_iter().count(), 4);
}

#[test]
fn severities_are_kept_in_unit_range() {
    let mut report = ConstraintReport::new();
    report.add_error("steep undercut draft", 0, 181.0);
    report.add_warning("negative", 1, -0.5);
    report.add_error("nan", 2, f64::NAN);

    let severities: Vec<f64> = report.violations().iter().map(|v| v.severity).collect();
    assert_eq!(severities, vec![1.0, 0.0, 0.0]);
    assert_eq!(report.max_severity(), 1.0);
}

#[test]
fn warnings_alone_are_not_errors() {
    let mut report = ConstraintReport::new();
    report.add_warning("w", 3, 0.4);
    assert!(!report.has_errors());
    assert!(report.has_warnings());
    assert!((report.max_severity() - 0.4).abs() < f64::EPSILON);
}

#[test]
fn level_names_are_upper_case() {
    assert_eq!(ConstraintLevel::Error.to_string(), "ERROR");
    assert_eq!(ConstraintLevel::Warning.to_string(), "WARNING");
    assert_eq!(ConstraintLevel::Feature.to_string(), "FEATURE");
}
