use mold_engine::analysis::{ConstraintLevel, UndercutOptions};
use mold_engine::geom::{BilinearCage, ControlCage, PatchEvaluator, Point3, Vec3};
use mold_engine::{
    AnalysisError, ConstraintValidator, CurvatureAnalyzer, DraftChecker, SurfaceEvaluator,
    UndercutDetector,
};

fn cube() -> BilinearCage {
    BilinearCage::from_cage(ControlCage::unit_cube()).expect("cube")
}

#[test]
fn cube_region_pulled_upwards() {
    let cube = cube();
    let report = ConstraintValidator::new(&cube)
        .validate_region(&[0, 1, 2, 3, 4, 5], Vec3::Z, 1.5)
        .expect("validate");

    // Only the bottom is an undercut. It is also negatively drafted, and the
    // four sides sit at zero draft, below the minimum.
    assert_eq!(report.error_count(), 6);
    assert!(!report.has_warnings());

    let undercuts: Vec<_> = report
        .violations()
        .iter()
        .filter(|v| v.description.starts_with("Undercut"))
        .map(|v| v.face_id)
        .collect();
    assert_eq!(undercuts, vec![0]);
    assert_eq!(report.violations()[0].face_id, 0);
    assert!(report.violations()[0].description.starts_with("Undercut"));

    assert_eq!(report.violations_for_face(1).count(), 0);
    for side in 2..6 {
        let found: Vec<_> = report.violations_for_face(side).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].level, ConstraintLevel::Error);
        assert!(found[0].description.starts_with("Draft angle below minimum"));
        assert!((found[0].severity - 1.0).abs() < 1e-9);
    }
}

#[test]
fn sphere_splits_at_the_equator() {
    let sphere = PatchEvaluator::sphere(Point3::ORIGIN, 2.0, 4, 4).expect("sphere");
    assert_eq!(sphere.face_count(), 16);

    let faces: Vec<usize> = (0..16).collect();
    let undercuts = UndercutDetector::new(&sphere)
        .detect_undercuts(&faces, Vec3::Z)
        .expect("undercuts");
    assert!(undercuts.keys().all(|&face| face < 8));

    let drafts = DraftChecker::new(&sphere)
        .compute_draft_angles(&faces, Vec3::Z)
        .expect("drafts");
    for (&face, &angle) in &drafts {
        if face < 8 {
            assert!(angle < 0.0, "face {face} draft {angle}");
        } else {
            assert!(angle > 0.0, "face {face} draft {angle}");
        }
    }
}

#[test]
fn sphere_curvature_is_uniform() {
    let sphere = PatchEvaluator::sphere(Point3::new(1.0, -2.0, 0.5), 2.0, 4, 4).expect("sphere");
    let analyzer = CurvatureAnalyzer::new();
    let results = analyzer
        .batch_compute_curvature(&sphere, &[5, 6, 9, 10], &[0.5, 0.25, 0.75, 0.5], &[0.5, 0.5, 0.25, 0.75])
        .expect("curvature");
    for result in results {
        assert!((result.gaussian_curvature - 0.25).abs() < 1e-2);
        assert!((result.abs_mean_curvature - 0.5).abs() < 1e-2);
    }
}

#[test]
fn works_through_a_trait_object() {
    let cube = cube();
    let surface: &dyn SurfaceEvaluator = &cube;
    let report = ConstraintValidator::new(surface)
        .with_undercut_options(UndercutOptions {
            samples_per_axis: 2,
            tessellation_level: 1,
            ..UndercutOptions::default()
        })
        .validate_region(&[0], Vec3::Z, 1.0)
        .expect("validate");
    assert_eq!(report.error_count(), 2);
}

#[test]
fn uninitialized_surface_is_rejected_everywhere() {
    let empty = BilinearCage::new();
    assert_eq!(
        CurvatureAnalyzer::new().compute_curvature(&empty, 0, 0.5, 0.5),
        Err(AnalysisError::InvalidState)
    );
    assert_eq!(
        DraftChecker::new(&empty).check_face_draft(0, Vec3::Z),
        Err(AnalysisError::InvalidState)
    );
    assert_eq!(
        UndercutDetector::new(&empty).check_face_undercut(0, Vec3::Z),
        Err(AnalysisError::InvalidState)
    );
}

#[test]
fn report_serializes_to_json() {
    let cube = cube();
    let report = ConstraintValidator::new(&cube)
        .validate_region(&[0], Vec3::Z, 1.0)
        .expect("validate");
    let json = serde_json::to_value(&report).expect("serialize report");

    let violations = json["violations"].as_array().expect("violations array");
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0]["level"], "ERROR");
    assert_eq!(violations[0]["face_id"], 0);
    assert_eq!(
        violations[0]["suggestion"],
        "This region requires revision to eliminate physical impossibility"
    );
}

#[test]
fn curvature_result_serializes_form_coefficients() {
    let cube = cube();
    let result = CurvatureAnalyzer::new()
        .compute_curvature(&cube, 1, 0.5, 0.5)
        .expect("curvature");
    let json = serde_json::to_value(result).expect("serialize curvature");

    assert_eq!(json["E"], 1.0);
    assert_eq!(json["G"], 1.0);
    assert_eq!(json["L"], 0.0);
    assert_eq!(json["normal"]["z"], 1.0);
    assert_eq!(json["kappa1"], 0.0);
}
