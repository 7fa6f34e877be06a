use crate::error::AnalysisError;
use crate::geom::{BilinearCage, ControlCage, Point3, SurfaceEvaluator, Vec3};

const EPS: f64 = 1e-12;

fn assert_vec_close(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < EPS,
        "expected {expected:?}, got {actual:?}"
    );
}

fn unit_cube() -> BilinearCage {
    BilinearCage::from_cage(ControlCage::unit_cube()).expect("unit cube cage")
}

#[test]
fn unit_cube_faces_have_outward_normals() {
    let cube = unit_cube();
    let expected = [
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
    ];

    assert_eq!(cube.face_count(), 6);
    for (face, normal) in expected.into_iter().enumerate() {
        let (_, n) = cube.evaluate_limit(face, 0.5, 0.5).expect("evaluate");
        assert_vec_close(n, normal);
    }
}

#[test]
fn unit_cube_face_centers_lie_on_the_faces() {
    let cube = unit_cube();
    let (top, _) = cube.evaluate_limit(1, 0.5, 0.5).expect("evaluate");
    let (right, _) = cube.evaluate_limit(3, 0.5, 0.5).expect("evaluate");
    assert!(top.distance_to(Point3::new(0.5, 0.5, 1.0)) < EPS);
    assert!(right.distance_to(Point3::new(1.0, 0.5, 0.5)) < EPS);
}

#[test]
fn uninitialized_cage_reports_invalid_state() {
    let cage = BilinearCage::new();
    assert!(!cage.is_initialized());
    assert_eq!(cage.face_count(), 0);
    assert_eq!(
        cage.evaluate_limit(0, 0.5, 0.5),
        Err(AnalysisError::InvalidState)
    );
    assert!(matches!(cage.tessellate(1), Err(AnalysisError::InvalidState)));
}

#[test]
fn out_of_range_queries_are_rejected() {
    let cube = unit_cube();
    assert!(matches!(
        cube.evaluate_limit(0, 1.5, 0.5),
        Err(AnalysisError::InvalidArgument(_))
    ));
    assert!(matches!(
        cube.evaluate_limit(0, 0.5, -0.1),
        Err(AnalysisError::InvalidArgument(_))
    ));
    assert!(matches!(
        cube.evaluate_limit_with_second_derivatives(6, 0.5, 0.5),
        Err(AnalysisError::InvalidArgument(_))
    ));
}

#[test]
fn control_cage_rejects_bad_faces() {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
    ];
    assert!(ControlCage::new(vertices.clone(), vec![vec![0, 1]]).is_err());
    assert!(ControlCage::new(vertices.clone(), vec![vec![0, 1, 3]]).is_err());
    assert!(ControlCage::new(vertices, vec![vec![0, 1, 2]]).is_ok());
    assert!(BilinearCage::from_cage(ControlCage::default()).is_err());
}

#[test]
fn flat_quad_has_exact_derivatives() {
    let cage = ControlCage::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 3.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        ],
        vec![vec![0, 1, 2, 3]],
    )
    .expect("cage");
    let quad = BilinearCage::from_cage(cage).expect("evaluator");

    let d = quad
        .evaluate_limit_with_second_derivatives(0, 0.25, 0.75)
        .expect("derivatives");
    assert!(d.position.distance_to(Point3::new(0.5, 2.25, 0.0)) < EPS);
    assert_vec_close(d.du, Vec3::new(2.0, 0.0, 0.0));
    assert_vec_close(d.dv, Vec3::new(0.0, 3.0, 0.0));
    assert_vec_close(d.duu, Vec3::ZERO);
    assert_vec_close(d.dvv, Vec3::ZERO);
    assert_vec_close(d.duv, Vec3::ZERO);
}

#[test]
fn twisted_quad_has_constant_twist_vector() {
    let cage = ControlCage::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![vec![0, 1, 2, 3]],
    )
    .expect("cage");
    let quad = BilinearCage::from_cage(cage).expect("evaluator");

    for (u, v) in [(0.1, 0.2), (0.5, 0.5), (0.9, 0.3)] {
        let d = quad
            .evaluate_limit_with_second_derivatives(0, u, v)
            .expect("derivatives");
        assert_vec_close(d.duv, Vec3::new(0.0, 0.0, 1.0));
    }
}

#[test]
fn triangle_face_normal_survives_collapsed_corner() {
    let cage = ControlCage::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![vec![0, 1, 2]],
    )
    .expect("cage");
    let tri = BilinearCage::from_cage(cage).expect("evaluator");

    let (p, n) = tri.evaluate_limit(0, 1.0, 1.0).expect("evaluate");
    assert!(p.distance_to(Point3::new(0.0, 1.0, 0.0)) < EPS);
    assert_vec_close(n, Vec3::Z);

    let (_, n) = tri.evaluate_limit(0, 0.5, 0.5).expect("evaluate");
    assert_vec_close(n, Vec3::Z);
}

#[test]
fn tessellation_tags_every_triangle_with_its_face() {
    let cube = unit_cube();
    let mesh = cube.tessellate(2).expect("tessellate");

    assert_eq!(mesh.triangle_count(), 6 * 4 * 4 * 2);
    assert_eq!(mesh.vertex_count(), 6 * 5 * 5);
    assert_eq!(mesh.face_parents.len(), mesh.triangle_count());
    for face in 0..6 {
        let count = mesh.face_parents.iter().filter(|&&p| p == face).count();
        assert_eq!(count, 32);
    }

    // Triangles of the top face are wound like the surface normal.
    for (parent, [a, b, c]) in mesh.triangles() {
        if parent == 1 {
            let n = (b - a).cross(c - a);
            assert!(n.z > 0.0);
        }
    }
}

#[test]
fn tessellation_level_is_bounded() {
    let cube = unit_cube();
    assert!(cube.tessellate(0).is_ok());
    assert!(matches!(
        cube.tessellate(11),
        Err(AnalysisError::InvalidArgument(_))
    ));
}
