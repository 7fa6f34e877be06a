mod test_report_basic;

use crate::geom::{BilinearCage, ControlCage, Point3};

pub(super) fn unit_cube() -> BilinearCage {
    BilinearCage::from_cage(ControlCage::unit_cube()).expect("unit cube cage")
}

/// Separate near-vertical walls, one face each, whose draft against `+Z`
/// equals the given angle in degrees. Walls sit 10 units apart along X.
pub(super) fn tilted_walls(draft_degrees: &[f64]) -> BilinearCage {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    for (i, angle) in draft_degrees.iter().enumerate() {
        let (sin, cos) = angle.to_radians().sin_cos();
        let origin = Point3::new(10.0 * i as f64, 0.0, 0.0);
        // du = +Y, dv = (-sin, 0, cos) so du × dv = (cos, 0, sin).
        let du = crate::geom::Vec3::Y;
        let dv = crate::geom::Vec3::new(-sin, 0.0, cos);
        let base = vertices.len();
        vertices.push(origin);
        vertices.push(origin + du);
        vertices.push(origin + du + dv);
        vertices.push(origin + dv);
        faces.push(vec![base, base + 1, base + 2, base + 3]);
    }
    let cage = ControlCage::new(vertices, faces).expect("wall cage");
    BilinearCage::from_cage(cage).expect("wall evaluator")
}
