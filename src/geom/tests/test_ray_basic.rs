use crate::geom::{
    BilinearCage, ControlCage, Point3, ProxyMesh, SurfaceEvaluator, Vec3,
    ray_triangle_intersection,
};

fn unit_triangle() -> [Point3; 3] {
    [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]
}

#[test]
fn ray_hits_triangle_in_front() {
    let hit = ray_triangle_intersection(Point3::new(0.25, 0.25, -2.0), Vec3::Z, unit_triangle())
        .expect("hit");
    assert!((hit.t - 2.0).abs() < 1e-12);
    assert!((hit.u - 0.25).abs() < 1e-12);
    assert!((hit.v - 0.25).abs() < 1e-12);
}

#[test]
fn ray_ignores_triangle_behind_origin() {
    let hit = ray_triangle_intersection(Point3::new(0.25, 0.25, 1.0), Vec3::Z, unit_triangle());
    assert!(hit.is_none());
}

#[test]
fn ray_outside_barycentric_range_misses() {
    let hit = ray_triangle_intersection(Point3::new(0.75, 0.75, -1.0), Vec3::Z, unit_triangle());
    assert!(hit.is_none());
}

#[test]
fn parallel_ray_is_rejected() {
    let hit = ray_triangle_intersection(Point3::new(-1.0, 0.25, 0.0), Vec3::X, unit_triangle());
    assert!(hit.is_none());
}

#[test]
fn grazing_hit_on_vertex_counts() {
    let hit = ray_triangle_intersection(Point3::new(0.0, 0.0, -1.0), Vec3::Z, unit_triangle());
    assert!(hit.is_some());
}

#[test]
fn hits_closer_than_cutoff_are_ignored() {
    let hit = ray_triangle_intersection(Point3::new(0.25, 0.25, -1e-8), Vec3::Z, unit_triangle());
    assert!(hit.is_none());
}

fn cube_proxy() -> ProxyMesh {
    let cube = BilinearCage::from_cage(ControlCage::unit_cube()).expect("cube");
    ProxyMesh::from_tessellation(&cube.tessellate(3).expect("tessellate"))
}

#[test]
fn proxy_mesh_finds_opposite_face() {
    let mesh = cube_proxy();
    assert_eq!(mesh.triangle_count(), 6 * 64 * 2);

    let origin = Point3::new(0.3, 0.6, 0.001);
    let hit = mesh.nearest_hit_excluding(origin, Vec3::Z, 0).expect("top face hit");
    assert!((hit.t - 0.999).abs() < 1e-9);

    assert!(mesh.hits_face(origin, Vec3::Z, 1));
    assert!(!mesh.hits_face(origin, Vec3::Z, 2));
}

#[test]
fn proxy_mesh_misses_when_leaving_the_cube() {
    let mesh = cube_proxy();
    let origin = Point3::new(0.3, 0.6, 1.001);
    assert!(mesh.nearest_hit_excluding(origin, Vec3::Z, 1).is_none());
}

#[test]
fn nearest_hit_picks_the_closest_triangle() {
    let mesh = cube_proxy();
    // From outside below the cube, the bottom face is hit before the top.
    let origin = Point3::new(0.3, 0.6, -1.0);
    let hit = mesh.nearest_hit(origin, Vec3::Z, |_| true).expect("hit");
    assert!((hit.t - 1.0).abs() < 1e-9);
    let hit = mesh.nearest_hit_excluding(origin, Vec3::Z, 0).expect("hit");
    assert!((hit.t - 2.0).abs() < 1e-9);
}
