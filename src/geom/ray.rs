//! Ray casting against the triangulated proxy of a surface.

use super::bvh::Bvh;
use super::core::{BBox, Point3, Tolerance, Vec3};
use super::evaluator::{FaceId, Tessellation};

/// Forward intersection of a ray with a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray parameter; equals the distance when the direction is unit length.
    pub t: f64,
    pub u: f64,
    pub v: f64,
}

/// Möller–Trumbore ray/triangle test.
///
/// Near-parallel rays (`|det| < 1e-6`) are rejected outright, barycentrics
/// must satisfy `u ∈ [0,1]`, `v ≥ 0`, `u + v ≤ 1`, and only hits with
/// `t > 1e-6` count.
#[must_use]
pub fn ray_triangle_intersection(origin: Point3, dir: Vec3, tri: [Point3; 3]) -> Option<RayHit> {
    let eps = Tolerance::RAY.eps;
    let edge1 = tri[1] - tri[0];
    let edge2 = tri[2] - tri[0];
    let h = dir.cross(edge2);
    let det = edge1.dot(h);
    if !det.is_finite() || det.abs() < eps {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - tri[0];
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = inv_det * dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    (t > eps && t.is_finite()).then_some(RayHit { t, u, v })
}

/// Triangles of a [`Tessellation`] with their parent faces, indexed by a BVH.
#[derive(Debug, Clone)]
pub struct ProxyMesh {
    triangles: Vec<[Point3; 3]>,
    parents: Vec<FaceId>,
    bvh: Option<Bvh>,
}

impl ProxyMesh {
    /// Box padding so that rays grazing a triangle edge are never pruned.
    const BOX_PAD: f64 = 1e-7;

    #[must_use]
    pub fn from_tessellation(mesh: &Tessellation) -> Self {
        let (parents, triangles): (Vec<_>, Vec<_>) = mesh.triangles().unzip();
        let bboxes: Vec<BBox> = triangles
            .iter()
            .map(|&[a, b, c]| {
                BBox::new(a, a)
                    .expand_point(b)
                    .expand_point(c)
                    .expand_by(Self::BOX_PAD)
            })
            .collect();
        let bvh = Bvh::build(&bboxes);
        Self {
            triangles,
            parents,
            bvh,
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Nearest forward hit over triangles whose parent face passes `accept`.
    pub fn nearest_hit<F>(&self, origin: Point3, dir: Vec3, accept: F) -> Option<RayHit>
    where
        F: Fn(FaceId) -> bool,
    {
        let bvh = self.bvh.as_ref()?;
        let mut best: Option<RayHit> = None;
        bvh.query_ray(origin, dir, 0.0, f64::INFINITY, |prim| {
            if accept(self.parents[prim]) {
                if let Some(hit) = ray_triangle_intersection(origin, dir, self.triangles[prim]) {
                    if best.is_none_or(|b| hit.t < b.t) {
                        best = Some(hit);
                    }
                }
            }
            true
        });
        best
    }

    /// Nearest hit ignoring the triangles of `face` itself.
    #[must_use]
    pub fn nearest_hit_excluding(&self, origin: Point3, dir: Vec3, face: FaceId) -> Option<RayHit> {
        self.nearest_hit(origin, dir, |parent| parent != face)
    }

    /// Whether the ray hits any triangle of `face`.
    #[must_use]
    pub fn hits_face(&self, origin: Point3, dir: Vec3, face: FaceId) -> bool {
        let Some(bvh) = self.bvh.as_ref() else {
            return false;
        };
        let mut hit = false;
        bvh.query_ray(origin, dir, 0.0, f64::INFINITY, |prim| {
            if self.parents[prim] == face
                && ray_triangle_intersection(origin, dir, self.triangles[prim]).is_some()
            {
                hit = true;
                return false;
            }
            true
        });
        hit
    }
}
