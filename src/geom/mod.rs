//! Geometry primitives and the surface evaluators the analysis passes query.

mod bvh;
mod cage;
mod core;
mod evaluator;
mod patch;
mod ray;
mod surface;

pub use cage::{BilinearCage, ControlCage};
pub use core::{BBox, Point3, Tolerance, Vec3};
pub use evaluator::{
    FaceId, LimitDerivatives, MAX_TESSELLATION_LEVEL, SurfaceEvaluator, Tessellation,
};
pub use patch::{PatchEvaluator, SurfacePatch};
pub use ray::{ProxyMesh, RayHit, ray_triangle_intersection};
pub use surface::{CylinderSurface, PlaneSurface, SphereSurface, Surface};

pub(crate) use evaluator::{check_face, check_uv};
pub(crate) use surface::orthogonal_unit_vector;

#[cfg(test)]
mod tests;
