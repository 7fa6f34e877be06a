//! Read-only query interface to a limit surface.
//!
//! The analysis passes never construct or refine a surface themselves. They
//! borrow anything implementing [`SurfaceEvaluator`] and ask it for limit
//! points, derivatives and a triangulated proxy mesh. Two reference
//! implementations live next to this module: [`BilinearCage`](super::BilinearCage)
//! and [`PatchEvaluator`](super::PatchEvaluator).

use super::core::{Point3, Vec3};
use crate::error::{AnalysisError, AnalysisResult};

/// Index of a control face of the cage.
pub type FaceId = usize;

/// Highest tessellation level accepted by the reference evaluators.
pub const MAX_TESSELLATION_LEVEL: u32 = 10;

/// Position plus first and second partial derivatives at `(face, u, v)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitDerivatives {
    pub position: Point3,
    pub du: Vec3,
    pub dv: Vec3,
    pub duu: Vec3,
    pub dvv: Vec3,
    pub duv: Vec3,
}

/// Triangulated proxy of the whole surface.
///
/// Every triangle records the control face it was generated from, so ray
/// queries can exclude the face under test.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tessellation {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub face_parents: Vec<FaceId>,
}

impl Tessellation {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of triangle `index`, or `None` if it is out of range
    /// or references a missing vertex.
    #[must_use]
    pub fn triangle(&self, index: usize) -> Option<[Point3; 3]> {
        let tri = self.indices.get(index * 3..index * 3 + 3)?;
        let corner = |i: u32| self.positions.get(i as usize).copied().map(Point3::from);
        Some([corner(tri[0])?, corner(tri[1])?, corner(tri[2])?])
    }

    /// Iterate `(parent_face, corners)` for all well-formed triangles.
    pub fn triangles(&self) -> impl Iterator<Item = (FaceId, [Point3; 3])> + '_ {
        (0..self.triangle_count()).filter_map(move |idx| {
            let parent = *self.face_parents.get(idx)?;
            Some((parent, self.triangle(idx)?))
        })
    }

    /// Append a `segments × segments` grid over `[0,1]²` for one face.
    ///
    /// Each grid cell `(a, b, c, d)` (counter-clockwise in parameter space)
    /// becomes triangles `(a, b, c)` and `(a, c, d)`, so triangle winding
    /// agrees with `du × dv`.
    pub fn push_face_grid<F>(&mut self, face: FaceId, segments: usize, mut point_at: F)
    where
        F: FnMut(f64, f64) -> Point3,
    {
        let segments = segments.max(1);
        let stride = segments + 1;
        let base = self.positions.len() as u32;

        for j in 0..=segments {
            let v = j as f64 / segments as f64;
            for i in 0..=segments {
                let u = i as f64 / segments as f64;
                self.positions.push(point_at(u, v).to_array());
            }
        }

        for j in 0..segments {
            for i in 0..segments {
                let a = base + (j * stride + i) as u32;
                let b = a + 1;
                let d = a + stride as u32;
                let c = d + 1;
                self.indices.extend_from_slice(&[a, b, c, a, c, d]);
                self.face_parents.extend_from_slice(&[face, face]);
            }
        }
    }
}

/// Query capability over an externally owned limit surface.
///
/// Implementations must be safe to read concurrently; the analysis passes
/// only ever take `&self`.
pub trait SurfaceEvaluator: Sync {
    /// Whether a cage/patch layout has been loaded.
    fn is_initialized(&self) -> bool;

    /// Number of control faces.
    fn face_count(&self) -> usize;

    /// Limit point and unit normal at `(face, u, v)`.
    fn evaluate_limit(&self, face: FaceId, u: f64, v: f64) -> AnalysisResult<(Point3, Vec3)>;

    /// Limit point with first and second partial derivatives at `(face, u, v)`.
    fn evaluate_limit_with_second_derivatives(
        &self,
        face: FaceId,
        u: f64,
        v: f64,
    ) -> AnalysisResult<LimitDerivatives>;

    /// Triangulated proxy of the whole surface at a refinement level.
    fn tessellate(&self, level: u32) -> AnalysisResult<Tessellation>;
}

pub(crate) fn check_uv(u: f64, v: f64) -> AnalysisResult<()> {
    if (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(AnalysisError::invalid_argument(format!(
            "parametric coordinates must lie in [0, 1], got ({u}, {v})"
        )))
    }
}

pub(crate) fn check_face(face: FaceId, face_count: usize) -> AnalysisResult<()> {
    if face < face_count {
        Ok(())
    } else {
        Err(AnalysisError::invalid_argument(format!(
            "face {face} out of range (surface has {face_count} faces)"
        )))
    }
}

pub(crate) fn grid_segments(level: u32) -> AnalysisResult<usize> {
    if level > MAX_TESSELLATION_LEVEL {
        return Err(AnalysisError::invalid_argument(format!(
            "tessellation level {level} exceeds {MAX_TESSELLATION_LEVEL}"
        )));
    }
    Ok(1usize << level)
}
