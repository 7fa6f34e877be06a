//! Control cage evaluated as one bilinear patch per face.
//!
//! This is the reference [`SurfaceEvaluator`] used when no true subdivision
//! limit evaluator is available. Each quad face `[a, b, c, d]` is the patch
//!
//! ```text
//! P(u, v) = (1-u)(1-v)·a + u(1-v)·b + uv·c + (1-u)v·d
//! ```
//!
//! and a triangle `[a, b, c]` is evaluated as the quad `[a, b, c, c]`.
//! Derivatives are exact: `duu = dvv = 0` and `duv` is the constant twist
//! vector `a - b + c - d`. Faces wound counter-clockwise when seen from
//! outside get outward normals.

use super::core::{Point3, Vec3};
use super::evaluator::{
    FaceId, LimitDerivatives, SurfaceEvaluator, Tessellation, check_face, check_uv, grid_segments,
};
use crate::error::{AnalysisError, AnalysisResult};

/// Vertices and polygonal faces of a control cage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlCage {
    pub vertices: Vec<Point3>,
    pub faces: Vec<Vec<usize>>,
}

impl ControlCage {
    /// Build a cage, rejecting faces that are not triangles or quads and
    /// faces that reference missing vertices.
    pub fn new(vertices: Vec<Point3>, faces: Vec<Vec<usize>>) -> AnalysisResult<Self> {
        for (face_id, face) in faces.iter().enumerate() {
            if !(3..=4).contains(&face.len()) {
                return Err(AnalysisError::invalid_argument(format!(
                    "face {face_id} has {} vertices, expected 3 or 4",
                    face.len()
                )));
            }
            if let Some(&bad) = face.iter().find(|&&idx| idx >= vertices.len()) {
                return Err(AnalysisError::invalid_argument(format!(
                    "face {face_id} references vertex {bad} but the cage has {} vertices",
                    vertices.len()
                )));
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Axis-aligned unit cube `[0,1]³` with outward-wound faces in the order
    /// bottom (-Z), top (+Z), front (-Y), right (+X), back (+Y), left (-X).
    #[must_use]
    pub fn unit_cube() -> Self {
        Self::cuboid(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0))
    }

    /// Axis-aligned box between `min` and `max`, faces ordered as in
    /// [`ControlCage::unit_cube`].
    #[must_use]
    pub fn cuboid(min: Point3, max: Point3) -> Self {
        let vertices = vec![
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(max.x, max.y, max.z),
            Point3::new(min.x, max.y, max.z),
        ];
        let faces = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ];
        Self { vertices, faces }
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Patch corners `(p00, p10, p11, p01)` of a face.
    fn corners(&self, face: FaceId) -> [Point3; 4] {
        let idx = &self.faces[face];
        let a = self.vertices[idx[0]];
        let b = self.vertices[idx[1]];
        let c = self.vertices[idx[2]];
        let d = idx.get(3).map_or(c, |&i| self.vertices[i]);
        [a, b, c, d]
    }
}

/// Newell normal of a (possibly non-planar) polygon.
fn newell_normal(corners: &[Point3; 4]) -> Option<Vec3> {
    let mut n = Vec3::ZERO;
    for i in 0..4 {
        let p = corners[i];
        let q = corners[(i + 1) % 4];
        n.x += (p.y - q.y) * (p.z + q.z);
        n.y += (p.z - q.z) * (p.x + q.x);
        n.z += (p.x - q.x) * (p.y + q.y);
    }
    n.normalized()
}

/// Bilinear limit evaluator over a [`ControlCage`].
///
/// Starts uninitialized; queries fail with [`AnalysisError::InvalidState`]
/// until [`BilinearCage::initialize`] has loaded a non-empty cage.
#[derive(Debug, Clone, Default)]
pub struct BilinearCage {
    cage: Option<ControlCage>,
}

impl BilinearCage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluator that is ready to query.
    pub fn from_cage(cage: ControlCage) -> AnalysisResult<Self> {
        let mut evaluator = Self::new();
        evaluator.initialize(cage)?;
        Ok(evaluator)
    }

    /// Load a cage. An empty cage is rejected.
    pub fn initialize(&mut self, cage: ControlCage) -> AnalysisResult<()> {
        if cage.vertices.is_empty() || cage.faces.is_empty() {
            return Err(AnalysisError::invalid_argument("control cage is empty"));
        }
        log::debug!(
            "bilinear cage initialized with {} vertices, {} faces",
            cage.vertex_count(),
            cage.face_count()
        );
        self.cage = Some(cage);
        Ok(())
    }

    #[must_use]
    pub fn cage(&self) -> Option<&ControlCage> {
        self.cage.as_ref()
    }

    fn loaded(&self) -> AnalysisResult<&ControlCage> {
        self.cage.as_ref().ok_or(AnalysisError::InvalidState)
    }

    fn face_corners(&self, face: FaceId, u: f64, v: f64) -> AnalysisResult<[Point3; 4]> {
        let cage = self.loaded()?;
        check_face(face, cage.face_count())?;
        check_uv(u, v)?;
        Ok(cage.corners(face))
    }
}

fn bilinear_derivatives(corners: &[Point3; 4], u: f64, v: f64) -> LimitDerivatives {
    let [a, b, c, d] = *corners;
    let position = Point3::bilinear(a, b, c, d, u, v);
    let du = (b - a).mul_scalar(1.0 - v) + (c - d).mul_scalar(v);
    let dv = (d - a).mul_scalar(1.0 - u) + (c - b).mul_scalar(u);
    let duv = a.to_vec3() - b.to_vec3() + c.to_vec3() - d.to_vec3();

    LimitDerivatives {
        position,
        du,
        dv,
        duu: Vec3::ZERO,
        dvv: Vec3::ZERO,
        duv,
    }
}

impl SurfaceEvaluator for BilinearCage {
    fn is_initialized(&self) -> bool {
        self.cage.is_some()
    }

    fn face_count(&self) -> usize {
        self.cage.as_ref().map_or(0, ControlCage::face_count)
    }

    fn evaluate_limit(&self, face: FaceId, u: f64, v: f64) -> AnalysisResult<(Point3, Vec3)> {
        let corners = self.face_corners(face, u, v)?;
        let d = bilinear_derivatives(&corners, u, v);
        // Collapsed corners of triangle faces have no tangent frame.
        let normal = d
            .du
            .cross(d.dv)
            .normalized()
            .or_else(|| newell_normal(&corners))
            .unwrap_or(Vec3::Z);
        Ok((d.position, normal))
    }

    fn evaluate_limit_with_second_derivatives(
        &self,
        face: FaceId,
        u: f64,
        v: f64,
    ) -> AnalysisResult<LimitDerivatives> {
        let corners = self.face_corners(face, u, v)?;
        Ok(bilinear_derivatives(&corners, u, v))
    }

    fn tessellate(&self, level: u32) -> AnalysisResult<Tessellation> {
        let cage = self.loaded()?;
        let segments = grid_segments(level)?;

        let mut mesh = Tessellation::default();
        for face in 0..cage.face_count() {
            let [a, b, c, d] = cage.corners(face);
            mesh.push_face_grid(face, segments, |u, v| Point3::bilinear(a, b, c, d, u, v));
        }
        log::trace!(
            "bilinear cage tessellated at level {level}: {} triangles",
            mesh.triangle_count()
        );
        Ok(mesh)
    }
}
