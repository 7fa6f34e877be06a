//! Principal curvatures from limit-surface derivatives.
//!
//! Curvature comes from the shape operator `S = I⁻¹·II` of the first and
//! second fundamental forms, eigen-decomposed in closed form. With the
//! evaluator's `du × dv` normal pointing outward, convex regions have
//! negative curvatures.

use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{AnalysisError, AnalysisResult};
use crate::geom::{
    FaceId, LimitDerivatives, SurfaceEvaluator, Tolerance, Vec3, check_face, check_uv,
    orthogonal_unit_vector,
};

/// Below this magnitude `K` and `H` count as zero when classifying.
const CLASSIFY_EPS: f64 = 1e-6;

/// Shape-operator off-diagonal terms below this are treated as zero.
const OFF_DIAGONAL_EPS: f64 = 1e-10;

/// Local shape of a surface point, from the signs of `K` and `H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceType {
    /// `K ≈ 0` and `H ≈ 0`.
    Planar,
    /// `K ≈ 0`, `H ≠ 0` (cylinder-like).
    Parabolic,
    /// `K > 0` (dome-like).
    Elliptic,
    /// `K < 0` (saddle-like).
    Hyperbolic,
}

/// Full curvature descriptor at one parametric point.
///
/// `kappa1` is the principal curvature of larger *absolute* value, so when
/// both are negative `kappa1 < kappa2` is possible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvatureResult {
    pub kappa1: f64,
    pub kappa2: f64,
    /// Unit tangent of `kappa1`.
    pub dir1: Vec3,
    /// Unit tangent of `kappa2`, orthogonal to `dir1`.
    pub dir2: Vec3,
    pub gaussian_curvature: f64,
    pub mean_curvature: f64,
    pub abs_mean_curvature: f64,
    pub rms_curvature: f64,
    /// First fundamental form.
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "F")]
    pub f: f64,
    #[serde(rename = "G")]
    pub g: f64,
    /// Second fundamental form.
    #[serde(rename = "L")]
    pub l: f64,
    #[serde(rename = "M")]
    pub m: f64,
    #[serde(rename = "N")]
    pub n: f64,
    pub normal: Vec3,
}

impl Default for CurvatureResult {
    fn default() -> Self {
        Self {
            kappa1: 0.0,
            kappa2: 0.0,
            dir1: Vec3::X,
            dir2: Vec3::Y,
            gaussian_curvature: 0.0,
            mean_curvature: 0.0,
            abs_mean_curvature: 0.0,
            rms_curvature: 0.0,
            e: 1.0,
            f: 0.0,
            g: 1.0,
            l: 0.0,
            m: 0.0,
            n: 0.0,
            normal: Vec3::Z,
        }
    }
}

impl CurvatureResult {
    #[must_use]
    pub fn surface_type(&self) -> SurfaceType {
        let k = self.gaussian_curvature;
        let h = self.mean_curvature;
        if k.abs() < CLASSIFY_EPS && h.abs() < CLASSIFY_EPS {
            SurfaceType::Planar
        } else if k.abs() < CLASSIFY_EPS {
            SurfaceType::Parabolic
        } else if k > 0.0 {
            SurfaceType::Elliptic
        } else {
            SurfaceType::Hyperbolic
        }
    }

    /// Determinant of the first fundamental form.
    #[must_use]
    pub fn metric_determinant(&self) -> f64 {
        self.e * self.g - self.f * self.f
    }
}

/// Row-major 2×2 matrix `[[a, b], [c, d]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Mat2 {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Mat2 {
    const ZERO: Self = Self {
        a: 0.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
    };

    fn trace(self) -> f64 {
        self.a + self.d
    }

    fn det(self) -> f64 {
        self.a * self.d - self.b * self.c
    }
}

/// `I⁻¹ · II`, or zero when the metric is degenerate.
fn shape_operator(e: f64, f: f64, g: f64, l: f64, m: f64, n: f64) -> Mat2 {
    let det_i = e * g - f * f;
    if det_i.abs() < Tolerance::METRIC.eps {
        log::trace!("degenerate metric (det I = {det_i:e}), zero shape operator");
        return Mat2::ZERO;
    }

    let inv = 1.0 / det_i;
    let (ia, ib, id) = (g * inv, -f * inv, e * inv);
    Mat2 {
        a: ia * l + ib * m,
        b: ia * m + ib * n,
        c: ib * l + id * m,
        d: ib * m + id * n,
    }
}

fn normalize_2d(x: f64, y: f64) -> (f64, f64) {
    let len = x.hypot(y);
    if len > Tolerance::METRIC.eps {
        (x / len, y / len)
    } else {
        (1.0, 0.0)
    }
}

/// Eigenvalues ordered by decreasing magnitude, with their eigenvectors.
fn eigensystem(s: Mat2) -> ((f64, f64), (f64, f64), (f64, f64)) {
    let trace = s.trace();
    let disc = (trace * trace - 4.0 * s.det()).max(0.0);
    let root = disc.sqrt();

    let mut lambda1 = 0.5 * (trace + root);
    let mut lambda2 = 0.5 * (trace - root);
    if lambda2.abs() > lambda1.abs() {
        std::mem::swap(&mut lambda1, &mut lambda2);
    }

    let (v1, v2) = if s.b.abs() > OFF_DIAGONAL_EPS {
        ((s.b, lambda1 - s.a), (s.b, lambda2 - s.a))
    } else if s.c.abs() > OFF_DIAGONAL_EPS {
        ((lambda1 - s.d, s.c), (lambda2 - s.d, s.c))
    } else if (lambda1 - s.a).abs() <= (lambda1 - s.d).abs() {
        ((1.0, 0.0), (0.0, 1.0))
    } else {
        ((0.0, 1.0), (1.0, 0.0))
    };

    (
        (lambda1, lambda2),
        normalize_2d(v1.0, v1.1),
        normalize_2d(v2.0, v2.1),
    )
}

fn unit_or_z(v: Vec3) -> Vec3 {
    v.normalized_above(Tolerance::METRIC.eps).unwrap_or(Vec3::Z)
}

/// Replace `dir2` by the in-plane perpendicular of `dir1` when the two are
/// not orthogonal (umbilics, degenerate metrics), keeping `dir2`'s sense.
fn orthogonal_pair(normal: Vec3, dir1: Vec3, dir2: Vec3) -> Vec3 {
    if dir1.dot(dir2).abs() <= Tolerance::DIRECTION.eps {
        return dir2;
    }
    let perp = normal
        .cross(dir1)
        .normalized_above(Tolerance::METRIC.eps)
        .unwrap_or_else(|| orthogonal_unit_vector(dir1));
    if perp.dot(dir2) < 0.0 { -perp } else { perp }
}

/// Computes [`CurvatureResult`]s through a borrowed [`SurfaceEvaluator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CurvatureAnalyzer;

impl CurvatureAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Curvature at `(face, u, v)` with `u, v ∈ [0, 1]`.
    pub fn compute_curvature<E>(
        &self,
        surface: &E,
        face: FaceId,
        u: f64,
        v: f64,
    ) -> AnalysisResult<CurvatureResult>
    where
        E: SurfaceEvaluator + ?Sized,
    {
        if !surface.is_initialized() {
            return Err(AnalysisError::InvalidState);
        }
        check_uv(u, v)?;
        let derivatives = surface.evaluate_limit_with_second_derivatives(face, u, v)?;
        Ok(Self::from_derivatives(&derivatives))
    }

    /// Curvature at every `(face_ids[i], us[i], vs[i])`.
    ///
    /// All inputs are validated before any point is evaluated.
    pub fn batch_compute_curvature<E>(
        &self,
        surface: &E,
        face_ids: &[FaceId],
        us: &[f64],
        vs: &[f64],
    ) -> AnalysisResult<Vec<CurvatureResult>>
    where
        E: SurfaceEvaluator + ?Sized,
    {
        if !surface.is_initialized() {
            return Err(AnalysisError::InvalidState);
        }
        if us.len() != face_ids.len() || vs.len() != face_ids.len() {
            return Err(AnalysisError::SizeMismatch {
                faces: face_ids.len(),
                us: us.len(),
                vs: vs.len(),
            });
        }
        let face_count = surface.face_count();
        for ((&face, &u), &v) in face_ids.iter().zip(us).zip(vs) {
            check_face(face, face_count)?;
            check_uv(u, v)?;
        }

        log::debug!("batch curvature over {} points", face_ids.len());
        batch_points(surface, face_ids, us, vs)
    }

    /// Curvature from already evaluated derivatives.
    #[must_use]
    pub fn from_derivatives(d: &LimitDerivatives) -> CurvatureResult {
        let normal = unit_or_z(d.du.cross(d.dv));

        let e = d.du.dot(d.du);
        let f = d.du.dot(d.dv);
        let g = d.dv.dot(d.dv);

        let l = d.duu.dot(normal);
        let m = d.duv.dot(normal);
        let n = d.dvv.dot(normal);

        let s = shape_operator(e, f, g, l, m, n);
        let ((kappa1, kappa2), (a1, b1), (a2, b2)) = eigensystem(s);

        let dir1 = unit_or_z(d.du.mul_scalar(a1) + d.dv.mul_scalar(b1));
        let dir2 = unit_or_z(d.du.mul_scalar(a2) + d.dv.mul_scalar(b2));
        let dir2 = orthogonal_pair(normal, dir1, dir2);

        let mean_curvature = (kappa1 + kappa2) * 0.5;
        CurvatureResult {
            kappa1,
            kappa2,
            dir1,
            dir2,
            gaussian_curvature: kappa1 * kappa2,
            mean_curvature,
            abs_mean_curvature: mean_curvature.abs(),
            rms_curvature: ((kappa1 * kappa1 + kappa2 * kappa2) * 0.5).sqrt(),
            e,
            f,
            g,
            l,
            m,
            n,
            normal,
        }
    }
}

fn curvature_at<E>(surface: &E, face: FaceId, u: f64, v: f64) -> AnalysisResult<CurvatureResult>
where
    E: SurfaceEvaluator + ?Sized,
{
    surface
        .evaluate_limit_with_second_derivatives(face, u, v)
        .map(|d| CurvatureAnalyzer::from_derivatives(&d))
}

#[cfg(feature = "parallel")]
fn batch_points<E>(
    surface: &E,
    face_ids: &[FaceId],
    us: &[f64],
    vs: &[f64],
) -> AnalysisResult<Vec<CurvatureResult>>
where
    E: SurfaceEvaluator + ?Sized,
{
    (0..face_ids.len())
        .into_par_iter()
        .map(|i| curvature_at(surface, face_ids[i], us[i], vs[i]))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn batch_points<E>(
    surface: &E,
    face_ids: &[FaceId],
    us: &[f64],
    vs: &[f64],
) -> AnalysisResult<Vec<CurvatureResult>>
where
    E: SurfaceEvaluator + ?Sized,
{
    face_ids
        .iter()
        .zip(us)
        .zip(vs)
        .map(|((&face, &u), &v)| curvature_at(surface, face, u, v))
        .collect()
}
