//! Evaluator over a list of parametric surface patches.
//!
//! Each control face is a rectangular window of a [`Surface`]. Face-local
//! `(u, v) ∈ [0,1]²` maps linearly onto the window, and derivatives are scaled
//! by the window spans (chain rule), so curvature is independent of how the
//! surface was split into faces.

use super::core::{Point3, Vec3};
use super::evaluator::{
    FaceId, LimitDerivatives, SurfaceEvaluator, Tessellation, check_face, check_uv, grid_segments,
};
use super::surface::{SphereSurface, Surface};
use crate::error::{AnalysisError, AnalysisResult};

/// A rectangular window `u_range × v_range` of a parametric surface.
pub struct SurfacePatch {
    surface: Box<dyn Surface + Send + Sync>,
    u_range: (f64, f64),
    v_range: (f64, f64),
}

impl std::fmt::Debug for SurfacePatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfacePatch")
            .field("u_range", &self.u_range)
            .field("v_range", &self.v_range)
            .finish_non_exhaustive()
    }
}

impl SurfacePatch {
    /// The whole domain of `surface`.
    pub fn full<S>(surface: S) -> Self
    where
        S: Surface + Send + Sync + 'static,
    {
        let u_range = surface.domain_u();
        let v_range = surface.domain_v();
        Self {
            surface: Box::new(surface),
            u_range,
            v_range,
        }
    }

    /// A sub-window of `surface`. Ranges must be finite and non-empty.
    pub fn window<S>(surface: S, u_range: (f64, f64), v_range: (f64, f64)) -> AnalysisResult<Self>
    where
        S: Surface + Send + Sync + 'static,
    {
        let valid = |(a, b): (f64, f64)| a.is_finite() && b.is_finite() && b > a;
        if !valid(u_range) || !valid(v_range) {
            return Err(AnalysisError::invalid_argument(format!(
                "patch window must be finite and non-empty, got u {u_range:?}, v {v_range:?}"
            )));
        }
        Ok(Self {
            surface: Box::new(surface),
            u_range,
            v_range,
        })
    }

    fn u_span(&self) -> f64 {
        self.u_range.1 - self.u_range.0
    }

    fn v_span(&self) -> f64 {
        self.v_range.1 - self.v_range.0
    }

    fn to_surface_params(&self, u: f64, v: f64) -> (f64, f64) {
        (
            self.u_range.0 + self.u_span() * u,
            self.v_range.0 + self.v_span() * v,
        )
    }

    #[must_use]
    pub fn point_at(&self, u: f64, v: f64) -> Point3 {
        let (su, sv) = self.to_surface_params(u, v);
        self.surface.point_at(su, sv)
    }

    fn derivatives_at(&self, u: f64, v: f64) -> LimitDerivatives {
        let (su, sv) = self.to_surface_params(u, v);
        let (ku, kv) = (self.u_span(), self.v_span());
        let (du, dv) = self.surface.partial_derivatives_at(su, sv);
        let (duu, duv, dvv) = self.surface.second_partial_derivatives_at(su, sv);

        LimitDerivatives {
            position: self.surface.point_at(su, sv),
            du: du.mul_scalar(ku),
            dv: dv.mul_scalar(kv),
            duu: duu.mul_scalar(ku * ku),
            dvv: dvv.mul_scalar(kv * kv),
            duv: duv.mul_scalar(ku * kv),
        }
    }

    fn normal_at(&self, u: f64, v: f64) -> Vec3 {
        let (su, sv) = self.to_surface_params(u, v);
        self.surface.normal_at(su, sv).unwrap_or(Vec3::Z)
    }
}

/// [`SurfaceEvaluator`] whose control faces are [`SurfacePatch`]es.
#[derive(Debug, Default)]
pub struct PatchEvaluator {
    patches: Vec<SurfacePatch>,
}

impl PatchEvaluator {
    #[must_use]
    pub fn new(patches: Vec<SurfacePatch>) -> Self {
        Self { patches }
    }

    /// A closed sphere split into `u_splits × v_splits` longitude/latitude
    /// patches. Face ids run longitude-fastest starting at the south pole.
    pub fn sphere(
        center: Point3,
        radius: f64,
        u_splits: usize,
        v_splits: usize,
    ) -> AnalysisResult<Self> {
        if u_splits == 0 || v_splits == 0 {
            return Err(AnalysisError::invalid_argument(
                "sphere needs at least one split in each direction",
            ));
        }
        let sphere = SphereSurface::new(center, radius).map_err(AnalysisError::InvalidArgument)?;

        let mut patches = Vec::with_capacity(u_splits * v_splits);
        for j in 0..v_splits {
            let v_range = (j as f64 / v_splits as f64, (j + 1) as f64 / v_splits as f64);
            for i in 0..u_splits {
                let u_range = (i as f64 / u_splits as f64, (i + 1) as f64 / u_splits as f64);
                patches.push(SurfacePatch::window(sphere, u_range, v_range)?);
            }
        }
        Ok(Self::new(patches))
    }

    pub fn push(&mut self, patch: SurfacePatch) -> FaceId {
        self.patches.push(patch);
        self.patches.len() - 1
    }

    fn patch(&self, face: FaceId, u: f64, v: f64) -> AnalysisResult<&SurfacePatch> {
        if !self.is_initialized() {
            return Err(AnalysisError::InvalidState);
        }
        check_face(face, self.patches.len())?;
        check_uv(u, v)?;
        Ok(&self.patches[face])
    }
}

impl SurfaceEvaluator for PatchEvaluator {
    fn is_initialized(&self) -> bool {
        !self.patches.is_empty()
    }

    fn face_count(&self) -> usize {
        self.patches.len()
    }

    fn evaluate_limit(&self, face: FaceId, u: f64, v: f64) -> AnalysisResult<(Point3, Vec3)> {
        let patch = self.patch(face, u, v)?;
        Ok((patch.point_at(u, v), patch.normal_at(u, v)))
    }

    fn evaluate_limit_with_second_derivatives(
        &self,
        face: FaceId,
        u: f64,
        v: f64,
    ) -> AnalysisResult<LimitDerivatives> {
        Ok(self.patch(face, u, v)?.derivatives_at(u, v))
    }

    fn tessellate(&self, level: u32) -> AnalysisResult<Tessellation> {
        if !self.is_initialized() {
            return Err(AnalysisError::InvalidState);
        }
        let segments = grid_segments(level)?;

        let mut mesh = Tessellation::default();
        for (face, patch) in self.patches.iter().enumerate() {
            mesh.push_face_grid(face, segments, |u, v| patch.point_at(u, v));
        }
        Ok(mesh)
    }
}
