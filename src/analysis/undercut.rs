//! Ray-cast undercut detection along a demolding direction.
//!
//! A face is sampled on a regular grid. Each sample casts a ray along the
//! demolding direction against the proxy mesh of every *other* face. The ray
//! starts `ray_offset` off the surface along both the sample normal and the
//! demolding direction, so rays running inside a wall's own plane do not
//! graze the edges of adjacent faces. Samples whose normal faces away from
//! the direction also count as misaligned. The face severity is the worst
//! per-sample term scaled by the fraction of occluded samples, and faces with
//! at most 10% occluded samples score zero.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{AnalysisError, AnalysisResult};
use crate::geom::{FaceId, Point3, ProxyMesh, SurfaceEvaluator, Tolerance, Vec3, check_face};

/// Occluded-sample fraction a face must exceed to be reported.
const MIN_UNDERCUT_RATIO: f64 = 0.1;

/// Upper bound for [`UndercutOptions::samples_per_axis`].
pub const MAX_SAMPLES_PER_AXIS: usize = 1024;

/// Sampling and ray settings.
///
/// Checked on every detector call: `samples_per_axis` must lie in
/// `1..=MAX_SAMPLES_PER_AXIS` and `ray_offset` must be finite and `>= 0`,
/// otherwise the call fails with [`AnalysisError::InvalidArgument`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UndercutOptions {
    /// Samples per parametric direction, taken at cell centers.
    pub samples_per_axis: usize,
    /// Level passed to [`SurfaceEvaluator::tessellate`] for the proxy mesh.
    pub tessellation_level: u32,
    /// Distance along the sample normal and along the demolding direction
    /// that rays start off the surface.
    pub ray_offset: f64,
}

impl Default for UndercutOptions {
    fn default() -> Self {
        Self {
            samples_per_axis: 5,
            tessellation_level: 3,
            ray_offset: 0.001,
        }
    }
}

impl UndercutOptions {
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(1..=MAX_SAMPLES_PER_AXIS).contains(&self.samples_per_axis) {
            return Err(AnalysisError::invalid_argument(format!(
                "samples per axis must lie in 1..={MAX_SAMPLES_PER_AXIS}, got {}",
                self.samples_per_axis
            )));
        }
        if !self.ray_offset.is_finite() || self.ray_offset < 0.0 {
            return Err(AnalysisError::invalid_argument(format!(
                "ray offset must be finite and non-negative, got {}",
                self.ray_offset
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UndercutDetector<'a, E: ?Sized> {
    surface: &'a E,
    options: UndercutOptions,
}

impl<'a, E> UndercutDetector<'a, E>
where
    E: SurfaceEvaluator + ?Sized,
{
    #[must_use]
    pub fn new(surface: &'a E) -> Self {
        Self::with_options(surface, UndercutOptions::default())
    }

    #[must_use]
    pub fn with_options(surface: &'a E, options: UndercutOptions) -> Self {
        Self { surface, options }
    }

    #[must_use]
    pub fn options(&self) -> UndercutOptions {
        self.options
    }

    /// Undercut severity of one face in `[0, 1]`; `0` means none.
    pub fn check_face_undercut(&self, face: FaceId, demold: Vec3) -> AnalysisResult<f64> {
        self.check_faces(&[face])?;
        let proxy = self.proxy_mesh()?;
        self.face_severity(&proxy, face, demolding_axis(demold))
    }

    /// Severity of every listed face that has an undercut. Faces scoring
    /// zero are left out of the map.
    pub fn detect_undercuts(
        &self,
        face_ids: &[FaceId],
        demold: Vec3,
    ) -> AnalysisResult<BTreeMap<FaceId, f64>> {
        self.check_faces(face_ids)?;
        let proxy = self.proxy_mesh()?;
        let dir = demolding_axis(demold);

        let severities = self.collect_severities(&proxy, face_ids, dir)?;
        let undercuts: BTreeMap<FaceId, f64> = severities
            .into_iter()
            .filter(|&(_, severity)| severity > 0.0)
            .collect();

        log::debug!(
            "undercut scan: {} of {} faces flagged against {} proxy triangles",
            undercuts.len(),
            face_ids.len(),
            proxy.triangle_count()
        );
        Ok(undercuts)
    }

    /// Whether a ray from `origin` along `direction` hits `face`'s proxy triangles.
    pub fn ray_intersects_face(
        &self,
        origin: Point3,
        direction: Vec3,
        face: FaceId,
    ) -> AnalysisResult<bool> {
        self.check_faces(&[face])?;
        let dir = direction
            .normalized_above(Tolerance::DIRECTION.eps)
            .ok_or_else(|| AnalysisError::invalid_argument("ray direction has zero length"))?;
        let proxy = self.proxy_mesh()?;
        Ok(proxy.hits_face(origin, dir, face))
    }

    fn check_faces(&self, face_ids: &[FaceId]) -> AnalysisResult<()> {
        if !self.surface.is_initialized() {
            return Err(AnalysisError::InvalidState);
        }
        self.options.validate()?;
        let face_count = self.surface.face_count();
        face_ids
            .iter()
            .try_for_each(|&face| check_face(face, face_count))
    }

    fn proxy_mesh(&self) -> AnalysisResult<ProxyMesh> {
        let mesh = self.surface.tessellate(self.options.tessellation_level)?;
        Ok(ProxyMesh::from_tessellation(&mesh))
    }

    fn face_severity(&self, proxy: &ProxyMesh, face: FaceId, dir: Vec3) -> AnalysisResult<f64> {
        let n = self.options.samples_per_axis;
        let total = n * n;
        let mut occluded = 0usize;
        let mut worst: f64 = 0.0;

        for j in 0..n {
            let v = (j as f64 + 0.5) / n as f64;
            for i in 0..n {
                let u = (i as f64 + 0.5) / n as f64;
                let (point, normal) = self.surface.evaluate_limit(face, u, v)?;
                let normal = normal
                    .normalized_above(Tolerance::METRIC.eps)
                    .unwrap_or(Vec3::Z);

                let alignment = normal.dot(dir);
                if alignment < 0.0 {
                    worst = worst.max(-alignment);
                }

                let offset = self.options.ray_offset;
                let origin = point + normal.mul_scalar(offset) + dir.mul_scalar(offset);
                if let Some(hit) = proxy.nearest_hit_excluding(origin, dir, face) {
                    occluded += 1;
                    worst = worst.max(1.0 / (1.0 + hit.t));
                }
            }
        }

        let ratio = occluded as f64 / total as f64;
        let severity = if ratio > MIN_UNDERCUT_RATIO {
            worst * ratio
        } else {
            0.0
        };
        log::trace!("face {face}: {occluded}/{total} samples occluded, severity {severity:.4}");
        Ok(severity)
    }

    #[cfg(feature = "parallel")]
    fn collect_severities(
        &self,
        proxy: &ProxyMesh,
        face_ids: &[FaceId],
        dir: Vec3,
    ) -> AnalysisResult<Vec<(FaceId, f64)>> {
        face_ids
            .par_iter()
            .map(|&face| Ok((face, self.face_severity(proxy, face, dir)?)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn collect_severities(
        &self,
        proxy: &ProxyMesh,
        face_ids: &[FaceId],
        dir: Vec3,
    ) -> AnalysisResult<Vec<(FaceId, f64)>> {
        face_ids
            .iter()
            .map(|&face| Ok((face, self.face_severity(proxy, face, dir)?)))
            .collect()
    }
}

/// Unit demolding direction, `+Z` for degenerate input.
fn demolding_axis(demold: Vec3) -> Vec3 {
    demold
        .normalized_above(Tolerance::DIRECTION.eps)
        .unwrap_or_else(|| {
            log::trace!("degenerate demolding direction {demold:?}, using +Z");
            Vec3::Z
        })
}
