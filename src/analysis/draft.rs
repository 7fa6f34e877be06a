//! Draft angles of faces relative to a demolding direction.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{AnalysisError, AnalysisResult};
use crate::geom::{FaceId, SurfaceEvaluator, Tolerance, Vec3, check_face};

/// Drafts below this many degrees cannot be demolded.
pub const MIN_DRAFT_ANGLE: f64 = 0.5;

/// Drafts below this many degrees demold poorly.
pub const RECOMMENDED_DRAFT_ANGLE: f64 = 2.0;

/// Draft angle in degrees, `90° - ∠(normal, demold)`.
///
/// `+90°` when the normal points along the demolding direction, `0°` when
/// perpendicular and `-90°` when opposed. Returns `0` if either vector is
/// shorter than `1e-6`.
#[must_use]
pub fn draft_angle(normal: Vec3, demold: Vec3) -> f64 {
    let eps = Tolerance::DIRECTION.eps;
    let normal_len = normal.length();
    let demold_len = demold.length();
    if normal_len < eps || demold_len < eps {
        return 0.0;
    }

    let cos = (normal.dot(demold) / (normal_len * demold_len)).clamp(-1.0, 1.0);
    90.0 - cos.acos().to_degrees()
}

/// Per-face draft evaluation at the face center.
#[derive(Debug, Clone, Copy)]
pub struct DraftChecker<'a, E: ?Sized> {
    surface: &'a E,
}

impl<'a, E> DraftChecker<'a, E>
where
    E: SurfaceEvaluator + ?Sized,
{
    #[must_use]
    pub fn new(surface: &'a E) -> Self {
        Self { surface }
    }

    /// Draft of `face` from its limit normal at `(0.5, 0.5)`.
    pub fn check_face_draft(&self, face: FaceId, demold: Vec3) -> AnalysisResult<f64> {
        let (_, normal) = self.surface.evaluate_limit(face, 0.5, 0.5)?;
        Ok(draft_angle(normal, demold))
    }

    /// Draft of every listed face, keyed by face id.
    pub fn compute_draft_angles(
        &self,
        face_ids: &[FaceId],
        demold: Vec3,
    ) -> AnalysisResult<BTreeMap<FaceId, f64>> {
        if !self.surface.is_initialized() {
            return Err(AnalysisError::InvalidState);
        }
        let face_count = self.surface.face_count();
        for &face in face_ids {
            check_face(face, face_count)?;
        }

        let angles = self.collect_angles(face_ids, demold)?;
        log::debug!("draft angles computed for {} faces", angles.len());
        Ok(angles)
    }

    #[cfg(feature = "parallel")]
    fn collect_angles(
        &self,
        face_ids: &[FaceId],
        demold: Vec3,
    ) -> AnalysisResult<BTreeMap<FaceId, f64>> {
        face_ids
            .par_iter()
            .map(|&face| Ok((face, self.check_face_draft(face, demold)?)))
            .collect::<AnalysisResult<Vec<_>>>()
            .map(|pairs| pairs.into_iter().collect())
    }

    #[cfg(not(feature = "parallel"))]
    fn collect_angles(
        &self,
        face_ids: &[FaceId],
        demold: Vec3,
    ) -> AnalysisResult<BTreeMap<FaceId, f64>> {
        face_ids
            .iter()
            .map(|&face| Ok((face, self.check_face_draft(face, demold)?)))
            .collect()
    }
}
