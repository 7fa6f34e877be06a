//! Region validation: undercuts first, then draft.

use crate::error::{AnalysisError, AnalysisResult};
use crate::geom::{FaceId, SurfaceEvaluator, Tolerance, Vec3};

use super::draft::{DraftChecker, MIN_DRAFT_ANGLE, RECOMMENDED_DRAFT_ANGLE};
use super::report::ConstraintReport;
use super::undercut::{UndercutDetector, UndercutOptions};

/// Draft limits in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftThresholds {
    /// Below this a face is an error.
    pub min_draft_angle: f64,
    /// Below this a face is a warning.
    pub recommended_draft_angle: f64,
}

impl Default for DraftThresholds {
    fn default() -> Self {
        Self {
            min_draft_angle: MIN_DRAFT_ANGLE,
            recommended_draft_angle: RECOMMENDED_DRAFT_ANGLE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConstraintValidator<'a, E: ?Sized> {
    surface: &'a E,
    thresholds: DraftThresholds,
    undercut_options: UndercutOptions,
}

impl<'a, E> ConstraintValidator<'a, E>
where
    E: SurfaceEvaluator + ?Sized,
{
    #[must_use]
    pub fn new(surface: &'a E) -> Self {
        Self::with_thresholds(surface, DraftThresholds::default())
    }

    #[must_use]
    pub fn with_thresholds(surface: &'a E, thresholds: DraftThresholds) -> Self {
        Self {
            surface,
            thresholds,
            undercut_options: UndercutOptions::default(),
        }
    }

    #[must_use]
    pub fn with_undercut_options(mut self, options: UndercutOptions) -> Self {
        self.undercut_options = options;
        self
    }

    #[must_use]
    pub fn thresholds(&self) -> DraftThresholds {
        self.thresholds
    }

    /// Check `face_ids` for undercuts and insufficient draft.
    ///
    /// Undercut errors come first, then draft errors and warnings, each pass
    /// in ascending face order. `min_wall_thickness` is validated but no
    /// thickness analysis is performed.
    pub fn validate_region(
        &self,
        face_ids: &[FaceId],
        demold: Vec3,
        min_wall_thickness: f64,
    ) -> AnalysisResult<ConstraintReport> {
        if !min_wall_thickness.is_finite() || min_wall_thickness <= 0.0 {
            return Err(AnalysisError::invalid_argument(format!(
                "minimum wall thickness must be positive, got {min_wall_thickness}"
            )));
        }
        if demold.normalized_above(Tolerance::DIRECTION.eps).is_none() {
            return Err(AnalysisError::invalid_argument(
                "demolding direction has zero length",
            ));
        }

        let mut report = ConstraintReport::new();
        if face_ids.is_empty() {
            return Ok(report);
        }

        let undercuts = UndercutDetector::with_options(self.surface, self.undercut_options)
            .detect_undercuts(face_ids, demold)?;
        for (&face, &severity) in &undercuts {
            report.add_error(
                "Undercut detected - requires additional mold piece",
                face,
                severity,
            );
        }

        let DraftThresholds {
            min_draft_angle: min,
            recommended_draft_angle: recommended,
        } = self.thresholds;
        let drafts = DraftChecker::new(self.surface).compute_draft_angles(face_ids, demold)?;
        for (&face, &angle) in &drafts {
            if angle < min {
                report.add_error(
                    format!("Draft angle below minimum ({angle:.3}° < {min}°)"),
                    face,
                    1.0 - angle / min,
                );
            } else if angle < recommended {
                report.add_warning(
                    format!("Draft angle below recommended ({angle:.3}° < {recommended}°)"),
                    face,
                    1.0 - angle / recommended,
                );
            }
        }

        log::debug!(
            "validated {} faces: {} errors, {} warnings",
            face_ids.len(),
            report.error_count(),
            report.warning_count()
        );
        Ok(report)
    }
}
