//! Manufacturability analysis passes over a [`SurfaceEvaluator`](crate::geom::SurfaceEvaluator).

mod curvature;
mod draft;
mod report;
mod undercut;
mod validator;

pub use curvature::{CurvatureAnalyzer, CurvatureResult, SurfaceType};
pub use draft::{DraftChecker, MIN_DRAFT_ANGLE, RECOMMENDED_DRAFT_ANGLE, draft_angle};
pub use report::{ConstraintLevel, ConstraintReport, ConstraintViolation};
pub use undercut::{MAX_SAMPLES_PER_AXIS, UndercutDetector, UndercutOptions};
pub use validator::{ConstraintValidator, DraftThresholds};

#[cfg(test)]
mod tests;
