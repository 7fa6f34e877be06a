#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

//! Manufacturability analysis of mold cavity regions on a limit surface.
//!
//! The surface itself is external: every pass borrows a
//! [`SurfaceEvaluator`](geom::SurfaceEvaluator) read-only and queries limit
//! points, derivatives and a proxy tessellation from it. Two reference
//! evaluators ([`geom::BilinearCage`], [`geom::PatchEvaluator`]) are included.
//!
//! ```
//! use mold_engine::analysis::ConstraintValidator;
//! use mold_engine::geom::{BilinearCage, ControlCage, Vec3};
//!
//! let cube = BilinearCage::from_cage(ControlCage::unit_cube()).unwrap();
//! let report = ConstraintValidator::new(&cube)
//!     .validate_region(&[1], Vec3::Z, 1.0)
//!     .unwrap();
//! assert!(report.is_empty());
//! ```

pub mod analysis;
pub mod error;
pub mod geom;

pub use analysis::{
    ConstraintLevel, ConstraintReport, ConstraintValidator, ConstraintViolation,
    CurvatureAnalyzer, CurvatureResult, DraftChecker, UndercutDetector,
};
pub use error::{AnalysisError, AnalysisResult};
pub use geom::{FaceId, SurfaceEvaluator};
