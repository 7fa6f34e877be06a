//! Error type shared by the evaluators and the analysis passes.

/// Result type for every fallible analysis and evaluator call.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Failures raised synchronously at the point of detection.
///
/// Numerical degeneracies (zero-length normals, singular metrics, parallel
/// rays) are not errors; the analysis passes substitute documented fallback
/// values instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// The surface evaluator has not been initialized with a cage.
    #[error("surface evaluator is not initialized")]
    InvalidState,
    /// A parameter is outside its documented domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Parallel input arrays of a batch call have different lengths.
    #[error("parameter arrays differ in length (faces: {faces}, u: {us}, v: {vs})")]
    SizeMismatch { faces: usize, us: usize, vs: usize },
}

impl AnalysisError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
