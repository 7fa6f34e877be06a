//! Leveled manufacturability findings.

use std::fmt;

use serde::Serialize;

use crate::geom::FaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintLevel {
    /// Physically impossible to mold as is.
    Error,
    /// Moldable, but a manufacturing challenge.
    Warning,
    /// Aesthetic observation; never a defect.
    Feature,
}

impl ConstraintLevel {
    /// Canned remediation text attached to violations of this level.
    #[must_use]
    pub const fn suggestion(self) -> &'static str {
        match self {
            Self::Error => "This region requires revision to eliminate physical impossibility",
            Self::Warning => "Consider adjusting geometry for better manufacturability",
            Self::Feature => "This is an aesthetic feature - mathematical tension",
        }
    }
}

impl fmt::Display for ConstraintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Feature => "FEATURE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintViolation {
    pub level: ConstraintLevel,
    pub description: String,
    pub face_id: FaceId,
    /// In `[0, 1]`; always `0` for [`ConstraintLevel::Feature`].
    pub severity: f64,
    pub suggestion: String,
}

/// Violations in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConstraintReport {
    violations: Vec<ConstraintViolation>,
}

fn unit_severity(severity: f64) -> f64 {
    if severity.is_nan() {
        0.0
    } else {
        severity.clamp(0.0, 1.0)
    }
}

impl ConstraintReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. `severity` is clamped to `[0, 1]` and NaN becomes `0`,
    /// so any caller value at or above `1` is stored as `1`.
    pub fn add_error(&mut self, description: impl Into<String>, face_id: FaceId, severity: f64) {
        self.push(ConstraintLevel::Error, description.into(), face_id, unit_severity(severity));
    }

    /// Record a warning, clamping `severity` like [`ConstraintReport::add_error`].
    pub fn add_warning(&mut self, description: impl Into<String>, face_id: FaceId, severity: f64) {
        self.push(ConstraintLevel::Warning, description.into(), face_id, unit_severity(severity));
    }

    pub fn add_feature(&mut self, description: impl Into<String>, face_id: FaceId) {
        self.push(ConstraintLevel::Feature, description.into(), face_id, 0.0);
    }

    fn push(&mut self, level: ConstraintLevel, description: String, face_id: FaceId, severity: f64) {
        self.violations.push(ConstraintViolation {
            level,
            description,
            face_id,
            severity,
            suggestion: level.suggestion().to_owned(),
        });
    }

    #[must_use]
    pub fn violations(&self) -> &[ConstraintViolation] {
        &self.violations
    }

    #[must_use]
    pub fn into_violations(self) -> Vec<ConstraintViolation> {
        self.violations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    fn count(&self, level: ConstraintLevel) -> usize {
        self.violations.iter().filter(|v| v.level == level).count()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.level == ConstraintLevel::Error)
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.violations.iter().any(|v| v.level == ConstraintLevel::Warning)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(ConstraintLevel::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(ConstraintLevel::Warning)
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.count(ConstraintLevel::Feature)
    }

    /// Largest severity in the report, `0` when empty.
    #[must_use]
    pub fn max_severity(&self) -> f64 {
        self.violations
            .iter()
            .map(|v| v.severity)
            .fold(0.0, f64::max)
    }

    pub fn violations_for_face(&self, face_id: FaceId) -> impl Iterator<Item = &ConstraintViolation> {
        self.violations.iter().filter(move |v| v.face_id == face_id)
    }
}

impl<'a> IntoIterator for &'a ConstraintReport {
    type Item = &'a ConstraintViolation;
    type IntoIter = std::slice::Iter<'a, ConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
