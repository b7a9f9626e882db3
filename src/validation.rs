//! Input validation for process definitions.
//!
//! Checks process specs before the engine registers them. The engine
//! never receives a malformed process: rejections happen synchronously
//! at registration, never inside a later tick. Detects:
//! - Zero service time
//! - Zero quantum override

use crate::models::ProcessSpec;
use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Total service time must be at least one unit.
    ZeroServiceTime,
    /// A quantum override must be at least one unit.
    ZeroQuantumOverride,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a process definition.
///
/// Checks:
/// 1. Service time is at least one unit
/// 2. A quantum override, when present, is at least one unit
///
/// Arrival time needs no check: any clock value is a legal arrival.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_spec(spec: &ProcessSpec) -> ValidationResult {
    let mut errors = Vec::new();

    if spec.service_time == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroServiceTime,
            format!("Process '{}' has zero service time", display_name(spec)),
        ));
    }

    if spec.quantum_override == Some(0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroQuantumOverride,
            format!("Process '{}' has a zero quantum override", display_name(spec)),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn display_name(spec: &ProcessSpec) -> &str {
    if spec.name.is_empty() {
        "<unnamed>"
    } else {
        &spec.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessSpec;

    #[test]
    fn test_valid_spec() {
        let spec = ProcessSpec::new(5).with_arrival(3);
        assert!(validate_spec(&spec).is_ok());
    }

    #[test]
    fn test_zero_arrival_is_valid() {
        assert!(validate_spec(&ProcessSpec::new(1)).is_ok());
    }

    #[test]
    fn test_zero_service_time_rejected() {
        let errors = validate_spec(&ProcessSpec::new(0).with_name("bad")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::ZeroServiceTime);
        assert!(errors[0].message.contains("bad"));
    }

    #[test]
    fn test_zero_quantum_override_rejected() {
        let errors = validate_spec(&ProcessSpec::new(2).with_quantum_override(0)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::ZeroQuantumOverride);
    }

    #[test]
    fn test_all_errors_collected() {
        let errors = validate_spec(&ProcessSpec::new(0).with_quantum_override(0)).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_valid_quantum_override() {
        assert!(validate_spec(&ProcessSpec::new(2).with_quantum_override(1)).is_ok());
    }
}
