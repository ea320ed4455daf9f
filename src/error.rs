//! Error taxonomy for scene setup.
//!
//! Only two things can go wrong while building the tableau: a malformed
//! construction argument, or a host collaborator (window, surface, GPU, asset
//! loader) that is not there. The per-frame update never fails.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableauError {
    /// A primitive or finish was constructed from a non-positive, non-finite
    /// or otherwise malformed argument.
    #[error("invalid parameter `{what}`: {reason}")]
    InvalidParameter { what: &'static str, reason: String },

    /// The host could not provide a render surface, GPU device or asset loader.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(String),
}

impl TableauError {
    pub(crate) fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            what,
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(collaborator: impl Into<String>) -> Self {
        Self::MissingCollaborator(collaborator.into())
    }
}

pub type Result<T> = std::result::Result<T, TableauError>;

/// Fails with `InvalidParameter` unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(what: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(TableauError::invalid(
            what,
            format!("expected a finite value > 0, got {value}"),
        ))
    }
}

/// Fails with `InvalidParameter` unless `value` is at least `min`.
pub(crate) fn ensure_at_least(what: &'static str, value: u32, min: u32) -> Result<u32> {
    if value >= min {
        Ok(value)
    } else {
        Err(TableauError::invalid(
            what,
            format!("expected at least {min}, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_checks_reject_nan_zero_and_negative() {
        assert!(ensure_positive("radius", 1.5).is_ok());
        assert!(ensure_positive("radius", 0.0).is_err());
        assert!(ensure_positive("radius", -2.0).is_err());
        assert!(ensure_positive("radius", f32::NAN).is_err());
        assert!(ensure_positive("radius", f32::INFINITY).is_err());
    }

    #[test]
    fn error_messages_name_the_parameter() {
        let err = ensure_at_least("segments", 2, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid parameter `segments`: expected at least 3, got 2"
        );
        let err = TableauError::missing("render surface");
        assert_eq!(err.to_string(), "missing collaborator: render surface");
    }
}
