//! Typed failures of the gesture core.
//!
//! Application layers carry these inside `anyhow::Error`; callers that need to
//! tell a bad frame from a bad startup configuration can downcast.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum GestureError {
    /// The pose lacks landmarks the classifier needs, or carries non-finite
    /// coordinates. Recoverable: skip the frame.
    InvalidPose { reason: String },
    /// A configuration value breaks its invariants. Fatal at startup.
    InvalidConfig { field: &'static str, reason: String },
}

impl GestureError {
    pub(crate) fn invalid_pose(reason: impl Into<String>) -> Self {
        GestureError::InvalidPose {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        GestureError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Stable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            GestureError::InvalidPose { .. } => "INVALID_POSE",
            GestureError::InvalidConfig { .. } => "INVALID_CONFIG",
        }
    }

    pub fn is_invalid_pose(&self) -> bool {
        matches!(self, GestureError::InvalidPose { .. })
    }
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureError::InvalidPose { reason } => write!(f, "{}: {}", self.code(), reason),
            GestureError::InvalidConfig { field, reason } => {
                write!(f, "{}: {} {}", self.code(), field, reason)
            }
        }
    }
}

impl std::error::Error for GestureError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_code() {
        let err = GestureError::invalid_config("pinch_threshold", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "INVALID_CONFIG: pinch_threshold must be greater than zero"
        );
        assert!(!err.is_invalid_pose());

        let err = GestureError::invalid_pose("missing index tip");
        assert_eq!(err.code(), "INVALID_POSE");
        assert!(err.is_invalid_pose());
    }

    #[test]
    fn survives_anyhow_round_trip() {
        let err: anyhow::Error = GestureError::invalid_pose("empty pose").into();
        let inner = err.downcast_ref::<GestureError>().expect("downcast");
        assert!(inner.is_invalid_pose());
    }
}
