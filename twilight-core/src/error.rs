use thiserror::Error;

/// Errors originating from the parameter model and timeline.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("unknown parameter field `{0}`")]
    UnknownField(String),

    #[error("invalid frame rate: {0} (must be positive and finite)")]
    InvalidFrameRate(f64),
}

impl CoreError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if this is a parameter error.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidParameter { field, .. } => Some(*field),
            Self::UnknownField(_) | Self::InvalidFrameRate(_) => None,
        }
    }
}
