use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CarLoanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CarLoanError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CarLoanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Overflow in decimal arithmetic, attributed to `field`.
    pub(crate) fn out_of_range(field: &str) -> Self {
        Self::invalid(field, "exceeds representable range")
    }

    /// Name of the offending input field, if this is a validation failure.
    pub fn field(&self) -> Option<&str> {
        match self {
            CarLoanError::InvalidInput { field, .. } => Some(field),
            CarLoanError::SerializationError(_) => None,
        }
    }
}

impl From<serde_json::Error> for CarLoanError {
    fn from(e: serde_json::Error) -> Self {
        CarLoanError::SerializationError(e.to_string())
    }
}
