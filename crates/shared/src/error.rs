//! Fiscal calendar error types.

use thiserror::Error;

/// Result type alias using `FiscalError`.
pub type FiscalResult<T> = Result<T, FiscalError>;

/// Errors raised by fiscal calendar construction and comparison.
///
/// Every variant is raised at the boundary that receives the bad input, so
/// callers can branch on the kind without inspecting messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FiscalError {
    /// Input is not an integer or an integer-like string.
    #[error("Invalid {field}: an integer or integer-like string is required, got '{value}'")]
    InvalidArgument {
        /// Name of the rejected field.
        field: &'static str,
        /// The raw input.
        value: String,
    },

    /// Value is well-formed but outside its domain.
    #[error("{field} must be in {min}..={max}, got {value}")]
    OutOfRange {
        /// Name of the rejected field.
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },

    /// Fiscal calendar parameters do not describe a valid calendar.
    #[error("Invalid fiscal calendar: {0}")]
    InvalidConfig(String),

    /// Comparison or containment between incompatible period types.
    #[error("Cannot compare '{left}' to '{right}'")]
    TypeMismatch {
        /// Type on the left-hand side.
        left: &'static str,
        /// Type on the right-hand side.
        right: &'static str,
    },
}

impl FiscalError {
    /// Returns a stable, machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::OutOfRange { .. } => "OUT_OF_RANGE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
        }
    }

    /// Returns true if the error was caused by malformed or out-of-domain input.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::OutOfRange { .. })
    }

    /// Shorthand for an `OutOfRange` error.
    #[must_use]
    pub fn out_of_range(field: &'static str, value: i64, min: i64, max: i64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }
}
