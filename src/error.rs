//! Error types for the co-terming calculator.

use thiserror::Error;

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, CotermError>;

/// Errors surfaced to callers of the calculator.
///
/// The proration engine itself never fails; everything here is raised while
/// validating, loading or saving inputs before a computation runs.
#[derive(Error, Debug)]
pub enum CotermError {
    /// A line item or agreement field is outside its declared domain.
    #[error("invalid input for {field}: {reason}")]
    InvalidInput {
        /// The offending field, e.g. `months_remaining` or `line_items[2].unit_quantity`.
        field: String,
        /// What is wrong with the value.
        reason: String,
    },

    /// No stored agreement exists for the requested customer.
    #[error("no stored agreement for customer '{customer}'")]
    CustomerNotFound {
        /// Customer identifier that was looked up.
        customer: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CotermError {
    /// Shorthand for a [`CotermError::InvalidInput`] on `field`.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is a validation failure (as opposed to storage).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
