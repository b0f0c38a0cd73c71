//! Cap table validation errors.
//!
//! Every error is a deterministic function of the input records; nothing is
//! retried because validation performs no I/O.

use thiserror::Error;

use super::ids::{ShareClassId, TransactionId};

/// Errors raised while validating share classes, transactions and exit amounts.
///
/// # Examples
/// ```
/// use captable_core::{CapTableError, TransactionId};
///
/// let err = CapTableError::UnknownShareClassReference {
///     transaction: TransactionId::new(4),
///     share_class: "Series Z".to_string(),
/// };
/// assert_eq!(
///     err.to_string(),
///     "Transaction 4 references unknown share class: Series Z"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapTableError {
    /// A numeric field is negative, NaN or infinite.
    #[error("Invalid input: {field} = {value} ({context})")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f64,
        /// Which record the value belongs to
        context: String,
    },

    /// A share class has an empty name and cannot be referenced.
    #[error("Share class {0} has an empty name")]
    EmptyShareClassName(ShareClassId),

    /// Two share classes share the same id.
    #[error("Duplicate share class ID: {0}")]
    DuplicateShareClassId(ShareClassId),

    /// Two share classes share the same name.
    #[error("Duplicate share class name: {0}")]
    DuplicateShareClassName(String),

    /// Two transactions share the same id.
    #[error("Duplicate transaction ID: {0}")]
    DuplicateTransactionId(TransactionId),

    /// A transaction names a share class that does not exist.
    #[error("Transaction {transaction} references unknown share class: {share_class}")]
    UnknownShareClassReference {
        /// The orphaned transaction
        transaction: TransactionId,
        /// The class name it refers to
        share_class: String,
    },
}

impl CapTableError {
    /// Builds an `InvalidInput` error.
    pub fn invalid(field: &'static str, value: f64, context: impl Into<String>) -> Self {
        CapTableError::InvalidInput {
            field,
            value,
            context: context.into(),
        }
    }

    /// Checks that `value` is finite and non-negative.
    pub fn ensure_non_negative(
        field: &'static str,
        value: f64,
        context: impl FnOnce() -> String,
    ) -> Result<f64, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::invalid(field, value, context()))
        }
    }
}
