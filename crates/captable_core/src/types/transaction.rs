//! Investment transactions.

use serde::{Deserialize, Serialize};

use super::error::CapTableError;
use super::ids::TransactionId;

/// A block of shares bought into a share class.
///
/// Transactions reference their class by name (`shareClass` on the wire).
/// `CapTable` resolves that name into an explicit lookup.
///
/// # Examples
/// ```
/// use captable_core::Transaction;
///
/// let tx = Transaction::new(1, "Series A", 1_000_000.0, 1_000_000.0);
/// assert_eq!(tx.share_class, "Series A");
/// assert!(tx.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,
    /// Name of the share class the shares belong to
    pub share_class: String,
    /// Number of shares issued
    pub shares: f64,
    /// Dollars invested
    #[serde(default)]
    pub investment: f64,
}

impl Transaction {
    /// Creates a new transaction.
    pub fn new(id: u64, share_class: impl Into<String>, shares: f64, investment: f64) -> Self {
        Self {
            id: TransactionId::new(id),
            share_class: share_class.into(),
            shares,
            investment,
        }
    }

    /// Validates that shares and investment are finite and non-negative.
    pub fn validate(&self) -> Result<(), CapTableError> {
        let context = || format!("transaction {}", self.id);
        CapTableError::ensure_non_negative("shares", self.shares, context)?;
        CapTableError::ensure_non_negative("investment", self.investment, context)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_negative_shares() {
        let tx = Transaction::new(3, "Common", -1.0, 0.0);
        match tx.validate() {
            Err(CapTableError::InvalidInput { field, value, .. }) => {
                assert_eq!(field, "shares");
                assert_eq!(value, -1.0);
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_nan_investment() {
        let tx = Transaction::new(3, "Common", 10.0, f64::NAN);
        assert!(matches!(
            tx.validate(),
            Err(CapTableError::InvalidInput { field: "investment", .. })
        ));
    }

    #[test]
    fn test_zero_values_are_valid() {
        assert!(Transaction::new(1, "Common", 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_deserialise_wire_shape() {
        let json = r#"{"id": 2, "shareClass": "Series B", "shares": 2000000, "investment": 2000000}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, TransactionId::new(2));
        assert_eq!(tx.share_class, "Series B");
        assert_eq!(tx.shares, 2_000_000.0);
        assert_eq!(tx.investment, 2_000_000.0);
    }
}
