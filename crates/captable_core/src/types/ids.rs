//! Identifier types for cap table records.
//!
//! Share classes and transactions carry numeric identifiers supplied by the
//! caller. Newtypes keep the two id spaces from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a share class.
///
/// # Examples
///
/// ```
/// use captable_core::ShareClassId;
///
/// let id = ShareClassId::new(3);
/// assert_eq!(id.value(), 3);
/// assert_eq!(id.to_string(), "3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareClassId(u64);

impl ShareClassId {
    /// Creates a new share class ID.
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShareClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ShareClassId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a transaction.
///
/// # Examples
///
/// ```
/// use captable_core::TransactionId;
///
/// let id = TransactionId::from(7);
/// assert_eq!(id.value(), 7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(u64);

impl TransactionId {
    /// Creates a new transaction ID.
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TransactionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
