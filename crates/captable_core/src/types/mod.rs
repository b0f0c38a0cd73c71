//! Core record types for cap table modelling.
//!
//! This module provides:
//! - `ids`: Strongly-typed identifiers for share classes and transactions
//! - `share_class`: Share class terms (type, seniority, preference, cap)
//! - `transaction`: Investment transactions referencing a share class by name
//! - `exit`: Validated exit proceeds
//! - `error`: Structured validation errors
//!
//! # Re-exports
//!
//! - [`ShareClassId`], [`TransactionId`] from `ids`
//! - [`ShareClass`], [`ShareClassType`], [`PreferenceType`] from `share_class`
//! - [`Transaction`] from `transaction`
//! - [`ExitAmount`] from `exit`
//! - [`CapTableError`] from `error`

pub mod error;
pub mod exit;
pub mod ids;
pub mod share_class;
pub mod transaction;

pub use error::CapTableError;
pub use exit::ExitAmount;
pub use ids::{ShareClassId, TransactionId};
pub use share_class::{PreferenceType, ShareClass, ShareClassType};
pub use transaction::Transaction;
