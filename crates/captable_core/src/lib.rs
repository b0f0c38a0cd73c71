//! # captable_core: Data Model for Exit Waterfall Analysis
//!
//! ## Core Layer Role
//!
//! captable_core is the bottom layer of the workspace, providing:
//! - Strongly-typed identifiers: `ShareClassId`, `TransactionId` (`types::ids`)
//! - Share class terms: `ShareClass`, `ShareClassType`, `PreferenceType` (`types::share_class`)
//! - Investment records: `Transaction` (`types::transaction`)
//! - Validated proceeds: `ExitAmount` (`types::exit`)
//! - Error types: `CapTableError` (`types::error`)
//! - The validated, immutable input snapshot: `CapTable` (`cap_table`)
//! - Default fixture data (`presets`) and currency formatting (`money`)
//!
//! ## No Engine Logic
//!
//! This crate holds records and validation only. The allocation algorithm
//! lives in `captable_waterfall`, which consumes `CapTable` snapshots and
//! never mutates them.
//!
//! ## Usage Examples
//!
//! ```rust
//! use captable_core::{CapTable, ShareClass, Transaction, PreferenceType};
//!
//! let classes = vec![
//!     ShareClass::preferred(1, "Series A", 1, 1.0, PreferenceType::Participating),
//!     ShareClass::common(2, "Common", 2),
//! ];
//! let transactions = vec![
//!     Transaction::new(1, "Series A", 1_000_000.0, 1_000_000.0),
//!     Transaction::new(2, "Common", 750_000.0, 0.0),
//! ];
//!
//! let table = CapTable::new(classes, transactions).unwrap();
//! assert_eq!(table.total_shares(), 1_750_000.0);
//! assert_eq!(table.active_share_classes().count(), 2);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod cap_table;
pub mod money;
pub mod presets;
pub mod types;

pub use cap_table::{CapTable, ClassHoldings, Ownership, ReferencePolicy};
pub use types::{
    CapTableError, ExitAmount, PreferenceType, ShareClass, ShareClassId, ShareClassType,
    Transaction, TransactionId,
};
