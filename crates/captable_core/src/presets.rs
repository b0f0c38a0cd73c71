//! Default cap table used by the what-if tool on first load.
//!
//! Series A (1x participating, uncapped), Series B (1.5x participating,
//! capped at 3x) and Common, with a $10M default exit.

use crate::cap_table::CapTable;
use crate::types::{CapTableError, PreferenceType, ShareClass, Transaction};

/// Default exit amount shown on first load.
pub const DEFAULT_EXIT_AMOUNT: f64 = 10_000_000.0;

/// The exit sweep charts up to this multiple of the current exit amount.
pub const DEFAULT_SWEEP_MULTIPLE: f64 = 2.0;

/// Default number of sweep intervals.
pub const DEFAULT_SWEEP_POINTS: usize = 20;

/// Default share classes.
pub fn default_share_classes() -> Vec<ShareClass> {
    vec![
        ShareClass::preferred(1, "Series A", 1, 1.0, PreferenceType::Participating),
        ShareClass::preferred(2, "Series B", 2, 1.5, PreferenceType::Participating).with_cap(3.0),
        ShareClass::common(3, "Common", 3),
    ]
}

/// Default transactions, one per class.
pub fn default_transactions() -> Vec<Transaction> {
    vec![
        Transaction::new(1, "Series A", 1_000_000.0, 1_000_000.0),
        Transaction::new(2, "Series B", 2_000_000.0, 2_000_000.0),
        Transaction::new(3, "Common", 750_000.0, 0.0),
    ]
}

/// Default share classes and transactions as a validated table.
pub fn default_cap_table() -> Result<CapTable, CapTableError> {
    CapTable::new(default_share_classes(), default_transactions())
}
