//! Engine error types.

use captable_core::CapTableError;
use thiserror::Error;

/// Errors raised by the waterfall, sweep and round-modelling operations.
///
/// The allocation itself cannot fail once it holds a validated `CapTable`
/// and `ExitAmount`; these errors come from input validation and from
/// parameters outside the cap table (grid size, round terms).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WaterfallError {
    /// Share class or transaction records failed validation.
    #[error("Cap table error: {0}")]
    CapTable(#[from] CapTableError),

    /// Sweep parameters are unusable.
    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),

    /// Round terms are unusable.
    #[error("Invalid round: {0}")]
    InvalidRound(String),
}
