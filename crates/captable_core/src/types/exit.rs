//! Validated exit proceeds.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::CapTableError;

/// Total proceeds of an exit event, guaranteed finite and non-negative.
///
/// The engine does not re-check its exit amount; constructing an
/// `ExitAmount` is where negative or non-numeric proceeds are rejected.
///
/// # Examples
/// ```
/// use captable_core::ExitAmount;
///
/// let exit = ExitAmount::new(10_000_000.0).unwrap();
/// assert_eq!(exit.value(), 10_000_000.0);
///
/// assert!(ExitAmount::new(-1.0).is_err());
/// assert!(ExitAmount::new(f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct ExitAmount(f64);

impl ExitAmount {
    /// Zero proceeds.
    pub const ZERO: ExitAmount = ExitAmount(0.0);

    /// Creates a validated exit amount.
    pub fn new(value: f64) -> Result<Self, CapTableError> {
        CapTableError::ensure_non_negative("exitAmount", value, || "exit amount".to_string())
            .map(Self)
    }

    /// Returns the amount in dollars.
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ExitAmount {
    type Error = CapTableError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for ExitAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        ExitAmount::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ExitAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
