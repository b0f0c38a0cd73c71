//! Share class terms.
//!
//! A share class describes the contractual rights attached to a block of
//! equity: whether it is preferred or common, where it ranks, the multiple
//! of investment it recovers first, whether it also participates pro rata,
//! and an optional ceiling on its total receipts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::CapTableError;
use super::ids::ShareClassId;

/// Equity class category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareClassType {
    /// Preferred stock with a liquidation preference
    Preferred,
    /// Common stock
    Common,
}

impl ShareClassType {
    /// Returns the wire name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            ShareClassType::Preferred => "preferred",
            ShareClassType::Common => "common",
        }
    }
}

impl fmt::Display for ShareClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Participation right of a preferred class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreferenceType {
    /// Receives the preference and then shares pro rata in the remainder
    Participating,
    /// Receives the preference only
    #[default]
    NonParticipating,
}

impl PreferenceType {
    /// Returns the wire name of this preference type.
    pub fn name(&self) -> &'static str {
        match self {
            PreferenceType::Participating => "participating",
            PreferenceType::NonParticipating => "non-participating",
        }
    }
}

impl fmt::Display for PreferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_liquidation_pref() -> f64 {
    1.0
}

/// Terms of one equity share class.
///
/// Fields follow the wire shape `{id, name, type, seniority, liquidationPref,
/// prefType, cap}`. Preference, participation and cap only have meaning for
/// preferred classes; they are carried on common classes but ignored.
///
/// # Examples
/// ```
/// use captable_core::{ShareClass, PreferenceType};
///
/// let series_b = ShareClass::preferred(2, "Series B", 2, 1.5, PreferenceType::Participating)
///     .with_cap(3.0);
/// assert!(series_b.is_participating_preferred());
/// assert_eq!(series_b.effective_cap(), Some(3.0));
///
/// let common = ShareClass::common(3, "Common", 3);
/// assert!(common.participates_pro_rata());
/// assert_eq!(common.effective_cap(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareClass {
    /// Unique identifier
    pub id: ShareClassId,
    /// Unique name, used by transactions to reference this class
    pub name: String,
    /// Preferred or common
    #[serde(rename = "type")]
    pub class_type: ShareClassType,
    /// Priority rank; under the default ordering lower numbers are paid first
    pub seniority: i64,
    /// Preference multiple applied to total investment
    #[serde(default = "default_liquidation_pref")]
    pub liquidation_pref: f64,
    /// Participation right
    #[serde(default)]
    pub pref_type: PreferenceType,
    /// Optional ceiling on total receipts, as a multiple of investment
    #[serde(default)]
    pub cap: Option<f64>,
}

impl ShareClass {
    /// Creates a preferred class without a cap.
    pub fn preferred(
        id: u64,
        name: impl Into<String>,
        seniority: i64,
        liquidation_pref: f64,
        pref_type: PreferenceType,
    ) -> Self {
        Self {
            id: ShareClassId::new(id),
            name: name.into(),
            class_type: ShareClassType::Preferred,
            seniority,
            liquidation_pref,
            pref_type,
            cap: None,
        }
    }

    /// Creates a common class.
    pub fn common(id: u64, name: impl Into<String>, seniority: i64) -> Self {
        Self {
            id: ShareClassId::new(id),
            name: name.into(),
            class_type: ShareClassType::Common,
            seniority,
            liquidation_pref: 1.0,
            pref_type: PreferenceType::NonParticipating,
            cap: None,
        }
    }

    /// Sets the participation cap multiple.
    pub fn with_cap(mut self, cap: f64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Returns true for preferred classes.
    #[inline]
    pub fn is_preferred(&self) -> bool {
        self.class_type == ShareClassType::Preferred
    }

    /// Returns true for common classes.
    #[inline]
    pub fn is_common(&self) -> bool {
        self.class_type == ShareClassType::Common
    }

    /// Returns true for preferred classes with a participation right.
    #[inline]
    pub fn is_participating_preferred(&self) -> bool {
        self.is_preferred() && self.pref_type == PreferenceType::Participating
    }

    /// Returns true if the class shares in the pro-rata participation phase.
    ///
    /// Common classes always participate; preferred classes only when
    /// participating.
    #[inline]
    pub fn participates_pro_rata(&self) -> bool {
        self.is_common() || self.is_participating_preferred()
    }

    /// Returns the cap multiple that actually binds, if any.
    ///
    /// Only participating preferred classes can be capped. A cap of zero
    /// means "no cap".
    pub fn effective_cap(&self) -> Option<f64> {
        if !self.is_participating_preferred() {
            return None;
        }
        self.cap.filter(|&cap| cap > 0.0)
    }

    /// Validates names and multiples.
    pub fn validate(&self) -> Result<(), CapTableError> {
        if self.name.trim().is_empty() {
            return Err(CapTableError::EmptyShareClassName(self.id));
        }
        let context = || format!("share class {}", self.name);
        CapTableError::ensure_non_negative("liquidationPref", self.liquidation_pref, context)?;
        if let Some(cap) = self.cap {
            CapTableError::ensure_non_negative("cap", cap, context)?;
        }
        Ok(())
    }
}
