//! Waterfall steps.
//!
//! Each step records one allocation: who was paid, how much, and how much of
//! the exit remained before the payment. The step list is the auditable
//! trace of a waterfall run; summaries and sweeps are folds over it.

use captable_core::money::format_currency;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pseudo-class name used for proceeds no class is entitled to.
pub const RETAINED_BY_COMPANY: &str = "Retained by Company";

/// Label of the starting step.
pub const TOTAL_EXIT_PROCEEDS: &str = "Total Exit Proceeds";

/// What kind of allocation a step records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    /// The total exit amount, before any payout
    Starting,
    /// Phase 1: a preferred class recovering its preference multiple
    LiquidationPreference,
    /// Phase 2: a participating preferred class sharing pro rata
    Participation,
    /// Phase 2: a common class sharing pro rata
    CommonDistribution,
    /// Phase 3: residual proceeds split among common classes
    AdditionalDistribution,
    /// Phase 3: residual proceeds no class can absorb
    Retained,
}

impl StepKind {
    /// Bucket name used in labels and summary components.
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Starting => TOTAL_EXIT_PROCEEDS,
            StepKind::LiquidationPreference => "Liquidation Preference",
            StepKind::Participation => "Participation",
            StepKind::CommonDistribution => "Common Distribution",
            StepKind::AdditionalDistribution => "Additional Distribution",
            StepKind::Retained => "Retained",
        }
    }

    /// Returns true for kinds that pay a share class.
    #[inline]
    pub fn is_class_payout(&self) -> bool {
        !matches!(self, StepKind::Starting | StepKind::Retained)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the detailed waterfall.
///
/// `value` is the full exit amount on the starting step and the negated
/// payout on every other step. `remaining_proceeds` is the amount left
/// *before* this step was applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallStep {
    /// Display label, e.g. `"Series A (Liquidation Preference)"`
    pub label: String,
    /// Allocation kind
    pub kind: StepKind,
    /// Exit amount (starting step) or negated payout
    pub value: f64,
    /// Proceeds remaining before this step
    pub remaining_proceeds: f64,
    /// Recipient class, absent on starting and retained steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_class: Option<String>,
    /// Human-readable explanation
    pub description: String,
    /// Set on the starting step only
    #[serde(default)]
    pub is_starting: bool,
    /// Set on the retained step only
    #[serde(default)]
    pub is_retained: bool,
}

impl WaterfallStep {
    /// The opening step carrying the full exit amount.
    pub fn starting(exit_amount: f64) -> Self {
        Self {
            label: TOTAL_EXIT_PROCEEDS.to_string(),
            kind: StepKind::Starting,
            value: exit_amount,
            remaining_proceeds: exit_amount,
            share_class: None,
            description: format!(
                "{} available for distribution",
                format_currency(exit_amount)
            ),
            is_starting: true,
            is_retained: false,
        }
    }

    /// A payment of `amount` to `class_name`.
    pub fn class_payout(kind: StepKind, class_name: &str, amount: f64, remaining: f64) -> Self {
        let description = match kind {
            StepKind::LiquidationPreference => format!(
                "{} receives liquidation preference of {}",
                class_name,
                format_currency(amount)
            ),
            StepKind::Participation => format!(
                "{} participates pro rata for {}",
                class_name,
                format_currency(amount)
            ),
            StepKind::CommonDistribution => format!(
                "{} receives pro-rata distribution of {}",
                class_name,
                format_currency(amount)
            ),
            _ => format!(
                "{} receives additional distribution of {}",
                class_name,
                format_currency(amount)
            ),
        };
        Self {
            label: format!("{} ({})", class_name, kind.name()),
            kind,
            value: -amount,
            remaining_proceeds: remaining,
            share_class: Some(class_name.to_string()),
            description,
            is_starting: false,
            is_retained: false,
        }
    }

    /// Proceeds left with the company.
    pub fn retained(amount: f64, remaining: f64) -> Self {
        Self {
            label: RETAINED_BY_COMPANY.to_string(),
            kind: StepKind::Retained,
            value: -amount,
            remaining_proceeds: remaining,
            share_class: None,
            description: format!(
                "{} is not claimed by any share class",
                format_currency(amount)
            ),
            is_starting: false,
            is_retained: true,
        }
    }

    /// Amount paid out by this step; zero for the starting step.
    #[inline]
    pub fn payout(&self) -> f64 {
        if self.is_starting {
            0.0
        } else {
            -self.value
        }
    }

    /// Name this step is summarised under, if any.
    pub fn recipient(&self) -> Option<&str> {
        if self.is_retained {
            Some(RETAINED_BY_COMPANY)
        } else {
            self.share_class.as_deref()
        }
    }
}
