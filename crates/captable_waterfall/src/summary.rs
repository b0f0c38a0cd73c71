//! Per-class payout summary.
//!
//! Folds a detailed waterfall into one entry per recipient, with the payout
//! split into the bucket each step came from.

use std::collections::HashMap;

use captable_core::money::round_percentage;
use captable_core::{CapTable, ExitAmount};
use serde::{Deserialize, Serialize};

use crate::engine::WaterfallEngine;
use crate::step::{StepKind, WaterfallStep, RETAINED_BY_COMPANY};

/// Payout of one recipient split by distribution bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PayoutComponents {
    /// Phase 1 preference recovery
    #[serde(rename = "Liquidation Preference")]
    pub liquidation_preference: f64,
    /// Phase 2 participation of preferred classes
    #[serde(rename = "Participation")]
    pub participation: f64,
    /// Phase 2 pro-rata share of common classes
    #[serde(rename = "Common Distribution")]
    pub common_distribution: f64,
    /// Phase 3 residual split
    #[serde(rename = "Additional Distribution")]
    pub additional_distribution: f64,
    /// Proceeds kept by the company
    #[serde(rename = "Retained")]
    pub retained: f64,
}

impl PayoutComponents {
    /// Adds `amount` to the bucket for `kind`.
    pub fn add(&mut self, kind: StepKind, amount: f64) {
        match kind {
            StepKind::Starting => {}
            StepKind::LiquidationPreference => self.liquidation_preference += amount,
            StepKind::Participation => self.participation += amount,
            StepKind::CommonDistribution => self.common_distribution += amount,
            StepKind::AdditionalDistribution => self.additional_distribution += amount,
            StepKind::Retained => self.retained += amount,
        }
    }

    /// Amount held in the bucket for `kind`.
    pub fn get(&self, kind: StepKind) -> f64 {
        match kind {
            StepKind::Starting => 0.0,
            StepKind::LiquidationPreference => self.liquidation_preference,
            StepKind::Participation => self.participation,
            StepKind::CommonDistribution => self.common_distribution,
            StepKind::AdditionalDistribution => self.additional_distribution,
            StepKind::Retained => self.retained,
        }
    }

    /// Sum over all buckets.
    pub fn total(&self) -> f64 {
        self.liquidation_preference
            + self.participation
            + self.common_distribution
            + self.additional_distribution
            + self.retained
    }
}

/// Aggregated payout of one share class (or of the company).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    /// Share class name, or [`RETAINED_BY_COMPANY`]
    pub name: String,
    /// Total received
    pub payout: f64,
    /// Share of the exit amount, in percent, rounded to two decimals
    pub percentage: f64,
    /// Payout by bucket
    pub components: PayoutComponents,
}

impl SummaryEntry {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            payout: 0.0,
            percentage: 0.0,
            components: PayoutComponents::default(),
        }
    }

    /// Returns true for the company's retained pseudo-entry.
    pub fn is_retained(&self) -> bool {
        self.name == RETAINED_BY_COMPANY && self.components.retained > 0.0
    }
}

/// Summary of a waterfall at one exit amount.
///
/// Entries are ordered by first payout, with the retained entry last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallSummary {
    /// Exit amount the summary was computed for
    pub exit_amount: f64,
    /// One entry per recipient
    pub entries: Vec<SummaryEntry>,
}

impl WaterfallSummary {
    /// Folds detailed steps into per-recipient entries.
    pub fn from_steps(steps: &[WaterfallStep], exit_amount: f64) -> Self {
        let mut entries: Vec<SummaryEntry> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut retained: Option<SummaryEntry> = None;

        for step in steps.iter().filter(|s| !s.is_starting) {
            let amount = step.payout();
            let entry = if step.is_retained {
                retained.get_or_insert_with(|| SummaryEntry::new(RETAINED_BY_COMPANY))
            } else if let Some(name) = step.share_class.as_deref() {
                let pos = *index.entry(name.to_string()).or_insert_with(|| {
                    entries.push(SummaryEntry::new(name));
                    entries.len() - 1
                });
                &mut entries[pos]
            } else {
                continue;
            };
            entry.payout += amount;
            entry.components.add(step.kind, amount);
        }

        entries.extend(retained);
        for entry in &mut entries {
            entry.percentage = round_percentage(entry.payout, exit_amount);
        }

        Self {
            exit_amount,
            entries,
        }
    }

    /// Entry for `name`, if it received anything.
    pub fn entry(&self, name: &str) -> Option<&SummaryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Payout of `name`; zero if it received nothing.
    pub fn payout_for(&self, name: &str) -> f64 {
        self.entry(name).map(|e| e.payout).unwrap_or(0.0)
    }

    /// Amount retained by the company.
    pub fn retained(&self) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.is_retained())
            .fold(0.0, |acc, e| acc + e.payout)
    }

    /// Sum of all payouts, retained included.
    pub fn total_payout(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, e| acc + e.payout)
    }

    /// Sum of rounded percentages; within rounding of 100 for a positive exit.
    pub fn total_percentage(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, e| acc + e.percentage)
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = &SummaryEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WaterfallEngine {
    /// Computes the detailed waterfall and folds it into a summary.
    pub fn compute_summary(&self, table: &CapTable, exit: ExitAmount) -> WaterfallSummary {
        let steps = self.compute_detailed(table, exit);
        WaterfallSummary::from_steps(&steps, exit.value())
    }
}

/// Runs the default engine and summarises the result.
pub fn compute_summary_waterfall(table: &CapTable, exit: ExitAmount) -> WaterfallSummary {
    WaterfallEngine::default().compute_summary(table, exit)
}
