//! Request and response records.
//!
//! Transport-agnostic shapes of the three calculation operations and of the
//! seed data endpoint, in the camelCase wire format. An outer service
//! (HTTP, CLI) deserialises a request, calls one of the `handle_*`
//! functions and serialises the response.

use captable_core::presets::{default_share_classes, default_transactions};
use captable_core::{CapTable, CapTableError, ExitAmount, ReferencePolicy, ShareClass, Transaction};
use serde::{Deserialize, Serialize};

use crate::engine::WaterfallEngine;
use crate::error::WaterfallError;
use crate::step::WaterfallStep;
use crate::summary::{SummaryEntry, WaterfallSummary};
use crate::sweep::{ExitDistributionSweep, SweepConfig};

/// Body of a detailed, summary or combined waterfall request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallRequest {
    /// Share class terms
    pub share_classes: Vec<ShareClass>,
    /// Issued shares
    pub transactions: Vec<Transaction>,
    /// Exit proceeds
    pub exit_amount: ExitAmount,
}

impl WaterfallRequest {
    /// Validates the records into a cap table.
    pub fn cap_table(&self, policy: ReferencePolicy) -> Result<CapTable, CapTableError> {
        CapTable::with_policy(self.share_classes.clone(), self.transactions.clone(), policy)
    }
}

/// Body of an exit distribution request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitDistributionRequest {
    /// Share class terms
    pub share_classes: Vec<ShareClass>,
    /// Issued shares
    pub transactions: Vec<Transaction>,
    /// Upper end of the exit grid
    pub max_exit_amount: ExitAmount,
    /// Number of grid intervals; falls back to the sweep configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_points: Option<usize>,
}

impl ExitDistributionRequest {
    /// Validates the records into a cap table.
    pub fn cap_table(&self, policy: ReferencePolicy) -> Result<CapTable, CapTableError> {
        CapTable::with_policy(self.share_classes.clone(), self.transactions.clone(), policy)
    }
}

/// Detailed steps and summary of one waterfall.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Step list
    pub detailed: Vec<WaterfallStep>,
    /// Per-class rollup
    pub summary: Vec<SummaryEntry>,
}

/// Seed cap table served to a fresh client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialData {
    /// Share class terms
    pub share_classes: Vec<ShareClass>,
    /// Issued shares
    pub transactions: Vec<Transaction>,
}

impl InitialData {
    /// The three-class demo cap table.
    pub fn defaults() -> Self {
        Self {
            share_classes: default_share_classes(),
            transactions: default_transactions(),
        }
    }
}

/// Detailed steps for a request.
pub fn handle_detailed(
    engine: &WaterfallEngine,
    request: &WaterfallRequest,
    policy: ReferencePolicy,
) -> Result<Vec<WaterfallStep>, WaterfallError> {
    let table = request.cap_table(policy)?;
    Ok(engine.compute_detailed(&table, request.exit_amount))
}

/// Summary entries for a request.
pub fn handle_summary(
    engine: &WaterfallEngine,
    request: &WaterfallRequest,
    policy: ReferencePolicy,
) -> Result<Vec<SummaryEntry>, WaterfallError> {
    let table = request.cap_table(policy)?;
    Ok(engine.compute_summary(&table, request.exit_amount).entries)
}

/// Detailed steps and summary for a request, from a single engine run.
pub fn handle_calculate(
    engine: &WaterfallEngine,
    request: &WaterfallRequest,
    policy: ReferencePolicy,
) -> Result<CalculationResponse, WaterfallError> {
    let table = request.cap_table(policy)?;
    let detailed = engine.compute_detailed(&table, request.exit_amount);
    let summary = WaterfallSummary::from_steps(&detailed, request.exit_amount.value()).entries;
    Ok(CalculationResponse { detailed, summary })
}

/// Exit distribution sweep for a request.
///
/// `num_points` from the request overrides `sweep.num_points`.
pub fn handle_exit_distribution(
    engine: &WaterfallEngine,
    request: &ExitDistributionRequest,
    sweep: &SweepConfig,
    policy: ReferencePolicy,
) -> Result<ExitDistributionSweep, WaterfallError> {
    let table = request.cap_table(policy)?;
    let config = SweepConfig {
        num_points: request.num_points.unwrap_or(sweep.num_points),
        ..*sweep
    };
    engine.compute_exit_distribution(&table, request.max_exit_amount, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DEFAULT_REQUEST: &str = r#"{
        "shareClasses": [
            {"id": 1, "name": "Series A", "type": "preferred", "seniority": 1,
             "liquidationPref": 1, "prefType": "participating", "cap": null},
            {"id": 2, "name": "Series B", "type": "preferred", "seniority": 2,
             "liquidationPref": 1.5, "prefType": "participating", "cap": 3},
            {"id": 3, "name": "Common", "type": "common", "seniority": 3,
             "liquidationPref": 1, "prefType": "non-participating", "cap": null}
        ],
        "transactions": [
            {"id": 1, "shareClass": "Series A", "shares": 1000000, "investment": 1000000},
            {"id": 2, "shareClass": "Series B", "shares": 2000000, "investment": 2000000},
            {"id": 3, "shareClass": "Common", "shares": 750000, "investment": 0}
        ],
        "exitAmount": 10000000
    }"#;

    #[test]
    fn test_calculate_response_shape() {
        let request: WaterfallRequest = serde_json::from_str(DEFAULT_REQUEST).unwrap();
        let response =
            handle_calculate(&WaterfallEngine::default(), &request, ReferencePolicy::Strict)
                .unwrap();

        assert_eq!(response.detailed.len(), 7);
        assert_eq!(response.summary.len(), 3);
        assert_relative_eq!(response.summary[0].payout, 2_600_000.0, epsilon = 1e-6);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json["detailed"].is_array());
        assert_eq!(json["summary"][0]["name"], "Series A");
        assert_eq!(json["summary"][0]["percentage"], 26.0);
    }

    #[test]
    fn test_negative_exit_rejected_at_boundary() {
        let body = DEFAULT_REQUEST.replace("\"exitAmount\": 10000000", "\"exitAmount\": -5");
        assert!(serde_json::from_str::<WaterfallRequest>(&body).is_err());
    }

    #[test]
    fn test_unknown_class_reference_surfaces() {
        let mut request: WaterfallRequest = serde_json::from_str(DEFAULT_REQUEST).unwrap();
        request.transactions[2].share_class = "Ordinary".to_string();

        let err = handle_summary(&WaterfallEngine::default(), &request, ReferencePolicy::Strict)
            .unwrap_err();
        assert!(matches!(
            err,
            WaterfallError::CapTable(CapTableError::UnknownShareClassReference { .. })
        ));

        let entries =
            handle_summary(&WaterfallEngine::default(), &request, ReferencePolicy::Lenient)
                .unwrap();
        assert!(entries.iter().all(|e| e.name != "Ordinary"));
    }

    #[test]
    fn test_exit_distribution_falls_back_to_config_points() {
        let initial = InitialData::defaults();
        let request = ExitDistributionRequest {
            share_classes: initial.share_classes,
            transactions: initial.transactions,
            max_exit_amount: ExitAmount::new(20_000_000.0).unwrap(),
            num_points: None,
        };
        let sweep = handle_exit_distribution(
            &WaterfallEngine::default(),
            &request,
            &SweepConfig::with_points(5),
            ReferencePolicy::Strict,
        )
        .unwrap();
        assert_eq!(sweep.len(), 6);
    }

    #[test]
    fn test_initial_data_wire_names() {
        let json = serde_json::to_value(InitialData::defaults()).unwrap();
        assert_eq!(json["shareClasses"][1]["liquidationPref"], 1.5);
        assert_eq!(json["transactions"][2]["shareClass"], "Common");
    }
}
