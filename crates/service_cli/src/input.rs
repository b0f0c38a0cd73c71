//! Request file loading.
//!
//! A request file is a JSON object in the engine's wire shape:
//!
//! ```json
//! {
//!   "shareClasses": [{"id": 1, "name": "Common", "type": "common", "seniority": 1}],
//!   "transactions": [{"id": 1, "shareClass": "Common", "shares": 1000}],
//!   "exitAmount": 1000000,
//!   "maxExitAmount": 2000000,
//!   "numPoints": 20
//! }
//! ```
//!
//! The amounts are optional; without a file the built-in demo cap table is
//! used.

use std::path::Path;

use captable_core::presets::{DEFAULT_EXIT_AMOUNT, DEFAULT_SWEEP_MULTIPLE};
use captable_core::{ExitAmount, ShareClass, Transaction};
use captable_waterfall::api::{ExitDistributionRequest, InitialData, WaterfallRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{CliError, Result};

/// Contents of a request file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFile {
    pub share_classes: Vec<ShareClass>,
    pub transactions: Vec<Transaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_amount: Option<ExitAmount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_exit_amount: Option<ExitAmount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_points: Option<usize>,
}

impl RequestFile {
    /// The demo cap table at the default exit amount.
    pub fn demo() -> Self {
        let data = InitialData::defaults();
        Self {
            share_classes: data.share_classes,
            transactions: data.transactions,
            exit_amount: Some(ExitAmount::new(DEFAULT_EXIT_AMOUNT).unwrap_or_default()),
            max_exit_amount: None,
            num_points: None,
        }
    }

    /// Reads a request file, or returns the demo request when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            info!("No input file given; using the demo cap table");
            return Ok(Self::demo());
        };
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let request: Self = serde_json::from_str(&content)?;
        debug!(
            path = %path.display(),
            share_classes = request.share_classes.len(),
            transactions = request.transactions.len(),
            "loaded request file"
        );
        Ok(request)
    }

    /// Exit amount from the flag, else the file, else the default.
    pub fn exit_amount(&self, flag: Option<f64>) -> Result<ExitAmount> {
        match flag {
            Some(value) => Ok(ExitAmount::new(value)?),
            None => Ok(self
                .exit_amount
                .unwrap_or(ExitAmount::new(DEFAULT_EXIT_AMOUNT)?)),
        }
    }

    /// Sweep maximum from the flag, else the file, else twice the exit amount.
    pub fn max_exit_amount(&self, flag: Option<f64>) -> Result<ExitAmount> {
        if let Some(value) = flag {
            return Ok(ExitAmount::new(value)?);
        }
        if let Some(max) = self.max_exit_amount {
            return Ok(max);
        }
        let exit = self.exit_amount(None)?;
        Ok(ExitAmount::new(exit.value() * DEFAULT_SWEEP_MULTIPLE)?)
    }

    /// Waterfall request at the resolved exit amount.
    pub fn waterfall_request(&self, exit_flag: Option<f64>) -> Result<WaterfallRequest> {
        Ok(WaterfallRequest {
            share_classes: self.share_classes.clone(),
            transactions: self.transactions.clone(),
            exit_amount: self.exit_amount(exit_flag)?,
        })
    }

    /// Sweep request with the resolved maximum; `points_flag` overrides the file.
    pub fn distribution_request(
        &self,
        max_flag: Option<f64>,
        points_flag: Option<usize>,
    ) -> Result<ExitDistributionRequest> {
        Ok(ExitDistributionRequest {
            share_classes: self.share_classes.clone(),
            transactions: self.transactions.clone(),
            max_exit_amount: self.max_exit_amount(max_flag)?,
            num_points: points_flag.or(self.num_points),
        })
    }
}
