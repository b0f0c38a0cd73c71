//! Exit-value sweep.
//!
//! Evaluates the summary waterfall at evenly spaced exit values from zero to
//! a maximum, producing one row of class payouts per point. Points are
//! independent, so large grids are evaluated in parallel with Rayon; the
//! output is always in ascending exit-value order.

use captable_core::presets::DEFAULT_SWEEP_POINTS;
use captable_core::{CapTable, ExitAmount};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::WaterfallEngine;
use crate::error::WaterfallError;

/// Default grid size above which points are evaluated in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Sweep settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Number of intervals; the grid has `num_points + 1` values
    pub num_points: usize,
    /// Minimum number of grid values before parallel evaluation is used
    pub parallel_threshold: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            num_points: DEFAULT_SWEEP_POINTS,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SweepConfig {
    /// Creates a config with the given number of intervals.
    pub fn with_points(num_points: usize) -> Self {
        Self {
            num_points,
            ..Self::default()
        }
    }

    /// Sets the parallel threshold.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Whether a grid of `len` values should be evaluated in parallel.
    #[inline]
    pub fn should_parallelize(&self, len: usize) -> bool {
        len >= self.parallel_threshold
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<(), WaterfallError> {
        if self.num_points == 0 {
            return Err(WaterfallError::InvalidSweep(
                "numPoints must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Payouts per class across a grid of exit values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitDistributionSweep {
    /// Grid of exit values, ascending
    pub exit_values: Vec<f64>,
    /// Column names: active share classes in declaration order
    pub active_share_classes: Vec<String>,
    /// `distributions[i][j]` is the payout of class `j` at exit `i`
    pub distributions: Vec<Vec<f64>>,
    /// Amount retained by the company at each exit
    pub retained: Vec<f64>,
}

impl ExitDistributionSweep {
    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.exit_values.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.exit_values.is_empty()
    }

    /// Payout column of the class `name`.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.active_share_classes.iter().position(|n| n == name)?;
        Some(self.distributions.iter().map(|row| row[j]).collect())
    }

    /// Sum of row `i` including retained proceeds.
    pub fn row_total(&self, i: usize) -> f64 {
        self.distributions[i].iter().fold(self.retained[i], |acc, v| acc + v)
    }
}

/// `num_points + 1` evenly spaced values from zero to `max` inclusive.
///
/// # Examples
/// ```
/// use captable_waterfall::exit_grid;
///
/// assert_eq!(exit_grid(2_000_000.0, 2), vec![0.0, 1_000_000.0, 2_000_000.0]);
/// ```
pub fn exit_grid(max: f64, num_points: usize) -> Vec<f64> {
    if num_points == 0 {
        return vec![0.0];
    }
    let step = max / num_points as f64;
    (0..=num_points)
        .map(|i| if i == num_points { max } else { step * i as f64 })
        .collect()
}

impl WaterfallEngine {
    /// Sweeps exit values from zero to `max_exit`.
    ///
    /// # Errors
    ///
    /// `InvalidSweep` when `config.num_points` is zero.
    pub fn compute_exit_distribution(
        &self,
        table: &CapTable,
        max_exit: ExitAmount,
        config: &SweepConfig,
    ) -> Result<ExitDistributionSweep, WaterfallError> {
        config.validate()?;

        let exit_values = exit_grid(max_exit.value(), config.num_points);
        let active_share_classes: Vec<String> = table
            .active_share_classes()
            .map(|sc| sc.name.clone())
            .collect();

        let evaluate = |&value: &f64| -> Result<(Vec<f64>, f64), WaterfallError> {
            let summary = self.compute_summary(table, ExitAmount::new(value)?);
            let row = active_share_classes
                .iter()
                .map(|name| summary.payout_for(name))
                .collect();
            Ok((row, summary.retained()))
        };

        let parallel = config.should_parallelize(exit_values.len());
        debug!(
            points = exit_values.len(),
            classes = active_share_classes.len(),
            parallel,
            "computing exit distribution"
        );
        let rows: Vec<(Vec<f64>, f64)> = if parallel {
            exit_values.par_iter().map(evaluate).collect::<Result<_, _>>()?
        } else {
            exit_values.iter().map(evaluate).collect::<Result<_, _>>()?
        };

        let (distributions, retained) = rows.into_iter().unzip();
        Ok(ExitDistributionSweep {
            exit_values,
            active_share_classes,
            distributions,
            retained,
        })
    }
}

/// Runs the default engine over a sweep of `num_points` intervals.
pub fn compute_exit_distribution(
    table: &CapTable,
    max_exit: ExitAmount,
    num_points: usize,
) -> Result<ExitDistributionSweep, WaterfallError> {
    WaterfallEngine::default().compute_exit_distribution(
        table,
        max_exit,
        &SweepConfig::with_points(num_points),
    )
}
