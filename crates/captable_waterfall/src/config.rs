//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Direction in which seniority ranks are paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeniorityOrder {
    /// Lower seniority numbers are paid first
    #[default]
    Ascending,
    /// Higher seniority numbers are paid first
    Descending,
}

impl SeniorityOrder {
    /// Get the name of this ordering.
    pub fn name(&self) -> &'static str {
        match self {
            SeniorityOrder::Ascending => "ascending",
            SeniorityOrder::Descending => "descending",
        }
    }
}

/// How the participation phase treats capped classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipationMode {
    /// One pass in seniority order; each award is a share of what is left,
    /// so proceeds a capped class cannot absorb flow to later classes only.
    #[default]
    SinglePass,
    /// Repeats the pro-rata split among uncapped classes until the pool is
    /// exhausted or every eligible class is capped.
    FixedPoint,
}

impl ParticipationMode {
    /// Get the name of this mode.
    pub fn name(&self) -> &'static str {
        match self {
            ParticipationMode::SinglePass => "single-pass",
            ParticipationMode::FixedPoint => "fixed-point",
        }
    }
}

/// Default residual threshold, in dollars.
pub const DEFAULT_RESIDUAL_TOLERANCE: f64 = 0.01;

/// Waterfall engine settings.
///
/// # Examples
/// ```
/// use captable_waterfall::{EngineConfig, ParticipationMode, SeniorityOrder};
///
/// let config = EngineConfig::default();
/// assert_eq!(config.seniority_order, SeniorityOrder::Ascending);
/// assert_eq!(config.participation_mode, ParticipationMode::SinglePass);
/// assert_eq!(config.residual_tolerance, 0.01);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Payment order across seniority ranks
    pub seniority_order: SeniorityOrder,
    /// Participation phase behaviour
    pub participation_mode: ParticipationMode,
    /// Remainders at or below this amount are retained rather than split
    /// among common classes
    pub residual_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seniority_order: SeniorityOrder::Ascending,
            participation_mode: ParticipationMode::SinglePass,
            residual_tolerance: DEFAULT_RESIDUAL_TOLERANCE,
        }
    }
}

impl EngineConfig {
    /// Sets the seniority order.
    pub fn with_seniority_order(mut self, order: SeniorityOrder) -> Self {
        self.seniority_order = order;
        self
    }

    /// Sets the participation mode.
    pub fn with_participation_mode(mut self, mode: ParticipationMode) -> Self {
        self.participation_mode = mode;
        self
    }

    /// Sets the residual tolerance.
    pub fn with_residual_tolerance(mut self, tolerance: f64) -> Self {
        self.residual_tolerance = tolerance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let config = EngineConfig::default()
            .with_seniority_order(SeniorityOrder::Descending)
            .with_participation_mode(ParticipationMode::FixedPoint)
            .with_residual_tolerance(0.5);
        assert_eq!(config.seniority_order.name(), "descending");
        assert_eq!(config.participation_mode.name(), "fixed-point");
        assert_eq!(config.residual_tolerance, 0.5);
    }

    #[test]
    fn test_partial_deserialise_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"participation_mode": "fixed-point"}"#).unwrap();
        assert_eq!(config.participation_mode, ParticipationMode::FixedPoint);
        assert_eq!(config.seniority_order, SeniorityOrder::Ascending);
        assert_eq!(config.residual_tolerance, DEFAULT_RESIDUAL_TOLERANCE);
    }
}
