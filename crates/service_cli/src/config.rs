//! CLI configuration.
//!
//! Settings are resolved from, lowest to highest priority:
//! 1. Built-in defaults
//! 2. A TOML config file (`--config`, or `waterfall.toml` when present)
//! 3. `WATERFALL_*` environment variables
//! 4. Command-line flags
//!
//! ```toml
//! log_level = "info"
//! default_format = "table"
//!
//! [engine]
//! seniority_order = "ascending"
//! participation_mode = "single-pass"
//! residual_tolerance = 0.01
//! reference_policy = "strict"
//!
//! [sweep]
//! num_points = 20
//! parallel_threshold = 64
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use captable_core::ReferencePolicy;
use captable_waterfall::config::DEFAULT_RESIDUAL_TOLERANCE;
use captable_waterfall::{
    EngineConfig, ParticipationMode, SeniorityOrder, SweepConfig, WaterfallEngine,
};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "waterfall.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: json, table, csv")]
    InvalidFormat(String),

    #[error("Invalid seniority order: {0}. Must be one of: ascending, descending")]
    InvalidSeniorityOrder(String),

    #[error("Invalid participation mode: {0}. Must be one of: single-pass, fixed-point")]
    InvalidParticipationMode(String),

    #[error("Invalid reference policy: {0}. Must be one of: strict, lenient")]
    InvalidReferencePolicy(String),

    #[error("Invalid residual tolerance: {0}. Must be finite and non-negative")]
    InvalidTolerance(f64),

    #[error("Invalid sweep settings: {0}")]
    InvalidSweep(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

impl OutputFormat {
    /// Get the name of this format.
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Parses a seniority order, case-insensitively.
pub fn parse_seniority_order(s: &str) -> Result<SeniorityOrder, ConfigError> {
    match s.to_lowercase().as_str() {
        "ascending" | "asc" => Ok(SeniorityOrder::Ascending),
        "descending" | "desc" => Ok(SeniorityOrder::Descending),
        _ => Err(ConfigError::InvalidSeniorityOrder(s.to_string())),
    }
}

/// Parses a participation mode, case-insensitively.
pub fn parse_participation_mode(s: &str) -> Result<ParticipationMode, ConfigError> {
    match s.to_lowercase().replace('_', "-").as_str() {
        "single-pass" => Ok(ParticipationMode::SinglePass),
        "fixed-point" => Ok(ParticipationMode::FixedPoint),
        _ => Err(ConfigError::InvalidParticipationMode(s.to_string())),
    }
}

/// Parses a reference policy, case-insensitively.
pub fn parse_reference_policy(s: &str) -> Result<ReferencePolicy, ConfigError> {
    match s.to_lowercase().as_str() {
        "strict" => Ok(ReferencePolicy::Strict),
        "lenient" => Ok(ReferencePolicy::Lenient),
        _ => Err(ConfigError::InvalidReferencePolicy(s.to_string())),
    }
}

fn via_parser<'de, D, T>(
    deserializer: D,
    parse: fn(&str) -> Result<T, ConfigError>,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(serde::de::Error::custom)
}

fn deserialize_log_level<'de, D: Deserializer<'de>>(d: D) -> Result<LogLevel, D::Error> {
    via_parser(d, LogLevel::from_str)
}

fn deserialize_format<'de, D: Deserializer<'de>>(d: D) -> Result<OutputFormat, D::Error> {
    via_parser(d, OutputFormat::from_str)
}

fn deserialize_order<'de, D: Deserializer<'de>>(d: D) -> Result<SeniorityOrder, D::Error> {
    via_parser(d, parse_seniority_order)
}

fn deserialize_mode<'de, D: Deserializer<'de>>(d: D) -> Result<ParticipationMode, D::Error> {
    via_parser(d, parse_participation_mode)
}

fn deserialize_policy<'de, D: Deserializer<'de>>(d: D) -> Result<ReferencePolicy, D::Error> {
    via_parser(d, parse_reference_policy)
}

/// `[engine]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    #[serde(deserialize_with = "deserialize_order")]
    pub seniority_order: SeniorityOrder,
    #[serde(deserialize_with = "deserialize_mode")]
    pub participation_mode: ParticipationMode,
    pub residual_tolerance: f64,
    #[serde(deserialize_with = "deserialize_policy")]
    pub reference_policy: ReferencePolicy,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            seniority_order: SeniorityOrder::Ascending,
            participation_mode: ParticipationMode::SinglePass,
            residual_tolerance: DEFAULT_RESIDUAL_TOLERANCE,
            reference_policy: ReferencePolicy::Strict,
        }
    }
}

/// Full CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaterfallConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Output format used when a command has no `--format`
    #[serde(deserialize_with = "deserialize_format")]
    pub default_format: OutputFormat,
    /// Engine settings
    pub engine: EngineSection,
    /// Sweep settings
    pub sweep: SweepConfig,
}

impl WaterfallConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Override fields from `WATERFALL_*` variables returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("WATERFALL_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&v)?;
        }
        if let Some(v) = lookup("WATERFALL_FORMAT") {
            self.default_format = OutputFormat::from_str(&v)?;
        }
        if let Some(v) = lookup("WATERFALL_SENIORITY_ORDER") {
            self.engine.seniority_order = parse_seniority_order(&v)?;
        }
        if let Some(v) = lookup("WATERFALL_PARTICIPATION_MODE") {
            self.engine.participation_mode = parse_participation_mode(&v)?;
        }
        if let Some(v) = lookup("WATERFALL_REFERENCE_POLICY") {
            self.engine.reference_policy = parse_reference_policy(&v)?;
        }
        if let Some(v) = lookup("WATERFALL_RESIDUAL_TOLERANCE") {
            self.engine.residual_tolerance = v.parse().map_err(|_| {
                ConfigError::EnvError(format!("WATERFALL_RESIDUAL_TOLERANCE: {}", v))
            })?;
        }
        if let Some(v) = lookup("WATERFALL_SWEEP_POINTS") {
            self.sweep.num_points = v
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("WATERFALL_SWEEP_POINTS: {}", v)))?;
        }
        if let Some(v) = lookup("WATERFALL_PARALLEL_THRESHOLD") {
            self.sweep.parallel_threshold = v.parse().map_err(|_| {
                ConfigError::EnvError(format!("WATERFALL_PARALLEL_THRESHOLD: {}", v))
            })?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if cli.verbose && self.log_level != LogLevel::Trace {
            self.log_level = LogLevel::Debug;
        }
        if let Some(order) = &cli.seniority_order {
            self.engine.seniority_order = parse_seniority_order(order)?;
        }
        if let Some(mode) = &cli.participation_mode {
            self.engine.participation_mode = parse_participation_mode(mode)?;
        }
        if let Some(policy) = &cli.reference_policy {
            self.engine.reference_policy = parse_reference_policy(policy)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.engine.residual_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if self.sweep.num_points == 0 {
            return Err(ConfigError::InvalidSweep(
                "num_points must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Engine built from the `[engine]` section
    pub fn engine(&self) -> WaterfallEngine {
        WaterfallEngine::new(EngineConfig {
            seniority_order: self.engine.seniority_order,
            participation_mode: self.engine.participation_mode,
            residual_tolerance: self.engine.residual_tolerance,
        })
    }

    /// Reference policy for validating cap tables
    pub fn reference_policy(&self) -> ReferencePolicy {
        self.engine.reference_policy
    }
}

/// Global CLI arguments relevant to configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Shorthand for debug logging
    pub verbose: bool,
    /// Seniority order override
    pub seniority_order: Option<String>,
    /// Participation mode override
    pub participation_mode: Option<String>,
    /// Reference policy override
    pub reference_policy: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<WaterfallConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => WaterfallConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            WaterfallConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => WaterfallConfig::default(),
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = WaterfallConfig::default();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.default_format, OutputFormat::Table);
        assert_eq!(config.engine.seniority_order, SeniorityOrder::Ascending);
        assert_eq!(config.engine.participation_mode, ParticipationMode::SinglePass);
        assert_eq!(config.engine.residual_tolerance, 0.01);
        assert_eq!(config.reference_policy(), ReferencePolicy::Strict);
        assert_eq!(config.sweep.num_points, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_engine_option_parsing() {
        assert_eq!(parse_seniority_order("DESC").unwrap(), SeniorityOrder::Descending);
        assert_eq!(
            parse_participation_mode("fixed_point").unwrap(),
            ParticipationMode::FixedPoint
        );
        assert_eq!(parse_reference_policy("Lenient").unwrap(), ReferencePolicy::Lenient);
        assert!(matches!(
            parse_seniority_order("sideways"),
            Err(ConfigError::InvalidSeniorityOrder(_))
        ));
    }

    #[test]
    fn test_from_toml() {
        let config = WaterfallConfig::from_toml(
            r#"
            log_level = "debug"
            default_format = "json"

            [engine]
            participation_mode = "fixed-point"
            reference_policy = "lenient"

            [sweep]
            num_points = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.default_format, OutputFormat::Json);
        assert_eq!(config.engine.participation_mode, ParticipationMode::FixedPoint);
        assert_eq!(config.engine.seniority_order, SeniorityOrder::Ascending);
        assert_eq!(config.reference_policy(), ReferencePolicy::Lenient);
        assert_eq!(config.sweep.num_points, 50);
        assert_eq!(config.sweep.parallel_threshold, 64);
    }

    #[test]
    fn test_from_toml_rejects_unknown_value() {
        let result = WaterfallConfig::from_toml("[engine]\nseniority_order = \"random\"\n");
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = WaterfallConfig::from_toml("log_level = \"error\"").unwrap();
        config
            .apply_env(env(&[
                ("WATERFALL_LOG_LEVEL", "info"),
                ("WATERFALL_SENIORITY_ORDER", "descending"),
                ("WATERFALL_SWEEP_POINTS", "8"),
            ]))
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.engine.seniority_order, SeniorityOrder::Descending);
        assert_eq!(config.sweep.num_points, 8);
    }

    #[test]
    fn test_env_rejects_bad_number() {
        let mut config = WaterfallConfig::default();
        let result = config.apply_env(env(&[("WATERFALL_RESIDUAL_TOLERANCE", "lots")]));
        assert!(matches!(result, Err(ConfigError::EnvError(_))));
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = WaterfallConfig::default();
        config
            .apply_env(env(&[("WATERFALL_PARTICIPATION_MODE", "fixed-point")]))
            .unwrap();
        let cli = CliArgs {
            participation_mode: Some("single-pass".to_string()),
            verbose: true,
            ..CliArgs::default()
        };
        config.merge_with_cli(&cli).unwrap();
        assert_eq!(config.engine.participation_mode, ParticipationMode::SinglePass);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = WaterfallConfig::default();
        config.engine.residual_tolerance = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTolerance(_))));

        let mut config = WaterfallConfig::default();
        config.sweep.num_points = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSweep(_))));
    }

    #[test]
    fn test_engine_from_config() {
        let mut config = WaterfallConfig::default();
        config.engine.seniority_order = SeniorityOrder::Descending;
        let engine = config.engine();
        assert_eq!(engine.config().seniority_order, SeniorityOrder::Descending);
    }
}
