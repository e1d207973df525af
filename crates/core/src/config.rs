//! Configuration structures for the trade direction engine.

use crate::error::{Error, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Main configuration for a classification run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classification parameters.
    pub classification: ClassificationConfig,
    /// Execution (parallelism) parameters.
    pub execution: ExecutionConfig,
}

impl Config {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        self.classification.validate()?;
        self.execution.validate()
    }
}

/// Trade classification parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Late-report lag (ms) subtracted from a trade's time before quote lookup.
    pub report_lag_ms: i64,
    /// Two prices closer than this are treated as equal.
    pub price_tolerance: f64,
}

impl ClassificationConfig {
    /// Late-report lag as a duration.
    pub fn report_lag(&self) -> Duration {
        Duration::milliseconds(self.report_lag_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.report_lag_ms < 0 {
            return Err(Error::config(format!(
                "report_lag_ms must be non-negative, got {}",
                self.report_lag_ms
            )));
        }
        if !self.price_tolerance.is_finite() || self.price_tolerance < 0.0 {
            return Err(Error::config(format!(
                "price_tolerance must be a non-negative finite number, got {}",
                self.price_tolerance
            )));
        }
        Ok(())
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            report_lag_ms: 5_000,
            price_tolerance: 1e-9,
        }
    }
}

/// Execution configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Number of partition workers (None = rayon global pool, 1 = sequential).
    pub workers: Option<usize>,
}

impl ExecutionConfig {
    fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(Error::config("workers must be at least 1 when set"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.classification.report_lag_ms, 5_000);
        assert_eq!(config.classification.report_lag(), Duration::seconds(5));
        assert!(config.execution.workers.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(r#"{"classification": {"report_lag_ms": 2000}}"#).unwrap();
        assert_eq!(config.classification.report_lag_ms, 2_000);
        assert_eq!(config.classification.price_tolerance, 1e-9);
    }

    #[test]
    fn test_invalid_lag_rejected() {
        let err = Config::from_json(r#"{"classification": {"report_lag_ms": -1}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = Config::default();
        config.execution.workers = Some(0);
        assert!(config.validate().is_err());
    }
}
