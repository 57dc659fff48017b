//! Prune run configuration.
//!
//! The run mode and retention count are per-invocation arguments, not config:
//! an operator has to state `--run yes|dry|fast` every time. This section only
//! holds settings that don't change which rows are removed.
//!
//! # Example
//!
//! ```toml
//! [prune]
//! batch_size = 100
//! on_error = "continue"
//! ```

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Prune settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PruneConfig {
    /// Target number of live records per trimming batch.
    /// Batching bounds memory and cursor lifetime; it does not change results.
    /// Default: 100
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// What to do when a record type fails with a database error.
    /// Default: continue
    #[serde(default)]
    pub on_error: FailurePolicy,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            on_error: FailurePolicy::default(),
        }
    }
}

fn default_batch_size() -> u32 {
    100
}

impl PruneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Validation(
                "prune.batch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Handling of a database error while pruning one record type.
///
/// Either way the run ends with an error and a non-zero exit status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report the failed type and move on to the next one.
    #[default]
    Continue,
    /// Stop the run at the first failed type.
    Abort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PruneConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.on_error, FailurePolicy::Continue);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config: PruneConfig = toml::from_str(
            r#"
            batch_size = 500
            on_error = "abort"
        "#,
        )
        .unwrap();
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.on_error, FailurePolicy::Abort);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config: PruneConfig = toml::from_str("batch_size = 0").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<PruneConfig, _> = toml::from_str("keep_versions = 3");
        assert!(result.is_err());
    }
}
