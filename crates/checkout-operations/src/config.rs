use std::path::Path;

use checkout_saga::RetryPolicy;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{OperationKind, SuccessRate};

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawCheckoutConfig {
    success_rate: Option<f64>,
    #[serde(default)]
    retry: IndexMap<String, RawRetryPolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawRetryPolicy {
    max_attempts: Option<u32>,
    delay_ms: Option<u64>,
}

/// Settings for a checkout run.
///
/// Every operation always has a retry policy: values missing from the file
/// fall back to [`OperationKind::default_retry_policy`].
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    success_rate: SuccessRate,
    retry_policies: IndexMap<OperationKind, RetryPolicy>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            success_rate: SuccessRate::default(),
            retry_policies: OperationKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.default_retry_policy()))
                .collect(),
        }
    }
}

impl CheckoutConfig {
    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read,
    /// `ConfigError::Parse` if it is not valid TOML for this schema, and the
    /// validation errors of [`CheckoutConfig::parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let raw: RawCheckoutConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_raw(raw)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Toml` for malformed input,
    /// `ConfigError::UnknownOperation` for retry sections naming no known
    /// operation, `ConfigError::InvalidPolicy` for zero attempts, and
    /// `ConfigError::SuccessRate` for rates outside `0.0..=1.0`.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawCheckoutConfig = toml::from_str(content)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawCheckoutConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(rate) = raw.success_rate {
            config.success_rate = SuccessRate::new(rate)?;
        }

        for (name, overrides) in raw.retry {
            let operation: OperationKind = name.parse()?;
            let defaults = operation.default_retry_policy();

            let max_attempts = overrides
                .max_attempts
                .unwrap_or_else(|| defaults.max_attempts());
            let delay_ms = overrides.delay_ms.unwrap_or_else(|| {
                u64::try_from(defaults.delay().as_millis()).unwrap_or(u64::MAX)
            });

            let policy = RetryPolicy::try_new(max_attempts, delay_ms)
                .map_err(|source| ConfigError::InvalidPolicy { operation, source })?;
            config.retry_policies.insert(operation, policy);
        }

        Ok(config)
    }

    #[must_use]
    pub fn success_rate(&self) -> SuccessRate {
        self.success_rate
    }

    #[must_use]
    pub fn retry_policy(&self, operation: OperationKind) -> RetryPolicy {
        self.retry_policies
            .get(&operation)
            .copied()
            .unwrap_or_else(|| operation.default_retry_policy())
    }

    /// Effective policies in commit order.
    pub fn retry_policies(&self) -> impl Iterator<Item = (OperationKind, RetryPolicy)> + '_ {
        OperationKind::ALL
            .into_iter()
            .map(|operation| (operation, self.retry_policy(operation)))
    }

    #[must_use]
    pub fn with_success_rate(mut self, success_rate: SuccessRate) -> Self {
        self.success_rate = success_rate;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, operation: OperationKind, policy: RetryPolicy) -> Self {
        self.retry_policies.insert(operation, policy);
        self
    }
}
