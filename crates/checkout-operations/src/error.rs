use std::path::PathBuf;

use checkout_saga::PolicyError;
use thiserror::Error;

use crate::types::OperationKind;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("{operation} failed")]
    Failed { operation: OperationKind },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML parse error")]
    Toml(#[from] toml::de::Error),

    #[error("unknown operation '{name}' in retry configuration")]
    UnknownOperation { name: String },

    #[error("invalid retry policy for '{operation}'")]
    InvalidPolicy {
        operation: OperationKind,
        #[source]
        source: PolicyError,
    },

    #[error("unknown verdict '{verdict}', expected pass, fail or fail-to-end")]
    UnknownVerdict { verdict: String },

    #[error("success rate {rate} is outside 0.0..=1.0")]
    SuccessRate { rate: f64 },
}
