use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error")]
    Config(#[from] checkout_operations::ConfigError),

    #[error("failed to start async runtime")]
    Runtime(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
