use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("keyword must not be empty")]
    EmptyKeyword,
}

/// Errors raised while building [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
