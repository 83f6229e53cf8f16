//! Error taxonomy for lock derivation
//!
//! Every failure is raised before any grid work begins: configuration
//! problems at construction, credential problems before the seed is hashed.
//! Nothing inside a running simulation can fail.

/// Errors produced while configuring or invoking the lock pipeline
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
    /// Grid dimensions, generation target or rule outside the supported envelope
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Credential parts rejected by the active credential policy
    #[error("Invalid input: {0}")]
    InvalidInputError(String),

    /// A configuration file could not be read or parsed
    #[error("Config file error: {0}")]
    ConfigFile(String),
}

impl LockError {
    pub fn config(msg: impl Into<String>) -> Self {
        LockError::ConfigurationError(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        LockError::InvalidInputError(msg.into())
    }
}
