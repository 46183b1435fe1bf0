use thiserror::Error;

use crate::vault::VaultError;

/// All errors that can occur in lpreport.
#[derive(Debug, Error)]
pub enum ReportError {
    // --- Vault errors ---
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("Unable to authenticate to backend.")]
    AuthenticationFailed,

    #[error("Shared folder '{0}' has no matching root folder in the vault")]
    UnknownSharedFolder(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for lpreport results.
pub type Result<T> = std::result::Result<T, ReportError>;
