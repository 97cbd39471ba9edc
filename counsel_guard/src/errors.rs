use thiserror::Error;

use crate::credential::CredentialError;
use crate::utils::UtilError;

#[derive(Debug, Error)]
pub enum GuardError {
    /// The credential could not be decoded or has expired
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Account is blocked")]
    Blocked,

    #[error("Unknown role")]
    UnknownRole,

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
