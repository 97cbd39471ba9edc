use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Base64 decoding failed: {0}")]
    Base64(#[from] UtilError),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Token expired")]
    TokenExpired,

    #[error("Token carries no recognized role")]
    UnknownRole,
}
