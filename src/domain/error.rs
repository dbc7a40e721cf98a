use thiserror::Error;

/// Errors produced by the authentication subsystem
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token is not a three-segment compact string or its payload is
    /// not decodable
    #[error("Malformed authentication token")]
    TokenMalformed,

    /// Token signature does not match the recomputed HMAC
    #[error("Invalid authentication token")]
    TokenInvalid,

    /// Token expiry is not strictly in the future
    #[error("Authentication token has expired")]
    TokenExpired,

    /// Credential failure; identical for unknown email and wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account is temporarily locked after repeated login failures
    #[error("Account is temporarily locked. Try again later")]
    AccountLocked,

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AuthError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP-equivalent status for the calling layer.
    ///
    /// All token failures collapse into the same unauthorized outcome as
    /// a plain credential mismatch; the distinct variants exist for
    /// logging and tests only.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::TokenMalformed
            | Self::TokenInvalid
            | Self::TokenExpired
            | Self::InvalidCredentials => 401,
            Self::AccountLocked => 423,
            Self::Conflict { .. } => 409,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Validation { .. } => 400,
            Self::Configuration { .. } | Self::Storage { .. } | Self::Internal { .. } => 500,
        }
    }
}
