use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

use crate::domain::user::errors::DirectoryError;

/// Error raised by a session store transition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session is unknown")]
    Unknown,

    #[error("Session was already consumed by rotation")]
    Consumed,

    #[error("Session is revoked")]
    Revoked,
}

/// Error for mail gateway operations
#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// Top-level error for the authentication flows
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    /// The presented refresh token maps to a revoked or unknown session.
    #[error("Session is revoked")]
    SessionRevoked,

    /// The presented refresh token was already consumed by rotation; the
    /// account's sessions have been revoked as containment.
    #[error("Refresh token reuse detected")]
    SessionReuse,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),
}
