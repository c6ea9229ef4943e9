use thiserror::Error;

/// Error for UserName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserNameError {
    #[error("User name too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("User name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "User name contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password acceptance policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters")]
    TooShort { min: usize },

    #[error("Password must contain a lowercase letter")]
    MissingLowercase,

    #[error("Password must contain an uppercase letter")]
    MissingUppercase,

    #[error("Password must contain a digit")]
    MissingDigit,

    #[error("Password must contain one of the symbols @$!%*?&")]
    MissingSymbol,

    #[error("Password contains a character outside letters, digits and @$!%*?&")]
    ForbiddenCharacter,
}

/// Error for user/group directory operations
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User name already exists: {0}")]
    UserNameTaken(String),

    #[error("Email already exists: {0}")]
    EmailTaken(String),

    #[error("Group not found: {0}")]
    GroupNotFound(i64),

    #[error("Database error: {0}")]
    Database(String),
}
