use std::fmt;
use std::str::FromStr;

use auth::TokenIdentity;

use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserNameError;

/// Snapshot of an account as read from the directory.
///
/// The source of truth lives in the user store; this subsystem only reads
/// it and embeds the relevant subset into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub user_name: String,
    pub group_id: i64,
    pub email: String,
    pub email_verified: bool,
}

impl Identity {
    /// The subset embedded in access tokens.
    pub fn token_identity(&self) -> TokenIdentity {
        TokenIdentity {
            id: self.id,
            user_name: self.user_name.clone(),
            group_id: self.group_id,
        }
    }
}

/// A group and the capability strings it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub roles: Vec<String>,
}

impl Group {
    /// Whether this group grants the given capability.
    pub fn has_role(&self, capability: &str) -> bool {
        self.roles.iter().any(|role| role == capability)
    }
}

/// Directory record used for credential checks.
///
/// The hash never crosses the HTTP boundary.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub identity: Identity,
    pub password_hash: String,
}

/// User name value type
///
/// Ensures user name is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid user name.
    ///
    /// Validates length and character constraints.
    ///
    /// # Arguments
    /// * `user_name` - Raw user name string
    ///
    /// # Returns
    /// Validated UserName value object
    ///
    /// # Errors
    /// * `TooShort` - User name shorter than 3 characters
    /// * `TooLong` - User name longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(user_name: String) -> Result<Self, UserNameError> {
        let user_name = Self::with_valid_length(user_name)?;
        let user_name = Self::with_valid_chars(user_name)?;
        Ok(Self(user_name))
    }

    fn with_valid_length(user_name: String) -> Result<String, UserNameError> {
        let length = user_name.len();
        if length < Self::MIN_LENGTH {
            Err(UserNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(user_name)
        }
    }

    fn with_valid_chars(user_name: String) -> Result<String, UserNameError> {
        if user_name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(user_name)
        } else {
            Err(UserNameError::InvalidCharacters)
        }
    }

    /// Get user name as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Accepted plaintext password.
///
/// Construction enforces the acceptance policy: at least 8 characters,
/// one lowercase, one uppercase, one digit, one symbol from the fixed set
/// @$!%*?&, and nothing outside letters, digits and that set.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const SYMBOLS: &'static str = "@$!%*?&";

    /// Validate a raw password against the acceptance policy.
    ///
    /// # Errors
    /// One `PasswordPolicyError` variant per violated rule.
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        if password.chars().count() < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PasswordPolicyError::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PasswordPolicyError::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }
        if !password.chars().any(|c| Self::SYMBOLS.contains(c)) {
            return Err(PasswordPolicyError::MissingSymbol);
        }
        if password
            .chars()
            .any(|c| !c.is_ascii_alphanumeric() && !Self::SYMBOLS.contains(c))
        {
            return Err(PasswordPolicyError::ForbiddenCharacter);
        }
        Ok(Self(password))
    }

    /// Get the plaintext for hashing.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never echo the plaintext through Debug output.
impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Command to register a new account with validated fields.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: UserName,
    pub email: EmailAddress,
    pub password: Password,
}

impl NewUser {
    /// Construct a new registration command.
    ///
    /// # Arguments
    /// * `user_name` - Validated user name
    /// * `email` - Validated email address
    /// * `password` - Policy-checked password (hashed by the service)
    pub fn new(user_name: UserName, email: EmailAddress, password: Password) -> Self {
        Self {
            user_name,
            email,
            password,
        }
    }
}
