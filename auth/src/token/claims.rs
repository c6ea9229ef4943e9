use std::fmt;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::TokenError;

/// Purpose tag distinguishing the token families.
///
/// Every kind carries its own payload shape and lifetime; anything that
/// branches on the kind matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
    EmailVerify,
    PasswordReset,
    Invite,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::EmailVerify => "email_verify",
            TokenKind::PasswordReset => "password_reset",
            TokenKind::Invite => "invite",
        };
        write!(f, "{}", name)
    }
}

/// Subset of the account identity embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIdentity {
    pub id: i64,
    pub user_name: String,
    pub group_id: i64,
}

/// Payload of a refresh token: the account it belongs to and the session
/// entry the token is one-to-one with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshPayload {
    pub user_id: i64,
    pub session_id: Uuid,
}

/// Payload shared by the email-verification and password-reset kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailIdentityPayload {
    pub user_id: i64,
    pub user_name: String,
}

/// Payload of a puzzle invitation, not tied to any identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitePayload {
    pub puzzle_id: i64,
    pub mail_id: i64,
}

/// Kind-tagged token payload.
///
/// The tag is serialized inside the signed document, so the kind is
/// covered by the signature and cannot be swapped after issuance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenPayload {
    Access { identity: TokenIdentity },
    Refresh(RefreshPayload),
    EmailVerify(MailIdentityPayload),
    PasswordReset(MailIdentityPayload),
    Invite(InvitePayload),
}

impl TokenPayload {
    /// The kind tag carried by this payload.
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenPayload::Access { .. } => TokenKind::Access,
            TokenPayload::Refresh(_) => TokenKind::Refresh,
            TokenPayload::EmailVerify(_) => TokenKind::EmailVerify,
            TokenPayload::PasswordReset(_) => TokenKind::PasswordReset,
            TokenPayload::Invite(_) => TokenKind::Invite,
        }
    }
}

/// The signed token document: issuance and expiry stamps plus the
/// kind-tagged payload, flattened into one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    #[serde(flatten)]
    pub payload: TokenPayload,
}

impl Claims {
    /// Stamp a payload with `iat = now` and `exp = now + ttl`.
    pub fn new(payload: TokenPayload, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            payload,
        }
    }

    /// The kind of the carried payload.
    pub fn kind(&self) -> TokenKind {
        self.payload.kind()
    }

    /// Extract the access payload.
    ///
    /// # Errors
    /// * `WrongKind` - The token carries a different kind
    pub fn into_access(self) -> Result<TokenIdentity, TokenError> {
        match self.payload {
            TokenPayload::Access { identity } => Ok(identity),
            other => Err(wrong_kind(TokenKind::Access, &other)),
        }
    }

    /// Extract the refresh payload.
    ///
    /// # Errors
    /// * `WrongKind` - The token carries a different kind
    pub fn into_refresh(self) -> Result<RefreshPayload, TokenError> {
        match self.payload {
            TokenPayload::Refresh(payload) => Ok(payload),
            other => Err(wrong_kind(TokenKind::Refresh, &other)),
        }
    }

    /// Extract the email-verification payload.
    ///
    /// # Errors
    /// * `WrongKind` - The token carries a different kind
    pub fn into_email_verify(self) -> Result<MailIdentityPayload, TokenError> {
        match self.payload {
            TokenPayload::EmailVerify(payload) => Ok(payload),
            other => Err(wrong_kind(TokenKind::EmailVerify, &other)),
        }
    }

    /// Extract the password-reset payload.
    ///
    /// # Errors
    /// * `WrongKind` - The token carries a different kind
    pub fn into_password_reset(self) -> Result<MailIdentityPayload, TokenError> {
        match self.payload {
            TokenPayload::PasswordReset(payload) => Ok(payload),
            other => Err(wrong_kind(TokenKind::PasswordReset, &other)),
        }
    }

    /// Extract the invite payload.
    ///
    /// # Errors
    /// * `WrongKind` - The token carries a different kind
    pub fn into_invite(self) -> Result<InvitePayload, TokenError> {
        match self.payload {
            TokenPayload::Invite(payload) => Ok(payload),
            other => Err(wrong_kind(TokenKind::Invite, &other)),
        }
    }
}

fn wrong_kind(expected: TokenKind, actual: &TokenPayload) -> TokenError {
    TokenError::WrongKind {
        expected,
        actual: actual.kind(),
    }
}
