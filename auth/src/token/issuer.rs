use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use super::claims::InvitePayload;
use super::claims::MailIdentityPayload;
use super::claims::RefreshPayload;
use super::claims::TokenIdentity;
use super::claims::TokenPayload;
use super::codec::SignedToken;
use super::codec::TokenCodec;
use super::errors::TokenError;

const ACCESS_TTL_MINUTES: i64 = 15;
const REFRESH_TTL_DAYS: i64 = 7;
const EMAIL_VERIFY_TTL_HOURS: i64 = 24;
const PASSWORD_RESET_TTL_HOURS: i64 = 2;
const INVITE_TTL_DAYS: i64 = 7;

/// Lifetime of refresh tokens, exposed so session retention can match it.
pub fn refresh_ttl() -> Duration {
    Duration::days(REFRESH_TTL_DAYS)
}

/// Builds the payload for each token kind and signs it with the kind's
/// fixed lifetime.
///
/// Pure composition over [`TokenCodec`]; no side effects.
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Issue a short-lived access token embedding the identity snapshot.
    pub fn access(&self, identity: TokenIdentity) -> Result<SignedToken, TokenError> {
        self.codec.sign(
            TokenPayload::Access { identity },
            Duration::minutes(ACCESS_TTL_MINUTES),
        )
    }

    /// Issue a refresh token bound to one session entry.
    pub fn refresh(&self, user_id: i64, session_id: Uuid) -> Result<SignedToken, TokenError> {
        self.codec.sign(
            TokenPayload::Refresh(RefreshPayload {
                user_id,
                session_id,
            }),
            Duration::days(REFRESH_TTL_DAYS),
        )
    }

    /// Issue an email-verification token for embedding in a callback URL.
    pub fn email_verify(
        &self,
        user_id: i64,
        user_name: String,
    ) -> Result<SignedToken, TokenError> {
        self.codec.sign(
            TokenPayload::EmailVerify(MailIdentityPayload { user_id, user_name }),
            Duration::hours(EMAIL_VERIFY_TTL_HOURS),
        )
    }

    /// Issue a password-reset token for embedding in a callback URL.
    pub fn password_reset(
        &self,
        user_id: i64,
        user_name: String,
    ) -> Result<SignedToken, TokenError> {
        self.codec.sign(
            TokenPayload::PasswordReset(MailIdentityPayload { user_id, user_name }),
            Duration::hours(PASSWORD_RESET_TTL_HOURS),
        )
    }

    /// Issue a puzzle-invitation token.
    pub fn invite(&self, puzzle_id: i64, mail_id: i64) -> Result<SignedToken, TokenError> {
        self.codec.sign(
            TokenPayload::Invite(InvitePayload { puzzle_id, mail_id }),
            Duration::days(INVITE_TTL_DAYS),
        )
    }
}
