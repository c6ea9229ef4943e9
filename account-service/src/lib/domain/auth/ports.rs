use async_trait::async_trait;
use auth::token::InvitePayload;
use chrono::Duration;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::MailError;
use crate::domain::auth::errors::SessionError;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::SharePuzzleCommand;
use crate::domain::auth::models::TokenPair;
use crate::domain::user::models::Identity;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;

/// Port for the authentication flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials, open a session, and return a token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user name or wrong password
    ///   (indistinguishable to the caller)
    async fn login(&self, credentials: Credentials) -> Result<TokenPair, AuthError>;

    /// Exchange a live refresh token for a new pair, rotating the session.
    ///
    /// # Errors
    /// * `Token` - Signature, expiry, structure, or kind failure
    /// * `SessionReuse` - Token was already consumed by a previous refresh;
    ///   the account's sessions are revoked before this is reported
    /// * `SessionRevoked` - Session was revoked by logout or is unknown
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Revoke the session behind a refresh token. Idempotent.
    ///
    /// # Errors
    /// * `Token` - Signature, expiry, structure, or kind failure
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Create an account and dispatch the activation mail.
    ///
    /// Mail failures are logged, not surfaced: the account exists either
    /// way and verification can be re-requested.
    ///
    /// # Errors
    /// * `Directory` - User name or email already registered, or the write failed
    /// * `Password` - Hashing failed
    async fn register(&self, new_user: NewUser) -> Result<Identity, AuthError>;

    /// Mark the account behind an email-verification token as verified.
    ///
    /// # Errors
    /// * `Token` - Signature, expiry, structure, or kind failure
    /// * `Directory` - Account no longer exists
    async fn verify_email(&self, token: &str) -> Result<(), AuthError>;

    /// Issue a password-reset token and hand it to the mail gateway.
    ///
    /// Succeeds whether or not the account exists, to avoid account
    /// enumeration.
    async fn request_password_reset(&self, user_name: &str) -> Result<(), AuthError>;

    /// Replace the password behind a reset token and revoke the account's
    /// sessions.
    ///
    /// # Errors
    /// * `Token` - Signature, expiry, structure, or kind failure
    /// * `Directory` - Account no longer exists
    /// * `Password` - Hashing failed
    async fn reset_password(&self, token: &str, new_password: Password) -> Result<(), AuthError>;

    /// Issue an invite token for a puzzle and mail it to the recipient.
    ///
    /// # Errors
    /// * `Mail` - Delivery failed
    async fn share_puzzle(&self, command: SharePuzzleCommand) -> Result<(), AuthError>;

    /// Validate an invite token and return the grant it carries.
    ///
    /// # Errors
    /// * `Token` - Signature, expiry, structure, or kind failure
    async fn redeem_invite(&self, token: &str) -> Result<InvitePayload, AuthError>;

    /// Force logout: revoke every live session of an account.
    ///
    /// # Returns
    /// Number of sessions revoked
    async fn revoke_user_sessions(&self, user_id: i64) -> Result<u64, AuthError>;
}

/// Concurrency-safe store of outstanding sessions.
///
/// The store is the only shared mutable state in the subsystem; every
/// transition below is atomic with respect to the others.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Record a freshly opened session.
    async fn insert(&self, session: Session);

    /// Look up a session by id.
    async fn find(&self, session_id: Uuid) -> Option<Session>;

    /// Consume a live session and record its replacement in one step.
    ///
    /// Exactly one of two concurrent calls for the same session succeeds;
    /// the other observes the consumed entry.
    ///
    /// # Errors
    /// * `Unknown` - No such session
    /// * `Consumed` - Session was already rotated away
    /// * `Revoked` - Session was revoked without a successor (logout)
    async fn rotate(&self, consumed: Uuid, replacement: Session) -> Result<(), SessionError>;

    /// Revoke a session. Repeated revocation is a no-op.
    ///
    /// # Errors
    /// * `Unknown` - No such session
    async fn revoke(&self, session_id: Uuid) -> Result<(), SessionError>;

    /// Revoke every live session of an account.
    ///
    /// # Returns
    /// Number of sessions transitioned to revoked
    async fn revoke_all_for(&self, identity_id: i64) -> u64;

    /// Drop sessions issued longer than `max_age` ago.
    ///
    /// # Returns
    /// Number of sessions dropped
    async fn prune_expired(&self, max_age: Duration) -> u64;
}

/// Outbound port to the mail subsystem.
///
/// The gateway transports opaque token strings; it never interprets them.
#[async_trait]
pub trait MailGateway: Send + Sync + 'static {
    /// Send the account-activation mail with an email-verification link.
    async fn send_account_activation(
        &self,
        identity: &Identity,
        token: &str,
    ) -> Result<(), MailError>;

    /// Send the password-reset mail with a reset link.
    async fn send_password_reset(&self, identity: &Identity, token: &str)
        -> Result<(), MailError>;

    /// Send a puzzle invitation with an invite link.
    async fn send_puzzle_invite(
        &self,
        command: &SharePuzzleCommand,
        token: &str,
    ) -> Result<(), MailError>;
}
