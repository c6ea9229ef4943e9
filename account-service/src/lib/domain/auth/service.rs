use std::sync::Arc;

use async_trait::async_trait;
use auth::token::InvitePayload;
use auth::TokenCodec;
use auth::TokenIssuer;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::SessionError;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::SharePuzzleCommand;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::MailGateway;
use crate::domain::auth::ports::SessionStore;
use crate::domain::user::models::Identity;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::ports::UserDirectory;

/// Domain service implementation for the authentication flows.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<D, S, M>
where
    D: UserDirectory,
    S: SessionStore,
    M: MailGateway,
{
    directory: Arc<D>,
    sessions: Arc<S>,
    mail: Arc<M>,
    password_hasher: auth::PasswordHasher,
    codec: Arc<TokenCodec>,
    issuer: TokenIssuer,
}

impl<D, S, M> AuthService<D, S, M>
where
    D: UserDirectory,
    S: SessionStore,
    M: MailGateway,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - User/group store implementation
    /// * `sessions` - Session store implementation
    /// * `mail` - Mail gateway implementation
    /// * `codec` - Token codec holding the process signing secret
    pub fn new(directory: Arc<D>, sessions: Arc<S>, mail: Arc<M>, codec: Arc<TokenCodec>) -> Self {
        let issuer = TokenIssuer::new(Arc::clone(&codec));

        Self {
            directory,
            sessions,
            mail,
            password_hasher: auth::PasswordHasher::new(),
            codec,
            issuer,
        }
    }

    fn issue_pair(&self, identity: &Identity, session: &Session) -> Result<TokenPair, AuthError> {
        let access = self.issuer.access(identity.token_identity())?;
        let refresh = self.issuer.refresh(identity.id, session.session_id)?;

        Ok(TokenPair {
            access_token: access.encoded,
            refresh_token: refresh.encoded,
        })
    }
}

#[async_trait]
impl<D, S, M> AuthServicePort for AuthService<D, S, M>
where
    D: UserDirectory,
    S: SessionStore,
    M: MailGateway,
{
    async fn login(&self, credentials: Credentials) -> Result<TokenPair, AuthError> {
        // Unknown account and wrong password collapse into the same error.
        let record = self
            .directory
            .find_by_user_name(&credentials.user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_matches = self
            .password_hasher
            .verify(&credentials.password, &record.password_hash)?;
        if !password_matches {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session::new(record.identity.id);
        let pair = self.issue_pair(&record.identity, &session)?;
        self.sessions.insert(session).await;

        Ok(pair)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let payload = self.codec.verify(refresh_token)?.into_refresh()?;

        // Resolve the identity before touching the session: a directory
        // hiccup must not consume the token and strand the client.
        let identity = self
            .directory
            .find_identity(payload.user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let replacement = Session::new(payload.user_id);
        match self
            .sessions
            .rotate(payload.session_id, replacement.clone())
            .await
        {
            Ok(()) => {}
            Err(SessionError::Consumed) => {
                // The token was already spent by a previous refresh: treat
                // it as stolen and cut off the whole account.
                let revoked = self.sessions.revoke_all_for(payload.user_id).await;
                tracing::warn!(
                    user_id = payload.user_id,
                    revoked_sessions = revoked,
                    "Refresh token reuse detected, revoked all sessions for the account"
                );
                return Err(AuthError::SessionReuse);
            }
            Err(SessionError::Revoked) | Err(SessionError::Unknown) => {
                return Err(AuthError::SessionRevoked);
            }
        }

        self.issue_pair(&identity, &replacement)
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let payload = self.codec.verify(refresh_token)?.into_refresh()?;

        // Already-revoked and already-pruned sessions make logout a no-op.
        if let Err(SessionError::Unknown) = self.sessions.revoke(payload.session_id).await {
            tracing::debug!(
                session_id = %payload.session_id,
                "Logout for a session no longer in the store"
            );
        }

        Ok(())
    }

    async fn register(&self, new_user: NewUser) -> Result<Identity, AuthError> {
        let password_hash = self.password_hasher.hash(new_user.password.as_str())?;

        let identity = self
            .directory
            .create_user(&new_user.user_name, &new_user.email, password_hash)
            .await?;

        // The account exists either way; a lost activation mail can be
        // re-requested, so mail failures are not surfaced.
        match self
            .issuer
            .email_verify(identity.id, identity.user_name.clone())
        {
            Ok(token) => {
                if let Err(e) = self
                    .mail
                    .send_account_activation(&identity, &token.encoded)
                    .await
                {
                    tracing::error!(
                        user_id = identity.id,
                        error = %e,
                        "Failed to send activation mail"
                    );
                }
            }
            Err(e) => {
                tracing::error!(
                    user_id = identity.id,
                    error = %e,
                    "Failed to issue email verification token"
                );
            }
        }

        Ok(identity)
    }

    async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        let payload = self.codec.verify(token)?.into_email_verify()?;

        self.directory.mark_email_verified(payload.user_id).await?;

        tracing::info!(user_id = payload.user_id, "Email address verified");
        Ok(())
    }

    async fn request_password_reset(&self, user_name: &str) -> Result<(), AuthError> {
        let record = match self.directory.find_by_user_name(user_name).await? {
            Some(record) => record,
            None => {
                // Same outward behavior whether or not the account exists.
                tracing::debug!(user_name, "Password reset requested for unknown account");
                return Ok(());
            }
        };

        let identity = record.identity;
        match self
            .issuer
            .password_reset(identity.id, identity.user_name.clone())
        {
            Ok(token) => {
                if let Err(e) = self.mail.send_password_reset(&identity, &token.encoded).await {
                    tracing::error!(
                        user_id = identity.id,
                        error = %e,
                        "Failed to send password reset mail"
                    );
                }
            }
            Err(e) => {
                tracing::error!(
                    user_id = identity.id,
                    error = %e,
                    "Failed to issue password reset token"
                );
            }
        }

        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: Password) -> Result<(), AuthError> {
        let payload = self.codec.verify(token)?.into_password_reset()?;

        let password_hash = self.password_hasher.hash(new_password.as_str())?;
        self.directory
            .set_password_hash(payload.user_id, password_hash)
            .await?;

        // Force re-authentication everywhere after a reset.
        let revoked = self.sessions.revoke_all_for(payload.user_id).await;
        tracing::info!(
            user_id = payload.user_id,
            revoked_sessions = revoked,
            "Password replaced"
        );

        Ok(())
    }

    async fn share_puzzle(&self, command: SharePuzzleCommand) -> Result<(), AuthError> {
        let token = self.issuer.invite(command.puzzle_id, command.mail_id)?;

        self.mail.send_puzzle_invite(&command, &token.encoded).await?;

        tracing::info!(
            puzzle_id = command.puzzle_id,
            mail_id = command.mail_id,
            "Puzzle invitation sent"
        );
        Ok(())
    }

    async fn redeem_invite(&self, token: &str) -> Result<InvitePayload, AuthError> {
        Ok(self.codec.verify(token)?.into_invite()?)
    }

    async fn revoke_user_sessions(&self, user_id: i64) -> Result<u64, AuthError> {
        let revoked = self.sessions.revoke_all_for(user_id).await;
        tracing::info!(user_id, revoked_sessions = revoked, "Force logout");

        Ok(revoked)
    }
}
