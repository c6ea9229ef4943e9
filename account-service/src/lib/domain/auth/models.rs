use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;

/// One outstanding refresh-token grant.
///
/// Owned exclusively by the session store. A session is terminal once
/// `revoked` is set; terminal sessions are never reactivated. When a
/// session is consumed by rotation, `replaced_by` points at its
/// successor, which distinguishes rotation from a plain logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: Uuid,
    pub identity_id: i64,
    pub issued_at: DateTime<Utc>,
    pub revoked: bool,
    pub replaced_by: Option<Uuid>,
}

impl Session {
    /// Open a fresh session for an account.
    pub fn new(identity_id: i64) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            identity_id,
            issued_at: Utc::now(),
            revoked: false,
            replaced_by: None,
        }
    }
}

/// The access + refresh pair returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Login input.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_name: String,
    pub password: String,
}

/// Command to mail a puzzle invitation.
///
/// `mail_id` is the caller's record of the outbound mail; this subsystem
/// only embeds it into the invite token.
#[derive(Debug, Clone)]
pub struct SharePuzzleCommand {
    pub puzzle_id: i64,
    pub mail_id: i64,
    pub recipient: EmailAddress,
}
