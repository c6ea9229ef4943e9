use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::errors::DirectoryError;
use crate::domain::user::ports::UserDirectory;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Returns the caller's own account, read fresh from the directory
/// rather than echoed from the token.
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    let identity = state
        .directory
        .find_identity(user.identity.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account no longer exists".to_string()))?;

    let group = state
        .directory
        .find_group(identity.group_id)
        .await?
        .ok_or(DirectoryError::GroupNotFound(identity.group_id))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ProfileData {
            id: identity.id,
            user_name: identity.user_name,
            email: identity.email,
            email_verified: identity.email_verified,
            group: group.name,
            roles: group.roles,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileData {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub email_verified: bool,
    pub group: String,
    pub roles: Vec<String>,
}
