use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Force-logout every session of the given account.
pub async fn revoke_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<ApiSuccess<RevokeSessionsResponseData>, ApiError> {
    let revoked = state.auth_service.revoke_user_sessions(user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RevokeSessionsResponseData {
            revoked_sessions: revoked,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevokeSessionsResponseData {
    pub revoked_sessions: u64,
}
