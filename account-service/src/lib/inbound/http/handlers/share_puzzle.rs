use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::SharePuzzleCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;

/// Mails a puzzle invitation carrying a signed invite token.
pub async fn share_puzzle(
    State(state): State<AppState>,
    Json(body): Json<SharePuzzleRequest>,
) -> Result<ApiSuccess<SharePuzzleResponseData>, ApiError> {
    let recipient =
        EmailAddress::new(body.email).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    state
        .auth_service
        .share_puzzle(SharePuzzleCommand {
            puzzle_id: body.puzzle_id,
            mail_id: body.mail_id,
            recipient,
        })
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SharePuzzleResponseData { sent: true },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SharePuzzleRequest {
    puzzle_id: i64,
    mail_id: i64,
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePuzzleResponseData {
    pub sent: bool,
}
