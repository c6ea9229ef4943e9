use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<LogoutRequestBody>,
) -> Result<ApiSuccess<LogoutResponseData>, ApiError> {
    state.auth_service.logout(&body.refresh_token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData { logged_out: true },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogoutRequestBody {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub logged_out: bool,
}
