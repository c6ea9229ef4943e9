use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Confirms an email address from the link sent at registration.
pub async fn valid_mail(
    State(state): State<AppState>,
    Query(params): Query<ValidMailParams>,
) -> Result<ApiSuccess<ValidMailResponseData>, ApiError> {
    state.auth_service.verify_email(&params.token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ValidMailResponseData { verified: true },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidMailParams {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidMailResponseData {
    pub verified: bool,
}
