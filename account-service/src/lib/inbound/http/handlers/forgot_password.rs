use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::Password;
use crate::inbound::http::router::AppState;

/// One endpoint for both halves of the reset flow: asking for the mail
/// and performing the reset with the mailed token.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequestBody>,
) -> Result<ApiSuccess<ForgotPasswordResponseData>, ApiError> {
    match body {
        ForgotPasswordRequestBody::Perform { token, password } => {
            let password = Password::new(password)
                .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;
            state.auth_service.reset_password(&token, password).await?;
        }
        ForgotPasswordRequestBody::Request { user_name } => {
            state.auth_service.request_password_reset(&user_name).await?;
        }
    }

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ForgotPasswordResponseData { accepted: true },
    ))
}

/// The two bodies share no field names, so untagged dispatch is
/// unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ForgotPasswordRequestBody {
    Perform { token: String, password: String },
    Request { user_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForgotPasswordResponseData {
    pub accepted: bool,
}
