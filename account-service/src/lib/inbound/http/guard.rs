use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::ports::UserDirectory;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Middleware that lets the request through only when the caller's
/// group grants the given capability.
///
/// The group is re-read from the directory on every call, so a role
/// change takes effect without waiting for access tokens to expire.
/// Must be layered inside the authentication middleware.
pub async fn require_capability(
    State(state): State<AppState>,
    capability: &'static str,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let user = req
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!(capability, "Capability check reached without authentication");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response()
        })?;

    let group = match state.directory.find_group(user.identity.group_id).await {
        Ok(group) => group,
        Err(e) => {
            tracing::error!(error = %e, "Group lookup failed during capability check");
            None
        }
    };

    match group {
        Some(group) if group.has_role(capability) => Ok(next.run(req).await),
        _ => {
            tracing::warn!(
                user_id = user.identity.id,
                group_id = user.identity.group_id,
                capability,
                "Capability denied"
            );
            Err(forbidden())
        }
    }
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "Insufficient permissions"
        })),
    )
        .into_response()
}
