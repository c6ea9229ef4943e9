use axum::extract::Request;
use axum::extract::State;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use auth::TokenIdentity;

use crate::inbound::http::router::AppState;

/// Requests allowed through without a bearer token.
///
/// Matching is exact on method and path; everything else, known route
/// or not, must carry a valid access token.
const EXCLUDED_ROUTES: [(Method, &str); 7] = [
    (Method::POST, "/auth/login"),
    (Method::POST, "/auth/logout"),
    (Method::POST, "/auth/refresh-access-token"),
    (Method::POST, "/auth/forgot-password"),
    (Method::GET, "/auth/valid-mail"),
    (Method::POST, "/user/create"),
    (Method::GET, "/traduction"),
];

fn is_excluded(method: &Method, path: &str) -> bool {
    EXCLUDED_ROUTES
        .iter()
        .any(|(m, p)| m == method && *p == path)
}

/// Extension type to store the verified caller identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: TokenIdentity,
}

/// Middleware that validates access tokens and adds the caller identity
/// to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    if is_excluded(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    // Extract token from Authorization header
    let token = extract_token_from_header(&req)?;

    // Validate the token and require the access kind; the reason for a
    // rejection stays in the log, the caller only sees 401.
    let identity = state
        .codec
        .verify(token)
        .and_then(|claims| claims.into_access())
        .map_err(|e| {
            tracing::warn!(error = %e, "Access token rejected");
            unauthorized()
        })?;

    req.extensions_mut().insert(AuthenticatedUser { identity });

    Ok(next.run(req).await)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Invalid or expired token"
        })),
    )
        .into_response()
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing Authorization header"
                })),
            )
                .into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header"
            })),
        )
            .into_response()
    })?;

    if !auth_str.starts_with("Bearer ") {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header format. Expected: Bearer <token>"
            })),
        )
            .into_response());
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}
