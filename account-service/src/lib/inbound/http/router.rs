use std::sync::Arc;
use std::time::Duration;

use auth::TokenCodec;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::middleware::Next;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::guard::require_capability;
use super::handlers::create_user::create_user;
use super::handlers::forgot_password::forgot_password;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::refresh_access_token::refresh_access_token;
use super::handlers::revoke_sessions::revoke_sessions;
use super::handlers::share_puzzle::share_puzzle;
use super::handlers::traduction::traduction;
use super::handlers::valid_mail::valid_mail;
use super::middleware::authenticate as auth_middleware;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::ports::UserDirectory;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub directory: Arc<dyn UserDirectory>,
    pub codec: Arc<TokenCodec>,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    directory: Arc<dyn UserDirectory>,
    codec: Arc<TokenCodec>,
) -> Router {
    let state = AppState {
        auth_service,
        directory,
        codec,
    };

    // Every route below still passes through the authentication layer;
    // the ones the exclusion table names are let through inside it.
    let open_routes = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh-access-token", post(refresh_access_token))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/valid-mail", get(valid_mail))
        .route("/user/create", post(create_user))
        .route("/traduction", get(traduction));

    let account_routes = Router::new().route("/account/me", get(me));

    let admin_routes = Router::new()
        .route("/auth/sessions/:user_id", delete(revoke_sessions))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            |state: State<AppState>, req: Request<Body>, next: Next| {
                require_capability(state, "admin", req, next)
            },
        ));

    let entreprise_routes = Router::new()
        .route("/puzzles/share", post(share_puzzle))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            |state: State<AppState>, req: Request<Body>, next: Next| {
                require_capability(state, "entreprise", req, next)
            },
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(open_routes)
        .merge(account_routes)
        .merge(admin_routes)
        .merge(entreprise_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
