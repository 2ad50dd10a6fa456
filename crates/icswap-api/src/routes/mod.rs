//! API route handlers

pub mod account;
pub mod amount;
pub mod health;
pub mod session;
pub mod swap;

use axum::{http::StatusCode, routing::get, Json, Router};
use swap_pool::{SwapError, SwapOrchestrator};
use tokio::sync::MutexGuard;

use crate::dto::ApiError;
use crate::AppState;

pub(crate) type Rejection = (StatusCode, Json<ApiError>);

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/amount", amount::router())
        .nest("/account", account::router())
        .nest("/session", session::router())
        .nest("/swap", swap::router())
        .route("/tokens", get(session::tokens))
        .route("/balance", get(session::balance))
        .with_state(state)
}

pub(crate) fn bad_request(err: impl std::fmt::Display, code: &str) -> Rejection {
    (StatusCode::BAD_REQUEST, Json(ApiError::new(code, err.to_string())))
}

pub(crate) fn swap_rejection(err: SwapError) -> Rejection {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(ApiError::from(&err)))
}

/// Lock the session for the duration of a handler
pub(crate) fn lock_session(
    state: &AppState,
) -> Result<MutexGuard<'_, Option<SwapOrchestrator>>, Rejection> {
    state
        .session()
        .map_err(|_| (StatusCode::CONFLICT, Json(ApiError::busy())))
}

pub(crate) fn open_session<'a>(
    guard: &'a mut MutexGuard<'_, Option<SwapOrchestrator>>,
) -> Result<&'a mut SwapOrchestrator, Rejection> {
    guard
        .as_mut()
        .ok_or_else(|| (StatusCode::SERVICE_UNAVAILABLE, Json(ApiError::no_session())))
}
