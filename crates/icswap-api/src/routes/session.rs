//! Session, token and balance routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use icswap_core::parse_tolerance_percent;
use swap_pool::slippage::PRESETS_BPS;

use crate::dto::{
    AmountResponse, ApiError, BalanceQuery, BalanceResponse, SessionResponse, SlippageRequest,
    TokenDto, TokensResponse,
};
use crate::routes::{bad_request, lock_session, open_session, swap_rejection, Rejection};
use crate::AppState;

/// Create session routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_session))
        .route("/slippage", put(set_slippage))
}

/// GET /tokens - Tokens of the pool and slippage presets
pub async fn tokens(State(state): State<AppState>) -> Json<TokensResponse> {
    let config = state.config().await;
    Json(TokensResponse {
        token0: TokenDto::from(&config.tokens.token0),
        token1: TokenDto::from(&config.tokens.token1),
        slippage_presets_bps: PRESETS_BPS.to_vec(),
        default_slippage_bps: config.default_slippage_bps,
    })
}

/// GET /balance?token=ICP - Ledger balance of the session principal
pub async fn balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, Rejection> {
    let mut guard = lock_session(&state)?;
    let orch = open_session(&mut guard)?;

    let token = orch.session().token(&query.token).map_err(swap_rejection)?.clone();
    let amount = orch.balance(&token.symbol).await.map_err(swap_rejection)?;

    Ok(Json(BalanceResponse {
        token: token.symbol,
        balance: AmountResponse::new(amount, token.decimals),
    }))
}

/// GET /session - Principal, account and state of the swap session
async fn get_session(State(state): State<AppState>) -> Result<Json<SessionResponse>, Rejection> {
    let mut guard = lock_session(&state)?;
    let orch = open_session(&mut guard)?;
    Ok(Json(session_response(orch)))
}

/// PUT /session/slippage - Change the slippage tolerance
async fn set_slippage(
    State(state): State<AppState>,
    Json(request): Json<SlippageRequest>,
) -> Result<Json<SessionResponse>, Rejection> {
    let bps = match (request.percent.as_deref(), request.tolerance_bps) {
        (Some(percent), _) => {
            parse_tolerance_percent(percent).map_err(|e| bad_request(&e, e.error_code()))?
        }
        (None, Some(bps)) => bps,
        (None, None) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError::new(
                    "bad_request",
                    "Either percent or tolerance_bps is required",
                )),
            ))
        }
    };

    let mut guard = lock_session(&state)?;
    let orch = open_session(&mut guard)?;
    orch.session_mut()
        .set_slippage_bps(bps)
        .map_err(swap_rejection)?;
    Ok(Json(session_response(orch)))
}

fn session_response(orch: &swap_pool::SwapOrchestrator) -> SessionResponse {
    let session = orch.session();
    SessionResponse {
        principal: session.principal().to_text(),
        account_identifier: *session.account(),
        pool: session.pool().to_text(),
        slippage_bps: session.slippage_bps(),
        state: orch.state(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::Method;
    use serde_json::json;

    use crate::routes::test_support::{send, state_with, FixedBackend};
    use crate::AppState;

    #[tokio::test]
    async fn test_tokens() {
        let (status, body) = send(AppState::new(), Method::GET, "/tokens", None).await;
        assert_eq!(status, 200);
        assert_eq!(body["token0"]["symbol"], "ckBTC");
        assert_eq!(body["token1"]["transfer_fee"], "10000");
        assert_eq!(body["slippage_presets_bps"], json!([50, 100, 200, 500]));
    }

    #[tokio::test]
    async fn test_session_and_slippage() {
        let state = state_with(Arc::new(FixedBackend::new(0, 0, 0)));

        let (status, body) = send(state.clone(), Method::GET, "/session", None).await;
        assert_eq!(status, 200);
        assert_eq!(body["principal"], "2vxsx-fae");
        assert_eq!(body["slippage_bps"], 50);
        assert_eq!(body["state"]["state"], "idle");

        let (status, body) = send(
            state.clone(),
            Method::PUT,
            "/session/slippage",
            Some(json!({"percent": "2"})),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["slippage_bps"], 200);

        let (status, body) = send(
            state,
            Method::PUT,
            "/session/slippage",
            Some(json!({"percent": "101"})),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], "invalid_tolerance");
    }

    #[tokio::test]
    async fn test_balance() {
        let state = state_with(Arc::new(FixedBackend::new(123_456_789, 0, 0)));
        let (status, body) = send(state, Method::GET, "/balance?token=icp", None).await;
        assert_eq!(status, 200);
        assert_eq!(body["token"], "ICP");
        assert_eq!(body["amount"], "123456789");
        assert_eq!(body["formatted"], "1.23456789");
    }

    #[tokio::test]
    async fn test_no_session() {
        let (status, body) = send(AppState::new(), Method::GET, "/session", None).await;
        assert_eq!(status, 503);
        assert_eq!(body["code"], "session_unavailable");
    }
}
