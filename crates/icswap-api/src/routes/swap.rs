//! Swap Routes

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use icswap_core::{format_amount, parse_amount};
use swap_pool::{SwapError, SwapOrchestrator};

use crate::dto::{
    ExecuteRequest, OutcomeDto, QuoteRequest, QuoteResponse, ReceiptResponse, RunDto,
    StatusResponse, WithdrawRequest, WithdrawResponse,
};
use crate::routes::{lock_session, open_session, swap_rejection, Rejection};
use crate::AppState;

/// Create swap routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(get_quote))
        .route("/execute", post(execute))
        .route("/status", get(status))
        .route("/resume", post(resume))
        .route("/withdraw", post(withdraw))
}

fn direction_for(
    orch: &SwapOrchestrator,
    symbol: &str,
) -> Result<icswap_core::SwapDirection, Rejection> {
    orch.session()
        .pair()
        .direction_selling(symbol)
        .ok_or_else(|| swap_rejection(SwapError::UnknownToken(symbol.to_string())))
}

/// POST /swap/quote - Quote selling `amount` of `token_in`
async fn get_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, Rejection> {
    let mut guard = lock_session(&state)?;
    let orch = open_session(&mut guard)?;

    let direction = direction_for(orch, &request.token_in)?;
    let pair = orch.session().pair();
    let (in_decimals, out_decimals) = (
        pair.input(direction).decimals,
        pair.output(direction).decimals,
    );
    let amount_in = parse_amount(&request.amount, in_decimals)
        .map_err(|e| swap_rejection(e.into()))?;

    let quote = orch
        .get_quote(&amount_in, direction)
        .await
        .map_err(swap_rejection)?;

    Ok(Json(QuoteResponse {
        amount_out_formatted: format_amount(&quote.amount_out, out_decimals),
        minimum_received_formatted: format_amount(&quote.minimum_received, out_decimals),
        quote,
    }))
}

/// POST /swap/execute - Approve, deposit, swap and withdraw
async fn execute(
    State(state): State<AppState>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ReceiptResponse>, Rejection> {
    let mut guard = lock_session(&state)?;
    let orch = open_session(&mut guard)?;

    let direction = direction_for(orch, &request.token_in)?;
    let receipt = orch
        .execute_swap(&request.amount_in, &request.quoted_amount_out, direction)
        .await
        .map_err(swap_rejection)?;

    Ok(Json(receipt.into()))
}

/// GET /swap/status - State machine position and the last run
async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, Rejection> {
    let mut guard = lock_session(&state)?;
    let orch = open_session(&mut guard)?;

    Ok(Json(StatusResponse {
        state: orch.state(),
        run: orch.last_run().map(RunDto::from),
    }))
}

/// POST /swap/resume - Re-invoke the failed step of the last run
async fn resume(State(state): State<AppState>) -> Result<Json<ReceiptResponse>, Rejection> {
    let mut guard = lock_session(&state)?;
    let orch = open_session(&mut guard)?;

    let receipt = orch.resume().await.map_err(swap_rejection)?;
    Ok(Json(receipt.into()))
}

/// POST /swap/withdraw - Withdraw funds held by the pool
async fn withdraw(
    State(state): State<AppState>,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<WithdrawResponse>, Rejection> {
    let mut guard = lock_session(&state)?;
    let orch = open_session(&mut guard)?;

    let outcome = orch
        .withdraw(&request.token, &request.amount)
        .await
        .map_err(swap_rejection)?;

    Ok(Json(WithdrawResponse {
        outcome: OutcomeDto::from(&outcome),
        state: orch.state(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::Method;
    use icswap_core::RemoteError;
    use serde_json::json;

    use crate::routes::test_support::{send, state_with, FixedBackend};

    const ONE_ICP: u64 = 100_000_000;

    #[tokio::test]
    async fn test_quote() {
        let backend = Arc::new(FixedBackend::new(0, 1_000_000, 0));
        let state = state_with(backend.clone());

        let (status, body) = send(
            state,
            Method::POST,
            "/swap/quote",
            Some(json!({"token_in": "ICP", "amount": "1"})),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["amount_in"], "100000000");
        assert_eq!(body["amount_out"], "1000000");
        assert_eq!(body["minimum_received"], "995000");
        assert_eq!(body["minimum_received_formatted"], "0.00995000");
        assert_eq!(body["direction"], "one_for_zero");
        assert_eq!(backend.calls(), vec!["quote"]);
    }

    #[tokio::test]
    async fn test_quote_rejects_bad_input() {
        let state = state_with(Arc::new(FixedBackend::new(0, 1_000_000, 0)));

        let (status, body) = send(
            state.clone(),
            Method::POST,
            "/swap/quote",
            Some(json!({"token_in": "ICP", "amount": "0"})),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], "invalid_amount");

        let (status, body) = send(
            state,
            Method::POST,
            "/swap/quote",
            Some(json!({"token_in": "DOGE", "amount": "1"})),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], "unknown_token");
    }

    #[tokio::test]
    async fn test_execute_and_status() {
        let backend = Arc::new(FixedBackend::new(10 * ONE_ICP, 1_000_000, 998_000));
        let state = state_with(backend.clone());

        let (status, body) = send(
            state.clone(),
            Method::POST,
            "/swap/execute",
            Some(json!({
                "token_in": "ICP",
                "amount_in": "100000000",
                "quoted_amount_out": "1000000"
            })),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["amount_out"], "998000");
        assert_eq!(body["amount_received"], "997990");
        assert_eq!(body["outcomes"].as_array().unwrap().len(), 4);
        assert_eq!(
            backend.calls(),
            vec!["balance_of", "approve", "deposit", "swap", "withdraw"]
        );

        let (status, body) = send(state, Method::GET, "/swap/status", None).await;
        assert_eq!(status, 200);
        assert_eq!(body["state"]["state"], "completed");
        assert!(body["run"].get("failed_step").is_none());
    }

    #[tokio::test]
    async fn test_insufficient_funds() {
        let backend = Arc::new(FixedBackend::new(ONE_ICP, 1_000_000, 998_000));
        let state = state_with(backend.clone());

        let (status, body) = send(
            state,
            Method::POST,
            "/swap/execute",
            Some(json!({
                "token_in": "ICP",
                "amount_in": "100000000",
                "quoted_amount_out": "1000000"
            })),
        )
        .await;
        assert_eq!(status, 422);
        assert_eq!(body["code"], "insufficient_funds");
        assert_eq!(body["step"], "approving");
        assert_eq!(backend.calls(), vec!["balance_of"]);
    }

    #[tokio::test]
    async fn test_swap_failure_then_withdraw() {
        let backend = Arc::new(FixedBackend::new(10 * ONE_ICP, 1_000_000, 998_000));
        backend
            .swap_failures
            .lock()
            .unwrap()
            .push_back(RemoteError::generic("slippage exceeded"));
        let state = state_with(backend.clone());

        let (status, body) = send(
            state.clone(),
            Method::POST,
            "/swap/execute",
            Some(json!({
                "token_in": "ICP",
                "amount_in": "100000000",
                "quoted_amount_out": "1000000"
            })),
        )
        .await;
        assert_eq!(status, 502);
        assert_eq!(body["step"], "swapping");
        assert_eq!(body["message"], "swapping rejected: slippage exceeded");

        let (_, body) = send(state.clone(), Method::GET, "/swap/status", None).await;
        assert_eq!(body["state"]["step"], "swapping");
        assert_eq!(body["run"]["failed_step"], "swapping");

        let (status, body) = send(
            state,
            Method::POST,
            "/swap/withdraw",
            Some(json!({"token": "ICP", "amount": "100000000"})),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["outcome"]["outcome"], "withdrawn");
        assert_eq!(body["state"]["state"], "idle");
        assert_eq!(
            backend.calls(),
            vec!["balance_of", "approve", "deposit", "swap", "withdraw"]
        );
    }

    #[tokio::test]
    async fn test_swap_failure_then_resume() {
        let backend = Arc::new(FixedBackend::new(10 * ONE_ICP, 1_000_000, 998_000));
        backend
            .swap_failures
            .lock()
            .unwrap()
            .push_back(RemoteError::TemporarilyUnavailable);
        let state = state_with(backend.clone());

        let (status, _) = send(
            state.clone(),
            Method::POST,
            "/swap/execute",
            Some(json!({
                "token_in": "ckBTC",
                "amount_in": "50000",
                "quoted_amount_out": "100000000"
            })),
        )
        .await;
        assert_eq!(status, 503);

        let (status, body) = send(state.clone(), Method::POST, "/swap/resume", None).await;
        assert_eq!(status, 200);
        assert_eq!(body["direction"], "zero_for_one");
        assert_eq!(
            backend.calls(),
            vec!["balance_of", "approve", "deposit", "swap", "swap", "withdraw"]
        );

        let (status, body) = send(state, Method::POST, "/swap/resume", None).await;
        assert_eq!(status, 404);
        assert_eq!(body["code"], "no_pending_swap");
    }

    #[tokio::test]
    async fn test_busy_session_conflicts() {
        let state = state_with(Arc::new(FixedBackend::new(0, 0, 0)));
        let _held = state.session().unwrap();

        let (status, body) = send(state.clone(), Method::GET, "/swap/status", None).await;
        assert_eq!(status, 409);
        assert_eq!(body["code"], "swap_in_progress");
    }
}
