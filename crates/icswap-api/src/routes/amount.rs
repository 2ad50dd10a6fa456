//! Amount conversion routes

use axum::{routing::post, Json, Router};
use icswap_core::{minimum_received, parse_amount};

use crate::dto::{
    AmountResponse, FormatAmountRequest, MinimumReceivedRequest, MinimumReceivedResponse,
    ParseAmountRequest,
};
use crate::routes::{bad_request, Rejection};
use crate::AppState;

/// Create amount routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parse", post(parse))
        .route("/format", post(format_units))
        .route("/minimum", post(minimum))
}

/// POST /amount/parse - Decimal text to base units
async fn parse(Json(request): Json<ParseAmountRequest>) -> Result<Json<AmountResponse>, Rejection> {
    let amount = parse_amount(&request.text, request.decimals)
        .map_err(|e| bad_request(&e, e.error_code()))?;
    Ok(Json(AmountResponse::new(amount, request.decimals)))
}

/// POST /amount/format - Base units to decimal text
async fn format_units(Json(request): Json<FormatAmountRequest>) -> Json<AmountResponse> {
    Json(AmountResponse::new(request.amount, request.decimals))
}

/// POST /amount/minimum - Slippage-adjusted minimum output
async fn minimum(
    Json(request): Json<MinimumReceivedRequest>,
) -> Result<Json<MinimumReceivedResponse>, Rejection> {
    let minimum = minimum_received(&request.amount, request.tolerance_bps)
        .map_err(|e| bad_request(&e, e.error_code()))?;
    Ok(Json(MinimumReceivedResponse { minimum }))
}
