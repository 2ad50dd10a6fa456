//! Account identifier routes

use axum::{routing::post, Json, Router};
use icp_account::{parse_principal, AccountIdentifier, Subaccount};

use crate::dto::{AccountIdRequest, AccountIdResponse};
use crate::routes::{bad_request, Rejection};
use crate::AppState;

/// Create account routes
pub fn router() -> Router<AppState> {
    Router::new().route("/identifier", post(identifier))
}

/// POST /account/identifier - Derive the legacy account identifier
async fn identifier(
    Json(request): Json<AccountIdRequest>,
) -> Result<Json<AccountIdResponse>, Rejection> {
    let principal =
        parse_principal(&request.principal).map_err(|e| bad_request(&e, e.error_code()))?;
    let subaccount = request
        .subaccount
        .as_deref()
        .map(Subaccount::from_hex)
        .transpose()
        .map_err(|e| bad_request(&e, e.error_code()))?;

    Ok(Json(AccountIdResponse {
        principal: principal.to_text(),
        account_identifier: AccountIdentifier::new(&principal, subaccount.as_ref()),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use crate::routes::test_support::send;
    use crate::AppState;

    #[tokio::test]
    async fn test_identifier() {
        let (status, body) = send(
            AppState::new(),
            Method::POST,
            "/account/identifier",
            Some(json!({"principal": "2vxsx-fae"})),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            body["account_identifier"],
            "1c7a48ba6a562aa9eaa2481a9049cdf0433b9738c992d698c31d8abf89cadc79"
        );
    }

    #[tokio::test]
    async fn test_identifier_with_subaccount() {
        let sub = format!("{}01", "00".repeat(31));
        let (status, body) = send(
            AppState::new(),
            Method::POST,
            "/account/identifier",
            Some(json!({"principal": "2vxsx-fae", "subaccount": sub})),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            body["account_identifier"],
            "b8fab0be4ad596a3739ab93e7316a8647ee72e167709441da49ce9171828629d"
        );
    }

    #[tokio::test]
    async fn test_identifier_errors() {
        let (status, body) = send(
            AppState::new(),
            Method::POST,
            "/account/identifier",
            Some(json!({"principal": "nope"})),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], "invalid_principal");

        let (status, body) = send(
            AppState::new(),
            Method::POST,
            "/account/identifier",
            Some(json!({"principal": "2vxsx-fae", "subaccount": "0102"})),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], "invalid_subaccount");
    }
}
