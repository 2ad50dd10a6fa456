//! Offline helpers: amount conversion and account identifiers

use icp_account::{parse_principal, AccountIdentifier, Subaccount};
use icswap_api::dto::{AccountIdResponse, AmountResponse};
use icswap_core::{parse_amount, AppConfig, Amount};

use super::{connect, print_json};

/// Render base units as decimal text
pub fn format(amount: &str, decimals: u8) -> anyhow::Result<()> {
    let amount = Amount::parse_bytes(amount.trim().as_bytes(), 10)
        .ok_or_else(|| anyhow::anyhow!("not a base-unit amount: {amount:?}"))?;
    print_json(&AmountResponse::new(amount, decimals))
}

/// Parse decimal text into base units
pub fn parse(text: &str, decimals: u8) -> anyhow::Result<()> {
    let amount = parse_amount(text, decimals)?;
    print_json(&AmountResponse::new(amount, decimals))
}

/// Account identifier of `principal`, or of the configured identity
pub async fn account_id(
    config: AppConfig,
    principal: Option<String>,
    subaccount: Option<String>,
) -> anyhow::Result<()> {
    let principal = match principal {
        Some(text) => parse_principal(&text)?,
        None => connect(&config).await?.session().principal(),
    };
    let subaccount = subaccount.as_deref().map(Subaccount::from_hex).transpose()?;

    print_json(&AccountIdResponse {
        principal: principal.to_text(),
        account_identifier: AccountIdentifier::new(&principal, subaccount.as_ref()),
    })
}
