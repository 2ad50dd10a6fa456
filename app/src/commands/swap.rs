//! Network commands: quote, swap, withdraw, balance and the API server

use anyhow::Context;
use icswap_api::dto::{
    AmountResponse, BalanceResponse, OutcomeDto, QuoteResponse, ReceiptResponse, RunDto,
};
use icswap_api::{start_server, AppState};
use icswap_core::{format_amount, parse_amount, AppConfig, SwapDirection};
use swap_pool::{SwapError, SwapOrchestrator};

use super::{connect, print_json};
use crate::cli::TradeArgs;

fn direction_for(orch: &SwapOrchestrator, symbol: &str) -> anyhow::Result<SwapDirection> {
    orch.session()
        .pair()
        .direction_selling(symbol)
        .ok_or_else(|| SwapError::UnknownToken(symbol.to_string()).into())
}

/// Quote selling `args.amount` of `args.token`
pub async fn quote(config: AppConfig, args: TradeArgs) -> anyhow::Result<()> {
    let mut orch = connect(&config).await?;
    let direction = direction_for(&orch, &args.token)?;
    let out_decimals = orch.session().pair().output(direction).decimals;
    let amount_in = parse_amount(&args.amount, orch.session().pair().input(direction).decimals)?;

    let quote = orch.get_quote(&amount_in, direction).await?;
    print_json(&QuoteResponse {
        amount_out_formatted: format_amount(&quote.amount_out, out_decimals),
        minimum_received_formatted: format_amount(&quote.minimum_received, out_decimals),
        quote,
    })
}

/// Quote, then run the full sequence against that quote
pub async fn swap(config: AppConfig, args: TradeArgs) -> anyhow::Result<()> {
    let mut orch = connect(&config).await?;
    let direction = direction_for(&orch, &args.token)?;
    let amount_in = parse_amount(&args.amount, orch.session().pair().input(direction).decimals)?;

    let quote = orch.get_quote(&amount_in, direction).await?;
    tracing::info!(
        amount_out = %quote.amount_out,
        minimum_received = %quote.minimum_received,
        "Executing swap"
    );

    match orch
        .execute_swap(&amount_in, &quote.amount_out, direction)
        .await
    {
        Ok(receipt) => print_json(&ReceiptResponse::from(receipt)),
        Err(err) => {
            // The process exits here, so show what is left for a manual withdraw
            if let Some(run) = orch.close() {
                tracing::warn!(
                    "Swap stopped while {}; funds may remain deposited in the pool",
                    run.next_step
                );
                print_json(&RunDto::from(&run))?;
            }
            Err(err.into())
        }
    }
}

/// Withdraw funds the pool holds for this identity
pub async fn withdraw(config: AppConfig, args: TradeArgs) -> anyhow::Result<()> {
    let mut orch = connect(&config).await?;
    let decimals = orch.session().token(&args.token)?.decimals;
    let amount = parse_amount(&args.amount, decimals)?;

    let outcome = orch.withdraw(&args.token, &amount).await?;
    print_json(&OutcomeDto::from(&outcome))
}

/// Ledger balances of the configured identity
pub async fn balance(config: AppConfig, token: Option<String>) -> anyhow::Result<()> {
    let orch = connect(&config).await?;
    let pair = orch.session().pair().clone();
    let symbols = match token {
        Some(symbol) => vec![symbol],
        None => vec![pair.token0.symbol.clone(), pair.token1.symbol.clone()],
    };

    let mut balances = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let decimals = orch.session().token(&symbol)?.decimals;
        let amount = orch
            .balance(&symbol)
            .await
            .with_context(|| format!("fetching {symbol} balance"))?;
        balances.push(BalanceResponse {
            token: symbol,
            balance: AmountResponse::new(amount, decimals),
        });
    }
    print_json(&balances)
}

/// Serve the HTTP API until Ctrl-C
pub async fn serve(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.api_port);
    let orch = connect(&config).await?;
    let state = AppState::with_orchestrator(config, orch);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };
    start_server(state.clone(), port, shutdown).await?;

    if let Some(run) = state.close().await {
        tracing::warn!(
            run_id = %run.run_id,
            "Server stopped with an unfinished swap (next step: {})",
            run.next_step
        );
    }
    Ok(())
}
