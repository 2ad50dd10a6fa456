//! Swap Orchestrator
//!
//! Drives approve -> deposit -> swap -> withdraw against a [`SwapBackend`].
//! Calls are awaited one at a time and never retried automatically. A failed
//! step leaves the run parked so the caller can [`SwapOrchestrator::resume`]
//! it, or recover deposited funds with [`SwapOrchestrator::withdraw`].

use std::sync::Arc;

use canister_client::SwapBackend;
use icswap_core::{Amount, RemoteError, SwapDirection, TokenSpec};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculator::{ensure_positive, min_amount_out, net_of_fee, required_balance};
use crate::session::SwapSession;
use crate::state::{
    Result, SwapError, SwapOutcome, SwapQuote, SwapReceipt, SwapRequest, SwapRun, SwapState,
    SwapStep,
};

/// Per-session swap state machine.
///
/// Methods take `&mut self`, so one orchestrator can only run one sequence
/// at a time.
pub struct SwapOrchestrator {
    backend: Arc<dyn SwapBackend>,
    session: SwapSession,
    state: SwapState,
    run: Option<SwapRun>,
}

impl SwapOrchestrator {
    pub fn new(backend: Arc<dyn SwapBackend>, session: SwapSession) -> Self {
        Self {
            backend,
            session,
            state: SwapState::Idle,
            run: None,
        }
    }

    pub fn session(&self) -> &SwapSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SwapSession {
        &mut self.session
    }

    pub fn state(&self) -> SwapState {
        self.state
    }

    /// Most recent run, finished or not
    pub fn last_run(&self) -> Option<&SwapRun> {
        self.run.as_ref()
    }

    /// Most recent run if it stopped on a failure
    pub fn pending(&self) -> Option<&SwapRun> {
        self.run.as_ref().filter(|run| run.failed_step().is_some())
    }

    /// Ledger balance of the session principal for `symbol`
    pub async fn balance(&self, symbol: &str) -> Result<Amount> {
        let token = self.session.token(symbol)?;
        self.backend
            .balance_of(token, self.session.principal())
            .await
            .map_err(SwapError::Remote)
    }

    /// Ask the pool what `amount_in` would buy. Read-only.
    pub async fn get_quote(
        &mut self,
        amount_in: &Amount,
        direction: SwapDirection,
    ) -> Result<SwapQuote> {
        ensure_positive(amount_in, "amount_in")?;

        self.state = SwapState::Quoting;
        debug!(%amount_in, %direction, "Requesting quote");

        let amount_out = match self.backend.quote(amount_in, direction).await {
            Ok(amount_out) => amount_out,
            Err(error) => {
                warn!(%error, "Quote rejected");
                self.state = SwapState::Failed(SwapStep::Quoting);
                return Err(SwapError::RemoteRejected {
                    step: SwapStep::Quoting,
                    error,
                });
            }
        };
        self.state = SwapState::Idle;

        let pair = self.session.pair();
        let slippage_bps = self.session.slippage_bps();
        let quote = SwapQuote {
            direction,
            input_symbol: pair.input(direction).symbol.clone(),
            output_symbol: pair.output(direction).symbol.clone(),
            amount_in: amount_in.clone(),
            minimum_received: min_amount_out(&amount_out, slippage_bps)?,
            amount_out,
            slippage_bps,
        };
        info!(
            input = %quote.input_symbol,
            output = %quote.output_symbol,
            amount_in = %quote.amount_in,
            amount_out = %quote.amount_out,
            "Quote received"
        );
        Ok(quote)
    }

    /// Run the full sequence for a previously quoted swap.
    ///
    /// The input balance must cover `amount_in` plus the input ledger fee;
    /// otherwise nothing is sent to either canister.
    pub async fn execute_swap(
        &mut self,
        amount_in: &Amount,
        quoted_out: &Amount,
        direction: SwapDirection,
    ) -> Result<SwapReceipt> {
        ensure_positive(amount_in, "amount_in")?;
        ensure_positive(quoted_out, "quoted amount_out")?;

        let pair = self.session.pair();
        let request = SwapRequest {
            input_token: pair.input(direction).clone(),
            output_token: pair.output(direction).clone(),
            direction,
            amount_in: amount_in.clone(),
            quoted_amount_out: quoted_out.clone(),
            slippage_tolerance_bps: self.session.slippage_bps(),
        };
        let min_out = min_amount_out(quoted_out, request.slippage_tolerance_bps)?;

        self.state = SwapState::Approving;
        self.check_balance(&request.input_token, amount_in).await?;

        if let Some(stale) = self.pending() {
            warn!(
                run_id = %stale.run_id,
                step = ?stale.failed_step(),
                "Starting a new swap over an unfinished one"
            );
        }

        let run = SwapRun {
            run_id: Uuid::new_v4(),
            request,
            min_amount_out: min_out,
            next_step: SwapStep::Approving,
            amount_out: None,
            outcomes: Vec::new(),
        };
        info!(
            run_id = %run.run_id,
            input = %run.request.input_token,
            output = %run.request.output_token,
            amount_in = %run.request.amount_in,
            min_out = %run.min_amount_out,
            "Starting swap"
        );
        self.drive(run).await
    }

    /// Re-invoke the step that failed in the last run and continue from there
    pub async fn resume(&mut self) -> Result<SwapReceipt> {
        let run = match self.run.take() {
            Some(run) if run.failed_step().is_some() => run,
            other => {
                self.run = other;
                return Err(SwapError::NoPendingSwap);
            }
        };
        info!(run_id = %run.run_id, step = %run.next_step, "Resuming swap");
        self.drive(run).await
    }

    /// Withdraw `amount` of `symbol` held by the pool for the caller.
    ///
    /// Independent of any run; used to recover funds after a failed swap or
    /// withdrawal. Success closes out the pending run only when `symbol` is
    /// the token that run left in the pool.
    pub async fn withdraw(&mut self, symbol: &str, amount: &Amount) -> Result<SwapOutcome> {
        ensure_positive(amount, "amount")?;
        let token = self.session.token(symbol)?.clone();

        self.state = SwapState::Withdrawing;
        info!(token = %token, %amount, "Withdrawing from pool");

        match self.backend.withdraw(&token, amount, &token.fee()).await {
            Ok(reply) => {
                debug!(token = %token, %reply, "withdraw accepted");
                let closes = self.pending().is_some_and(|run| {
                    run.stranded_token().ledger_canister_id == token.ledger_canister_id
                });
                self.state = SwapState::Idle;
                if closes {
                    if let Some(run) = self.run.as_mut() {
                        info!(run_id = %run.run_id, "Pending swap closed by manual withdrawal");
                        run.outcomes.push(SwapOutcome::Withdrawn);
                    }
                } else if let Some(run) = self.pending() {
                    warn!(
                        run_id = %run.run_id,
                        stranded = %run.stranded_token(),
                        "Withdrawal left the pending swap open"
                    );
                    let step = run.next_step;
                    self.state = SwapState::Failed(step);
                }
                Ok(SwapOutcome::Withdrawn)
            }
            Err(error) => {
                warn!(token = %token, %error, "Withdrawal rejected");
                self.state = SwapState::Failed(SwapStep::Withdrawing);
                Err(SwapError::RemoteRejected {
                    step: SwapStep::Withdrawing,
                    error,
                })
            }
        }
    }

    /// End the session. Returns the unfinished run, if any, so the caller can
    /// report funds still held by the pool.
    pub fn close(self) -> Option<SwapRun> {
        let pending = self.run.filter(|run| run.failed_step().is_some());
        match &pending {
            Some(run) => warn!(
                run_id = %run.run_id,
                step = ?run.failed_step(),
                "Session closed with an unfinished swap"
            ),
            None => info!(principal = %self.session.principal(), "Swap session closed"),
        }
        pending
    }

    async fn check_balance(&mut self, token: &TokenSpec, amount_in: &Amount) -> Result<()> {
        let required = required_balance(amount_in, token);
        let available = match self
            .backend
            .balance_of(token, self.session.principal())
            .await
        {
            Ok(balance) => balance,
            Err(error) => {
                warn!(token = %token, %error, "Balance lookup failed");
                self.state = SwapState::Failed(SwapStep::Approving);
                return Err(SwapError::RemoteRejected {
                    step: SwapStep::Approving,
                    error,
                });
            }
        };

        if available < required {
            warn!(token = %token, %required, %available, "Insufficient balance");
            self.state = SwapState::Failed(SwapStep::Approving);
            return Err(SwapError::InsufficientFunds {
                token: token.symbol.clone(),
                required,
                available,
            });
        }
        Ok(())
    }

    async fn drive(&mut self, mut run: SwapRun) -> Result<SwapReceipt> {
        loop {
            let step = run.next_step;
            self.state = SwapState::running(step);
            info!(run_id = %run.run_id, %step, "Step started");

            match self.perform(&run, step).await {
                Ok(outcome) => {
                    info!(run_id = %run.run_id, %step, outcome = outcome.kind(), "Step done");
                    if let SwapOutcome::Swapped { amount_out } = &outcome {
                        run.amount_out = Some(amount_out.clone());
                    }
                    run.outcomes.push(outcome);

                    match next(step) {
                        Some(following) => run.next_step = following,
                        None => break,
                    }
                }
                Err(error) => {
                    warn!(run_id = %run.run_id, %step, kind = error.kind(), %error, "Step rejected");
                    run.outcomes.push(SwapOutcome::Failed {
                        step,
                        error: error.clone(),
                    });
                    self.state = SwapState::Failed(step);
                    self.run = Some(run);
                    return Err(SwapError::RemoteRejected { step, error });
                }
            }
        }

        let amount_out = run.amount_out.clone().unwrap_or_default();
        let receipt = SwapReceipt {
            run_id: run.run_id,
            direction: run.request.direction,
            amount_in: run.request.amount_in.clone(),
            min_amount_out: run.min_amount_out.clone(),
            amount_received: net_of_fee(&amount_out, &run.request.output_token),
            amount_out,
            outcomes: run.outcomes.clone(),
        };
        info!(
            run_id = %receipt.run_id,
            amount_out = %receipt.amount_out,
            "Swap completed"
        );
        self.state = SwapState::Completed;
        self.run = Some(run);
        Ok(receipt)
    }

    async fn perform(
        &self,
        run: &SwapRun,
        step: SwapStep,
    ) -> std::result::Result<SwapOutcome, RemoteError> {
        let request = &run.request;
        let input = &request.input_token;
        let output = &request.output_token;

        match step {
            SwapStep::Approving => {
                let pool = self.session.pool();
                debug!(token = %input, spender = %pool, amount = %request.amount_in, "approve");
                self.backend
                    .approve(input, pool, &request.amount_in, &input.fee())
                    .await?;
                Ok(SwapOutcome::Approved {
                    allowance_granted: request.amount_in.clone(),
                })
            }
            SwapStep::Depositing => {
                debug!(token = %input, amount = %request.amount_in, "deposit");
                let reply = self
                    .backend
                    .deposit(input, &request.amount_in, &input.fee())
                    .await?;
                debug!(run_id = %run.run_id, %reply, "deposit accepted");
                Ok(SwapOutcome::Deposited)
            }
            SwapStep::Swapping => {
                debug!(amount_in = %request.amount_in, min_out = %run.min_amount_out, "swap");
                let amount_out = self
                    .backend
                    .swap(&request.amount_in, &run.min_amount_out, request.direction)
                    .await?;
                Ok(SwapOutcome::Swapped { amount_out })
            }
            SwapStep::Withdrawing => {
                let amount_out = run
                    .amount_out
                    .as_ref()
                    .ok_or_else(|| RemoteError::generic("swap output unknown"))?;
                debug!(token = %output, amount = %amount_out, "withdraw");
                let reply = self
                    .backend
                    .withdraw(output, amount_out, &output.fee())
                    .await?;
                debug!(run_id = %run.run_id, %reply, "withdraw accepted");
                Ok(SwapOutcome::Withdrawn)
            }
            SwapStep::Quoting => Err(RemoteError::generic("quoting is not part of a swap run")),
        }
    }
}

fn next(step: SwapStep) -> Option<SwapStep> {
    match step {
        SwapStep::Approving => Some(SwapStep::Depositing),
        SwapStep::Depositing => Some(SwapStep::Swapping),
        SwapStep::Swapping => Some(SwapStep::Withdrawing),
        SwapStep::Withdrawing | SwapStep::Quoting => None,
    }
}
