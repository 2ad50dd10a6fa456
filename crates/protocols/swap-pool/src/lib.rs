//! Swap Pool Protocol Implementation
//!
//! This crate drives swaps between the two tokens of an ICP/ckBTC pool
//! canister: quoting, then approve, deposit, swap and withdraw.

pub mod calculator;
pub mod constants;
pub mod orchestrator;
pub mod session;
pub mod state;

// Re-exports
pub use calculator::{ensure_positive, min_amount_out, net_of_fee, required_balance};
pub use constants::slippage;
pub use orchestrator::SwapOrchestrator;
pub use session::SwapSession;
pub use state::{
    SwapError, SwapOutcome, SwapQuote, SwapReceipt, SwapRequest, SwapRun, SwapState, SwapStep,
};
